use data_loader::load_dataset;
use std::path::Path;
use std::time::Instant;

fn main() {
    let catalog_path = Path::new("data/filmes.csv");
    let ratings_path = Path::new("data/avaliacoes.csv");

    println!("Loading movie catalog and ratings...\n");

    let start = Instant::now();
    let dataset = load_dataset(catalog_path, ratings_path)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Items: {}", dataset.catalog.len());
    println!("Users: {}", dataset.ratings.users().len());
    println!("Ratings: {}", dataset.ratings.len());
    println!(
        "Unique titles: {}",
        if dataset.catalog.has_unique_titles() { "yes" } else { "no" }
    );
}
