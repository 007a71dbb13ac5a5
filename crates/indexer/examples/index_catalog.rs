//! Example: Index a movie catalog
//!
//! Run with: cargo run --package indexer --example index_catalog
//!
//! This example shows how to:
//! 1. Load the catalog
//! 2. Build the TF-IDF vector space
//! 3. Inspect the heaviest terms of a few items
//! 4. Find the nearest neighbours of one item

use data_loader::Catalog;
use indexer::{build_index, IndexerConfig};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Catalog Indexing Example ===\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(Path::new("data/filmes.csv"))?;
    println!("Loaded {} items in {:?}\n", catalog.len(), start.elapsed());

    let start = Instant::now();
    let index = build_index(catalog.into_items(), &IndexerConfig::default())?;
    let space = index.vector_space();
    println!(
        "Built vector space in {:?}: {} vectors x {} terms\n",
        start.elapsed(),
        space.len(),
        space.dimension()
    );

    // Heaviest terms of the first few items
    for (i, item) in index.catalog().items().iter().take(3).enumerate() {
        let Some(vector) = space.vector(i) else { continue };
        let mut entries = vector.entries().to_vec();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        println!("{} ({} terms)", item.title, vector.nnz());
        for &(column, weight) in entries.iter().take(5) {
            let term = space.model().term(column).unwrap_or("?");
            println!("  {:<30} {:.4}", term, weight);
        }
        println!();
    }

    // Nearest neighbours of item 0
    if let Some(target) = space.vector(0) {
        let mut neighbours: Vec<(usize, f32)> = space
            .vectors()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 0)
            .map(|(i, v)| (i, target.dot(v)))
            .collect();
        neighbours.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let title = index.catalog().title(0).unwrap_or("?");
        println!("Most similar to {}:", title);
        for (rank, (i, score)) in neighbours.iter().take(5).enumerate() {
            println!(
                "  {}. {} (Similarity: {:.4})",
                rank + 1,
                index.catalog().title(*i).unwrap_or("?"),
                score
            );
        }
    }

    Ok(())
}
