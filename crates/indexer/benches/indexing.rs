//! Benchmarks for vector space construction
//!
//! Run with: cargo bench --package indexer
//!
//! Uses a synthetic catalog so the benchmark runs without the data files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::Item;
use indexer::{build_index, Analyzer, IndexerConfig, content_blob};

const GENRES: &[&str] = &["Action", "Drama", "Comedy", "Crime", "Sci-Fi", "Romance", "Horror"];
const WORDS: &[&str] = &[
    "detective", "city", "family", "war", "love", "secret", "journey", "island", "robot",
    "heist", "revenge", "school", "space", "kingdom", "murder", "friendship", "ocean", "dream",
];

fn synthetic_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let synopsis: Vec<&str> = (0..25).map(|k| WORDS[(i * 7 + k * 3) % WORDS.len()]).collect();
            Item {
                title: format!("Movie {}", i),
                genres: vec![
                    GENRES[i % GENRES.len()].to_string(),
                    GENRES[(i / 3) % GENRES.len()].to_string(),
                ],
                director: format!("Director {}", i % 50),
                cast: (0..4).map(|k| format!("Actor {}", (i + k * 13) % 300)).collect(),
                synopsis: synopsis.join(" "),
                ..Item::default()
            }
        })
        .collect()
}

fn bench_build_index(c: &mut Criterion) {
    let items = synthetic_items(1000);
    let config = IndexerConfig::default();

    c.bench_function("build_index_1000", |b| {
        b.iter(|| {
            let index = build_index(black_box(items.clone()), &config).unwrap();
            black_box(index)
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let items = synthetic_items(1);
    let config = IndexerConfig::default();
    let analyzer = Analyzer::new(&config);
    let blob = content_blob(&items[0], config.joiner);

    c.bench_function("analyze_item", |b| {
        b.iter(|| {
            let terms = analyzer.analyze(black_box(&blob));
            black_box(terms)
        })
    });
}

criterion_group!(benches, bench_build_index, bench_analyze);
criterion_main!(benches);
