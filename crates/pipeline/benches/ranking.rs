//! Benchmarks for profile building and ranking
//!
//! Run with: cargo bench --package pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Item, Rating, RatingLabel};
use indexer::{build_index, CorpusIndex, IndexerConfig};
use pipeline::{rank, ProfileBuilder};
use std::collections::HashSet;

const WORDS: &[&str] = &[
    "detective", "city", "family", "war", "love", "secret", "journey", "island", "robot",
    "heist", "revenge", "school", "space", "kingdom", "murder", "friendship", "ocean", "dream",
];

fn synthetic_index(count: usize) -> CorpusIndex {
    let items = (0..count)
        .map(|i| Item {
            title: format!("Movie {}", i),
            genres: vec![format!("Genre {}", i % 12)],
            director: format!("Director {}", i % 80),
            synopsis: (0..20)
                .map(|k| WORDS[(i * 5 + k * 7) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" "),
            ..Item::default()
        })
        .collect();
    build_index(items, &IndexerConfig::default()).expect("Failed to build index")
}

fn test_ratings() -> Vec<Rating> {
    (0..30)
        .map(|i| {
            let label = if i % 3 == 0 { RatingLabel::Disliked } else { RatingLabel::Liked };
            Rating::new(1, i * 17, label)
        })
        .collect()
}

fn bench_build_profile(c: &mut Criterion) {
    let index = synthetic_index(1000);
    let ratings = test_ratings();
    let builder = ProfileBuilder::new();

    c.bench_function("build_profile", |b| {
        b.iter(|| {
            let profile = builder.build_profile(black_box(1), &ratings, index.vector_space());
            black_box(profile)
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    let index = synthetic_index(1000);
    let ratings = test_ratings();
    let profile = ProfileBuilder::new().build_profile(1, &ratings, index.vector_space());
    let exclude: HashSet<usize> = ratings.iter().map(|r| r.item_id as usize).collect();

    c.bench_function("rank_top_10", |b| {
        b.iter(|| {
            let ranked = rank(profile.as_ref(), index.vector_space(), black_box(10), &exclude);
            black_box(ranked)
        })
    });
}

criterion_group!(benches, bench_build_profile, bench_rank);
criterion_main!(benches);
