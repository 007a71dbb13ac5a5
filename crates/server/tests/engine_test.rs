//! Integration tests for the engine: file loading, concurrent readers
//! during reloads, and rating freshness under concurrency.

use std::io::Write;
use std::path::Path;

use data_loader::parser::parse_catalog_str;
use data_loader::{Item, Rating, RatingLabel};
use indexer::IndexError;
use server::{EngineConfig, RecommendationEngine};

const CATALOG_CSV: &str = "\
Series_Title,Genre,Director,Star1,Star2,Overview
The Godfather,\"Crime, Drama\",Francis Ford Coppola,Marlon Brando,Al Pacino,An organized crime dynasty's aging patriarch transfers control to his son.
The Godfather Part II,\"Crime, Drama\",Francis Ford Coppola,Al Pacino,Robert De Niro,The early life of a young crime boss and his son's grip on the family.
Finding Nemo,\"Animation, Adventure\",Andrew Stanton,Albert Brooks,Ellen DeGeneres,A clownfish searches the ocean for his captured son.
Up,\"Animation, Adventure\",Pete Docter,Ed Asner,Jordan Nagai,An old balloon salesman flies his house to South America.
Alien,\"Horror, Sci-Fi\",Ridley Scott,Sigourney Weaver,Tom Skerritt,The crew of a spaceship meets a deadly creature.
";

const RATINGS_CSV: &str = "\
usuario_id,filme_id,avaliacao
1,0,1
1,2,0
2,3,1
";

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn catalog_items() -> Vec<Item> {
    parse_catalog_str(CATALOG_CSV, "test").unwrap()
}

#[tokio::test]
async fn test_engine_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_file(dir.path(), "filmes.csv", CATALOG_CSV);
    let ratings = write_file(dir.path(), "avaliacoes.csv", RATINGS_CSV);

    let engine = RecommendationEngine::from_files(&catalog, &ratings, EngineConfig::default()).unwrap();

    assert_eq!(engine.list_items().len(), 5);
    assert_eq!(engine.users(), vec![1, 2]);

    let recs = engine.get_recommendations(1, 3).await.unwrap().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].title, "The Godfather Part II");
}

#[tokio::test]
async fn test_missing_ratings_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_file(dir.path(), "filmes.csv", CATALOG_CSV);

    let engine = RecommendationEngine::from_files(
        &catalog,
        &dir.path().join("missing.csv"),
        EngineConfig::default(),
    )
    .unwrap();

    assert!(engine.users().is_empty());
    assert!(engine.get_recommendations(1, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_catalog_is_corpus_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let ratings = write_file(dir.path(), "avaliacoes.csv", RATINGS_CSV);

    let result = RecommendationEngine::from_files(
        &dir.path().join("missing.csv"),
        &ratings,
        EngineConfig::default(),
    );
    let err = result.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<IndexError>(),
        Some(IndexError::CorpusUnavailable { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_partial_model() {
    let ratings = vec![Rating::new(1, 0, RatingLabel::Liked)].into_iter().collect();
    let engine = RecommendationEngine::new(catalog_items(), ratings, EngineConfig::default()).unwrap();

    let mut readers = Vec::new();
    for _ in 0..4 {
        let engine = engine.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                let model = engine.model();
                assert_eq!(model.catalog().len(), model.vector_space().len());
                let recs = engine.get_recommendations(1, 10).await.unwrap().unwrap();
                assert!(recs.iter().all(|r| r.index != 0));
                tokio::task::yield_now().await;
            }
        }));
    }

    let mut reloads = Vec::new();
    for size in [2, 3, 4, 5] {
        let engine = engine.clone();
        reloads.push(tokio::spawn(async move {
            let mut items = catalog_items();
            items.truncate(size);
            engine.reload_catalog(items).await.unwrap();
        }));
    }

    for handle in readers.into_iter().chain(reloads) {
        handle.await.unwrap();
    }

    let model = engine.model();
    assert_eq!(model.catalog().len(), model.vector_space().len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ratings_are_all_visible() {
    let engine = RecommendationEngine::new(catalog_items(), Default::default(), EngineConfig::default()).unwrap();

    let mut writers = Vec::new();
    for user_id in 1..=8u32 {
        let engine = engine.clone();
        writers.push(tokio::spawn(async move {
            engine
                .record_rating(Rating::new(user_id, (user_id % 5) as i64, RatingLabel::Liked))
                .unwrap();
            // Read-your-write
            let recs = engine.get_recommendations(user_id, 10).await.unwrap().unwrap();
            assert_eq!(recs.len(), 4);
        }));
    }

    for handle in writers {
        handle.await.unwrap();
    }
    assert_eq!(engine.users().len(), 8);
}
