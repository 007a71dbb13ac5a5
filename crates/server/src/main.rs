//! Simple test harness for the recommendation engine.
//!
//! Loads the catalog and ratings from `data/` and prints recommendations
//! for one user: `server [user_id] [limit]`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{EngineConfig, RecommendationEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,pipeline=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let user_id = match args.next() {
        Some(arg) => arg.parse().context("user_id must be a number")?,
        None => 1,
    };
    let limit = match args.next() {
        Some(arg) => arg.parse().context("limit must be a number")?,
        None => 10,
    };

    info!("Starting recommendation engine test harness");
    let engine = RecommendationEngine::from_files(
        Path::new("data/filmes.csv"),
        Path::new("data/avaliacoes.csv"),
        EngineConfig::default(),
    )?;

    info!("Getting recommendations for user {} (limit: {})", user_id, limit);
    let Some(recommendations) = engine.get_recommendations(user_id, limit).await? else {
        info!("User {} has no positive ratings, nothing to recommend", user_id);
        return Ok(());
    };

    info!("Received {} recommendations:", recommendations.len());
    for (i, rec) in recommendations.iter().enumerate() {
        info!(
            "{}. {} ({}) - Score: {}",
            i + 1,
            rec.title,
            rec.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            rec.display_score()
        );
        info!("   Genres: {}", rec.genres.join(", "));
        info!("   {}", rec.explanation);
    }

    Ok(())
}
