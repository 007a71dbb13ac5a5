//! # Recommendation Engine
//!
//! This module wires the recommendation pipeline to shared state:
//! 1. Snapshot the current model (catalog + vector space)
//! 2. Read the user's current ratings
//! 3. Build the profile and rank every item (blocking thread)
//! 4. Attach catalog metadata to the top N
//!
//! The model is published through a [`ModelHandle`]: a rebuild produces a
//! complete new index before it is swapped in, so a request always sees
//! either the old model or the new one. Rebuilds are serialized.
//!
//! Profiles are rebuilt on every request from the rating log, so a rating
//! recorded through [`RecommendationEngine::record_rating`] is reflected
//! by the next call.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use data_loader::{Catalog, Item, ItemIndex, Rating, RatingLabel, RatingLog, UserId};
use indexer::{build_index, CorpusIndex, IndexError};
use pipeline::{evaluate, evaluate_indices, rank, Metrics, MetricsSummary, ProfileBuilder, ScoredItem};

use crate::config::EngineConfig;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecommendation {
    pub index: ItemIndex,
    pub title: String,
    pub score: f32,
    pub poster_link: Option<String>,
    pub genres: Vec<String>,
    pub year: Option<u16>,
    pub explanation: String,
}

impl MovieRecommendation {
    /// Score rounded to 4 decimals
    pub fn display_score(&self) -> String {
        format!("{:.4}", self.score)
    }
}

/// Catalog listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub index: ItemIndex,
    pub title: String,
    pub genres: Vec<String>,
    pub year: Option<u16>,
    pub synopsis: String,
    pub poster_link: Option<String>,
}

impl CatalogEntry {
    fn new(index: ItemIndex, item: &Item) -> Self {
        Self {
            index,
            title: item.title.clone(),
            genres: item.genres.clone(),
            year: item.year,
            synopsis: item.synopsis.clone(),
            poster_link: item.poster_link.clone(),
        }
    }
}

/// Atomically swappable reference to the current model
#[derive(Debug)]
pub struct ModelHandle {
    current: RwLock<Arc<CorpusIndex>>,
}

impl ModelHandle {
    pub fn new(index: CorpusIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Snapshot of the published model. The snapshot stays valid after a
    /// later publish.
    pub fn current(&self) -> Arc<CorpusIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the published model
    pub fn publish(&self, index: CorpusIndex) {
        let index = Arc::new(index);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = index;
    }
}

/// Content-based recommendation engine
#[derive(Clone)]
pub struct RecommendationEngine {
    model: Arc<ModelHandle>,
    ratings: Arc<RwLock<RatingLog>>,
    /// Held for the duration of a rebuild
    rebuild: Arc<Mutex<()>>,
    config: Arc<EngineConfig>,
    profile_builder: ProfileBuilder,
}

impl RecommendationEngine {
    /// Index `items` and serve recommendations from `ratings`.
    ///
    /// Fails when the catalog cannot be indexed (`IndexError::CorpusUnavailable`).
    pub fn new(items: Vec<Item>, ratings: RatingLog, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let index = build_index(items, &config.indexer).context("Failed to build corpus index")?;
        info!(
            "Indexed {} items in {:.2?}",
            index.catalog().len(),
            start.elapsed()
        );

        let profile_builder = ProfileBuilder::new().with_damping(config.damping);
        Ok(Self {
            model: Arc::new(ModelHandle::new(index)),
            ratings: Arc::new(RwLock::new(ratings)),
            rebuild: Arc::new(Mutex::new(())),
            config: Arc::new(config),
            profile_builder,
        })
    }

    /// Load the catalog and rating files, then index the catalog.
    ///
    /// A missing rating file starts the engine with no ratings.
    pub fn from_files(catalog_path: &Path, ratings_path: &Path, config: EngineConfig) -> Result<Self> {
        let catalog = Catalog::load_from_file(catalog_path)
            .map_err(IndexError::from)
            .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
        let ratings = RatingLog::load_from_file(ratings_path)
            .with_context(|| format!("Failed to load ratings {}", ratings_path.display()))?;

        info!(
            "Loaded {} items and {} ratings",
            catalog.len(),
            ratings.len()
        );
        Self::new(catalog.into_items(), ratings, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of the current model
    pub fn model(&self) -> Arc<CorpusIndex> {
        self.model.current()
    }

    /// Rebuild the index over a new catalog and publish it.
    ///
    /// At most one rebuild runs at a time. On failure the previous model
    /// stays in place.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn reload_catalog(&self, items: Vec<Item>) -> Result<()> {
        let _guard = self.rebuild.lock().await;
        let start = Instant::now();

        let indexer_config = self.config.indexer.clone();
        let index = tokio::task::spawn_blocking(move || build_index(items, &indexer_config))
            .await
            .context("Index rebuild task panicked")?
            .context("Failed to rebuild corpus index")?;

        let len = index.catalog().len();
        self.model.publish(index);
        info!("Published new model with {} items in {:.2?}", len, start.elapsed());
        Ok(())
    }

    /// Record (or overwrite) a rating.
    ///
    /// Returns the label it replaced, if any. Ratings for items outside the
    /// current catalog are rejected.
    pub fn record_rating(&self, rating: Rating) -> Result<Option<RatingLabel>> {
        let model = self.model.current();
        if model.catalog().resolve(rating.item_id).is_none() {
            bail!(
                "Item {} is not in the catalog ({} items)",
                rating.item_id,
                model.catalog().len()
            );
        }

        let previous = self.write_log().upsert(rating);
        debug!(
            "Recorded rating user={} item={} label={}",
            rating.user_id,
            rating.item_id,
            rating.label.as_int()
        );
        Ok(previous)
    }

    /// Current ratings of one user, in item order
    pub fn user_ratings(&self, user_id: UserId) -> Vec<Rating> {
        self.read_log().user_ratings(user_id)
    }

    /// Users with at least one rating, sorted
    pub fn users(&self) -> Vec<UserId> {
        self.read_log().users()
    }

    // Writers only upsert single entries, so a poisoned log is still
    // consistent. Same policy as `ModelHandle`.
    fn read_log(&self) -> RwLockReadGuard<'_, RatingLog> {
        self.ratings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, RatingLog> {
        self.ratings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Main entry point: Get recommendations for a user
    ///
    /// Items the user already rated are never recommended. Returns `None`
    /// when the user has no positive rating to build a profile from.
    #[instrument(skip(self))]
    pub async fn get_recommendations(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Option<Vec<MovieRecommendation>>> {
        let start_time = Instant::now();

        let model = self.model.current();
        let ratings = self.user_ratings(user_id);
        let builder = self.profile_builder;

        let recommendations = tokio::task::spawn_blocking(move || {
            let space = model.vector_space();
            let profile = builder.build_profile(user_id, &ratings, space)?;

            let catalog = model.catalog();
            let liked: Vec<ItemIndex> = ratings
                .iter()
                .filter(|r| r.label.is_liked())
                .filter_map(|r| catalog.resolve(r.item_id))
                .collect();
            let rated: HashSet<ItemIndex> = ratings
                .iter()
                .filter_map(|r| catalog.resolve(r.item_id))
                .collect();

            let ranked = rank(Some(&profile), space, limit, &rated);
            Some(to_recommendations(&model, &ranked, &liked))
        })
        .await
        .context("Recommendation task panicked")?;

        match &recommendations {
            Some(recs) => info!(
                "Selected {} recommendations for user {} in {:.2?}",
                recs.len(),
                user_id,
                start_time.elapsed()
            ),
            None => info!("User {} has no positive ratings yet", user_id),
        }
        Ok(recommendations)
    }

    /// Evaluate the top `limit` items for one user against their ratings.
    ///
    /// Ranking runs without exclusions so rated items can count as hits.
    /// Returns `None` when the user has no positive rating.
    #[instrument(skip(self))]
    pub async fn evaluate_user(&self, user_id: UserId, limit: usize) -> Result<Option<Metrics>> {
        let model = self.model.current();
        let ratings = self.user_ratings(user_id);
        let builder = self.profile_builder;

        tokio::task::spawn_blocking(move || evaluate_ratings(&model, builder, user_id, &ratings, limit))
            .await
            .context("Evaluation task panicked")
    }

    /// Macro-averaged metrics over every user that has a profile
    #[instrument(skip(self))]
    pub async fn evaluate_all(&self, limit: usize) -> Result<MetricsSummary> {
        let start_time = Instant::now();

        let model = self.model.current();
        let snapshot: Vec<(UserId, Vec<Rating>)> = {
            let log = self.read_log();
            log.users()
                .into_iter()
                .map(|user_id| (user_id, log.user_ratings(user_id)))
                .collect()
        };
        let builder = self.profile_builder;

        let summary = tokio::task::spawn_blocking(move || {
            snapshot
                .par_iter()
                .filter_map(|(user_id, ratings)| evaluate_ratings(&model, builder, *user_id, ratings, limit))
                .collect::<Vec<Metrics>>()
                .into_iter()
                .collect::<MetricsSummary>()
        })
        .await
        .context("Evaluation task panicked")?;

        info!(
            "Evaluated {} users in {:.2?}",
            summary.users,
            start_time.elapsed()
        );
        Ok(summary)
    }

    /// Every catalog item, in index order
    pub fn list_items(&self) -> Vec<CatalogEntry> {
        let model = self.model.current();
        model
            .catalog()
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| CatalogEntry::new(index, item))
            .collect()
    }

    /// Title search: exact matches first, then substring matches
    pub fn search_items(&self, query: &str) -> Vec<CatalogEntry> {
        let model = self.model.current();
        let catalog = model.catalog();
        catalog
            .search(query)
            .into_iter()
            .filter_map(|index| catalog.get(index).map(|item| CatalogEntry::new(index, item)))
            .collect()
    }
}

/// Profile, rank (no exclusions) and evaluate one user
fn evaluate_ratings(
    model: &CorpusIndex,
    builder: ProfileBuilder,
    user_id: UserId,
    ratings: &[Rating],
    limit: usize,
) -> Option<Metrics> {
    let space = model.vector_space();
    let profile = builder.build_profile(user_id, ratings, space)?;
    let ranked = rank(Some(&profile), space, limit, &HashSet::new());

    let catalog = model.catalog();
    let metrics = if catalog.has_unique_titles() {
        let titles: Vec<&str> = ranked.iter().filter_map(|s| catalog.title(s.index)).collect();
        evaluate(user_id, &titles, ratings, catalog)
    } else {
        let indices: Vec<ItemIndex> = ranked.iter().map(|s| s.index).collect();
        evaluate_indices(user_id, &indices, ratings, catalog)
    };
    Some(metrics)
}

/// Attach catalog metadata and an explanation to ranked items
fn to_recommendations(
    model: &CorpusIndex,
    ranked: &[ScoredItem],
    liked: &[ItemIndex],
) -> Vec<MovieRecommendation> {
    let catalog = model.catalog();
    ranked
        .iter()
        .filter_map(|scored| {
            let item = catalog.get(scored.index)?;
            Some(MovieRecommendation {
                index: scored.index,
                title: item.title.clone(),
                score: scored.score,
                poster_link: item.poster_link.clone(),
                genres: item.genres.clone(),
                year: item.year,
                explanation: explain(model, scored, liked),
            })
        })
        .collect()
}

/// Name the liked item most similar to the recommendation
fn explain(model: &CorpusIndex, scored: &ScoredItem, liked: &[ItemIndex]) -> String {
    let space = model.vector_space();
    let closest = space.vector(scored.index).and_then(|target| {
        liked
            .iter()
            .filter_map(|&index| space.vector(index).map(|v| (index, target.dot(v))))
            .filter(|&(_, similarity)| similarity > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
    });

    match closest.and_then(|(index, similarity)| Some((model.catalog().title(index)?, similarity))) {
        Some((title, similarity)) => format!(
            "Score: {:.4}, closest liked title: {} (similarity {:.4})",
            scored.score, title, similarity
        ),
        None => format!("Score: {:.4}", scored.score),
    }
}
