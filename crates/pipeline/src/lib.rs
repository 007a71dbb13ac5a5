//! Recommendation pipeline over a fitted vector space.
//!
//! This crate provides:
//! - ProfileBuilder for turning a user's likes and dislikes into a vector
//! - rank for scoring every catalog item against that vector
//! - evaluate / evaluate_indices for offline precision, recall and F1
//!
//! ## Architecture
//! Every request runs the same stages:
//! 1. The profile is rebuilt from the current ratings (never cached)
//! 2. Every item is scored against it, excluded items are skipped
//! 3. The top N items are returned, or compared against the ratings
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{rank, ProfileBuilder};
//! use std::collections::HashSet;
//!
//! let profile = ProfileBuilder::new()
//!     .with_damping(0.5)
//!     .build_profile(user_id, &ratings, index.vector_space());
//!
//! let rated: HashSet<usize> = ratings.iter().filter_map(|r| catalog.resolve(r.item_id)).collect();
//! let top = rank(profile.as_ref(), index.vector_space(), 10, &rated);
//! ```

pub mod error;
pub mod evaluation;
pub mod profile;
pub mod ranker;

// Re-export main types
pub use error::{PipelineError, Result};
pub use evaluation::{evaluate, evaluate_indices, Metrics, MetricsSummary};
pub use profile::{build_profile, ProfileBuilder, ProfileVector, DEFAULT_DAMPING};
pub use ranker::{rank, ScoredItem};

use data_loader::{ItemId, Rating, RatingLabel, UserId};
use std::collections::BTreeMap;

/// Latest label per item for one user, in item order.
///
/// A later rating for the same item replaces an earlier one.
pub(crate) fn user_labels(user_id: UserId, ratings: &[Rating]) -> BTreeMap<ItemId, RatingLabel> {
    ratings
        .iter()
        .filter(|rating| rating.user_id == user_id)
        .map(|rating| (rating.item_id, rating.label))
        .collect()
}
