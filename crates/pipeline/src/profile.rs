//! Profile Builder - user preference vector from explicit feedback
//!
//! ## Algorithm
//! 1. Keep the user's latest label per item
//! 2. Drop ratings that point outside the catalog
//! 3. positive = mean of liked item vectors (absent profile if none)
//! 4. negative = mean of disliked item vectors
//! 5. profile = positive - damping × negative
//!
//! Profiles are never cached: every call reads the ratings it is given.

use crate::error::PipelineError;
use crate::user_labels;
use data_loader::{ItemIndex, Rating, UserId};
use indexer::{DenseVector, SparseVector, VectorSpace};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Weight of a dislike relative to a like
pub const DEFAULT_DAMPING: f32 = 0.5;

/// A user's preferences, in the same space as the item vectors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileVector {
    vector: DenseVector,
    liked: usize,
    disliked: usize,
}

impl ProfileVector {
    /// Similarity with one item vector
    pub fn score(&self, item: &SparseVector) -> f32 {
        self.vector.dot_sparse(item)
    }

    pub fn dimension(&self) -> usize {
        self.vector.dimension()
    }

    pub fn as_dense(&self) -> &DenseVector {
        &self.vector
    }

    /// Number of valid liked items the profile was built from
    pub fn liked(&self) -> usize {
        self.liked
    }

    /// Number of valid disliked items the profile was built from
    pub fn disliked(&self) -> usize {
        self.disliked
    }
}

/// Builds profile vectors with a configurable damping factor
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder {
    damping: f32,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
        }
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the dislike weight λ (default: 0.5)
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Build the profile of `user_id` from `ratings`.
    ///
    /// Ratings of other users are ignored, so the whole log can be passed.
    /// Returns `None` when the user liked no valid item.
    #[instrument(skip(self, ratings, space), fields(damping = self.damping))]
    pub fn build_profile(
        &self,
        user_id: UserId,
        ratings: &[Rating],
        space: &VectorSpace,
    ) -> Option<ProfileVector> {
        let catalog_len = space.len();

        let mut liked: Vec<ItemIndex> = Vec::new();
        let mut disliked: Vec<ItemIndex> = Vec::new();
        for (item_id, label) in user_labels(user_id, ratings) {
            let index = match usize::try_from(item_id) {
                Ok(index) if index < catalog_len => index,
                _ => {
                    let err = PipelineError::InvalidItemReference {
                        user_id,
                        item_id,
                        catalog_len,
                    };
                    warn!("Dropping rating: {}", err);
                    continue;
                }
            };

            if label.is_liked() {
                liked.push(index);
            } else {
                disliked.push(index);
            }
        }

        if liked.is_empty() {
            debug!("{}", PipelineError::NoPositiveSignal { user_id });
            return None;
        }

        let mut vector = mean_vector(space, &liked);
        if !disliked.is_empty() {
            let negative = mean_vector(space, &disliked);
            vector.sub_scaled(&negative, self.damping);
        }

        debug!(
            "Built profile from {} liked and {} disliked items",
            liked.len(),
            disliked.len()
        );

        Some(ProfileVector {
            vector,
            liked: liked.len(),
            disliked: disliked.len(),
        })
    }
}

/// Build a profile with the default damping factor
pub fn build_profile(user_id: UserId, ratings: &[Rating], space: &VectorSpace) -> Option<ProfileVector> {
    ProfileBuilder::default().build_profile(user_id, ratings, space)
}

/// Arithmetic mean of the vectors at `indices` (non-empty, all in range)
fn mean_vector(space: &VectorSpace, indices: &[ItemIndex]) -> DenseVector {
    let factor = 1.0 / indices.len() as f32;
    let mut mean = DenseVector::zeros(space.dimension());
    for &index in indices {
        if let Some(vector) = space.vector(index) {
            mean.add_sparse(vector, factor);
        }
    }
    mean
}
