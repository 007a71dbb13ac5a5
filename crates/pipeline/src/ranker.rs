//! Similarity Ranker - brute-force scoring against every catalog item

use crate::profile::ProfileVector;
use data_loader::ItemIndex;
use indexer::VectorSpace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// One ranked catalog item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub index: ItemIndex,
    /// Dot product of the profile and the item vector
    pub score: f32,
}

/// Rank every catalog item against `profile`.
///
/// Items in `exclude` are never returned. Output is sorted by descending
/// score, ties by ascending index, and holds at most `top_n` entries.
/// An absent profile ranks nothing.
#[instrument(skip_all, fields(top_n = top_n, excluded = exclude.len()))]
pub fn rank(
    profile: Option<&ProfileVector>,
    space: &VectorSpace,
    top_n: usize,
    exclude: &HashSet<ItemIndex>,
) -> Vec<ScoredItem> {
    let Some(profile) = profile else {
        return Vec::new();
    };
    if top_n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredItem> = space
        .vectors()
        .par_iter()
        .enumerate()
        .filter(|(index, _)| !exclude.contains(index))
        .map(|(index, vector)| ScoredItem {
            index,
            // -0.0 + 0.0 == +0.0, so equal scores compare equal under total_cmp
            score: profile.score(vector) + 0.0,
        })
        .collect();

    scored.sort_unstable_by(compare_scored);
    scored.truncate(top_n);

    debug!("Ranked {} items", scored.len());
    scored
}

/// Descending score, then ascending index
fn compare_scored(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.index.cmp(&b.index))
}
