//! Core domain types for the movie catalog and the rating log.
//!
//! An item's identity is its position in the catalog. Ratings refer to
//! items by that position, but the rating source is external and may hold
//! references that don't resolve, so the raw reference (`ItemId`) and the
//! validated position (`ItemIndex`) are kept as separate types.

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Raw item reference as recorded by the rating source.
///
/// Signed because nothing stops the rating source from writing `-1`.
pub type ItemId = i64;

/// Validated 0-based position of an item in the loaded catalog
pub type ItemIndex = usize;

// =============================================================================
// Item-related Types
// =============================================================================

/// A catalog entry (one movie).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    /// Genre values, one entry per genre (the source lists them comma-separated)
    pub genres: Vec<String>,
    pub director: String,
    /// Leading cast members, in billing order
    pub cast: Vec<String>,
    /// Free-text plot summary
    pub synopsis: String,
    /// Display-only poster reference
    pub poster_link: Option<String>,
    pub year: Option<u16>,
}

// =============================================================================
// Rating Types
// =============================================================================

/// Explicit binary feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    Disliked,
    Liked,
}

impl RatingLabel {
    pub fn is_liked(self) -> bool {
        matches!(self, RatingLabel::Liked)
    }

    /// Integer encoding used by the rating source (0 or 1)
    pub fn as_int(self) -> u8 {
        match self {
            RatingLabel::Disliked => 0,
            RatingLabel::Liked => 1,
        }
    }
}

impl TryFrom<i64> for RatingLabel {
    type Error = DataLoadError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RatingLabel::Disliked),
            1 => Ok(RatingLabel::Liked),
            _ => Err(DataLoadError::InvalidValue {
                field: "label".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// A single rating from a user for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub label: RatingLabel,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, label: RatingLabel) -> Self {
        Self {
            user_id,
            item_id,
            label,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered, immutable collection of items.
///
/// Row order in the source fixes each item's index for the lifetime of
/// the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Get an item by its catalog position
    pub fn get(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index)
    }

    /// Title of the item at `index`, if it exists
    pub fn title(&self, index: ItemIndex) -> Option<&str> {
        self.items.get(index).map(|item| item.title.as_str())
    }

    /// Resolve a raw rating reference to a catalog position.
    ///
    /// Returns `None` for negative references and references past the end.
    pub fn resolve(&self, item_id: ItemId) -> Option<ItemIndex> {
        let index = usize::try_from(item_id).ok()?;
        (index < self.items.len()).then_some(index)
    }

    /// Whether every title in the catalog occurs exactly once
    pub fn has_unique_titles(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|item| seen.insert(item.title.as_str()))
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches; within each group
    /// catalog order is preserved.
    pub fn search(&self, query: &str) -> Vec<ItemIndex> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            let title = item.title.to_lowercase();
            if title == query {
                exact.push(index);
            } else if title.contains(&query) {
                partial.push(index);
            }
        }
        exact.extend(partial);
        exact
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

// =============================================================================
// RatingLog - current snapshot of all feedback
// =============================================================================

/// In-memory view of the rating source.
///
/// Holds at most one label per (user, item) pair: a later rating for the
/// same pair replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct RatingLog {
    by_user: HashMap<UserId, BTreeMap<ItemId, RatingLabel>>,
}

impl RatingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a rating.
    ///
    /// Returns the label previously stored for the pair, if any.
    pub fn upsert(&mut self, rating: Rating) -> Option<RatingLabel> {
        self.by_user
            .entry(rating.user_id)
            .or_default()
            .insert(rating.item_id, rating.label)
    }

    /// All ratings made by a user, ordered by item reference.
    ///
    /// Returns an empty Vec if the user has no ratings.
    pub fn user_ratings(&self, user_id: UserId) -> Vec<Rating> {
        self.by_user
            .get(&user_id)
            .map(|items| {
                items
                    .iter()
                    .map(|(&item_id, &label)| Rating::new(user_id, item_id, label))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Label stored for one (user, item) pair
    pub fn label(&self, user_id: UserId, item_id: ItemId) -> Option<RatingLabel> {
        self.by_user.get(&user_id)?.get(&item_id).copied()
    }

    /// Every user with at least one rating, ascending
    pub fn users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .by_user
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(&user_id, _)| user_id)
            .collect();
        users.sort_unstable();
        users
    }

    /// Total number of stored ratings
    pub fn len(&self) -> usize {
        self.by_user.values().map(|items| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Rating> for RatingLog {
    fn from_iter<T: IntoIterator<Item = Rating>>(iter: T) -> Self {
        let mut log = RatingLog::new();
        for rating in iter {
            log.upsert(rating);
        }
        log
    }
}

/// Everything loaded from disk at startup
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Catalog,
    pub ratings: RatingLog,
}
