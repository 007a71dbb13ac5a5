//! Error types for the pipeline crate.
//!
//! Neither condition aborts a request: an invalid reference drops one
//! rating, a missing positive signal yields an absent profile. They exist
//! so both outcomes are reported the same way wherever they are logged.

use data_loader::{ItemId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A rating points outside the catalog; the rating is ignored.
    #[error("User {user_id} rated item {item_id}, outside a catalog of {catalog_len} items")]
    InvalidItemReference {
        user_id: UserId,
        item_id: ItemId,
        catalog_len: usize,
    },

    /// The user has no valid liked item to build a profile from.
    #[error("User {user_id} has no positive ratings")]
    NoPositiveSignal { user_id: UserId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
