//! # Data Loader Crate
//!
//! This crate loads the movie catalog and the user rating log.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, Catalog, Rating, RatingLog)
//! - **parser**: Parse the CSV sources into Rust structs
//! - **loader**: Load a whole dataset from disk
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_dataset;
//! use std::path::Path;
//!
//! let dataset = load_dataset(
//!     Path::new("data/filmes.csv"),
//!     Path::new("data/avaliacoes.csv"),
//! )?;
//!
//! let first = dataset.catalog.get(0).unwrap();
//! let ratings = dataset.ratings.user_ratings(1);
//! println!("{} / user 1 rated {} movies", first.title, ratings.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod loader;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use loader::load_dataset;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    ItemIndex,
    // Core types
    Item,
    Catalog,
    Rating,
    RatingLabel,
    RatingLog,
    Dataset,
};
