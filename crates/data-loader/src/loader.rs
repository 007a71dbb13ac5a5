//! Dataset loading.
//!
//! Parses the catalog and the rating source in parallel and builds the
//! in-memory [`Dataset`].

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

impl Catalog {
    /// Load and parse a catalog CSV file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Ok(Catalog::new(parser::parse_catalog(path)?))
    }
}

impl RatingLog {
    /// Load a rating CSV file.
    ///
    /// A missing file is an empty log: a fresh deployment has no feedback yet.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        match parser::parse_ratings(path) {
            Ok(ratings) => Ok(ratings.into_iter().collect()),
            Err(DataLoadError::FileNotFound { path }) => {
                warn!("Rating file {} not found, starting with no ratings", path);
                Ok(RatingLog::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Load the catalog and the rating log.
///
/// Both files are parsed at the same time with `rayon::join`.
pub fn load_dataset(catalog_path: &Path, ratings_path: &Path) -> Result<Dataset> {
    info!(
        "Loading catalog from {:?} and ratings from {:?}",
        catalog_path, ratings_path
    );

    let (catalog, ratings) = rayon::join(
        || Catalog::load_from_file(catalog_path),
        || RatingLog::load_from_file(ratings_path),
    );
    let catalog = catalog?;
    let ratings = ratings?;

    info!(
        "Loaded {} items and {} ratings from {} users",
        catalog.len(),
        ratings.len(),
        ratings.users().len()
    );

    Ok(Dataset { catalog, ratings })
}
