//! Error types for the indexer crate.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors that can occur while building the vector space
#[derive(Error, Debug)]
pub enum IndexError {
    /// The catalog is missing, empty or unreadable.
    ///
    /// No model is produced; the engine must not serve recommendations
    /// until a later rebuild succeeds.
    #[error("Corpus unavailable: {reason}")]
    CorpusUnavailable { reason: String },
}

impl IndexError {
    pub fn corpus_unavailable(reason: impl Into<String>) -> Self {
        IndexError::CorpusUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<DataLoadError> for IndexError {
    fn from(err: DataLoadError) -> Self {
        IndexError::corpus_unavailable(err.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, IndexError>;
