//! Engine configuration.
//!
//! Loaded from an optional JSON file; every key is optional:
//!
//! ```json
//! {
//!   "indexer": { "ngram_range": [1, 2], "stop_words": "portuguese" },
//!   "damping": 0.5,
//!   "default_limit": 10
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use indexer::IndexerConfig;
use pipeline::DEFAULT_DAMPING;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indexer: IndexerConfig,
    /// Weight of a dislike relative to a like
    pub damping: f32,
    /// Recommendations returned when the caller does not ask for a count
    pub default_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indexer: IndexerConfig::default(),
            damping: DEFAULT_DAMPING,
            default_limit: 10,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Read `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Configure the dislike weight (default: 0.5)
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Configure the text analysis settings
    pub fn with_indexer(mut self, indexer: IndexerConfig) -> Self {
        self.indexer = indexer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexer::StopWordLanguage;
    use std::io::Write;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "damping": 0.25 }"#).unwrap();
        assert_eq!(config.damping, 0.25);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.indexer, IndexerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "indexer": {{ "ngram_range": [1, 1], "stop_words": "portuguese" }}, "default_limit": 5 }}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.indexer.ngram_range, (1, 1));
        assert_eq!(config.indexer.stop_words, StopWordLanguage::Portuguese);
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.damping, DEFAULT_DAMPING);
    }

    #[test]
    fn test_missing_or_invalid_file() {
        assert!(EngineConfig::load(Path::new("no/such/config.json")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(EngineConfig::load(file.path()).is_err());

        assert_eq!(EngineConfig::load_or_default(None).unwrap(), EngineConfig::default());
    }
}
