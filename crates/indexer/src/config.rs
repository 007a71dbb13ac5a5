//! Corpus-tuning parameters.

use serde::{Deserialize, Serialize};

/// Stop-word list applied before n-grams are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWordLanguage {
    English,
    Portuguese,
    /// Keep every token
    None,
}

/// How item text is turned into terms.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Inclusive (min, max) n-gram lengths
    pub ngram_range: (usize, usize),
    pub stop_words: StopWordLanguage,
    /// Replaces whitespace inside categorical values ("Christopher Nolan" -> "christopher_nolan")
    pub joiner: char,
    /// Tokens shorter than this (in characters) are dropped
    pub min_token_len: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            stop_words: StopWordLanguage::English,
            joiner: '_',
            min_token_len: 2,
        }
    }
}

impl IndexerConfig {
    /// Configure the n-gram range (default: 1..=2)
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    /// Configure the stop-word list (default: English)
    pub fn with_stop_words(mut self, language: StopWordLanguage) -> Self {
        self.stop_words = language;
        self
    }

    /// Configure the joiner for multi-word categorical values (default: '_')
    pub fn with_joiner(mut self, joiner: char) -> Self {
        self.joiner = joiner;
        self
    }

    /// Configure the shortest kept token, in characters (default: 2)
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }
}
