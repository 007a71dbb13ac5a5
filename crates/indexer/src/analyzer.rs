//! Text analysis: tokenization, stop-word removal and n-gram generation.

use crate::config::IndexerConfig;
use crate::stopwords::StopWords;

/// Turns a content blob into the list of terms counted by TF-IDF.
///
/// ## Algorithm
/// 1. Lower-case the text
/// 2. Split on every character that is neither alphanumeric nor the joiner
/// 3. Drop short tokens and stop words
/// 4. Emit n-grams over the surviving tokens (bigram = "w1 w2")
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: StopWords,
    ngram_range: (usize, usize),
    joiner: char,
    min_token_len: usize,
}

impl Analyzer {
    pub fn new(config: &IndexerConfig) -> Self {
        // a deserialized config may carry (0, 0)
        let min_n = config.ngram_range.0.max(1);
        let max_n = config.ngram_range.1.max(min_n);
        Self {
            stop_words: StopWords::for_language(config.stop_words),
            ngram_range: (min_n, max_n),
            joiner: config.joiner,
            min_token_len: config.min_token_len,
        }
    }

    /// Unigram tokens after stop-word removal
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let joiner = self.joiner;
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == joiner))
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// All terms of the document, n-grams included, in document order
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
                continue;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}
