//! TF-IDF term weighting.
//!
//! ```text
//! tfidf(t, d) = tf(t, d) × idf(t)
//! tf(t, d)    = count of t in d
//! idf(t)      = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! Document vectors are L2-normalized, so the dot product of two of them
//! is their cosine similarity.

use crate::vector::SparseVector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Fitted vocabulary and IDF weights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfModel {
    /// term -> column
    vocabulary: HashMap<String, usize>,
    /// column -> term, sorted lexicographically
    terms: Vec<String>,
    /// IDF weight per column
    idf: Vec<f32>,
    /// Number of documents the model was fit on
    n_documents: usize,
}

impl TfidfModel {
    /// Fit over analyzed documents (one term list per document).
    ///
    /// Columns are assigned in lexicographic term order so the same corpus
    /// always yields the same term-to-column mapping.
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let n_documents = documents.len();

        let doc_freq: HashMap<&str, u32> = documents
            .par_iter()
            .fold(HashMap::new, |mut local, terms| {
                let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
                for term in unique {
                    *local.entry(term).or_insert(0) += 1;
                }
                local
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (term, count) in local {
                    *acc.entry(term).or_insert(0) += count;
                }
                acc
            });

        let sorted: BTreeMap<&str, u32> = doc_freq.into_iter().collect();

        let n = n_documents as f32;
        let mut vocabulary = HashMap::with_capacity(sorted.len());
        let mut terms = Vec::with_capacity(sorted.len());
        let mut idf = Vec::with_capacity(sorted.len());
        for (column, (term, df)) in sorted.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), column);
            terms.push(term.to_string());
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        Self {
            vocabulary,
            terms,
            idf,
            n_documents,
        }
    }

    /// Weight an analyzed document. Terms outside the vocabulary are ignored.
    pub fn transform(&self, terms: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in terms {
            if let Some(&column) = self.vocabulary.get(term) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(column, tf)| (column, tf as f32 * self.idf[column]))
            .collect();

        let mut vector = SparseVector::from_entries(entries);
        vector.normalize();
        vector
    }

    /// Vocabulary size
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.column(term).map(|column| self.idf[column])
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let model = TfidfModel::fit(&docs(&["zebra apple", "mango apple"]));
        assert_eq!(model.dimension(), 3);
        assert_eq!(model.term(0), Some("apple"));
        assert_eq!(model.term(1), Some("mango"));
        assert_eq!(model.term(2), Some("zebra"));
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let model = TfidfModel::fit(&docs(&["common rare", "common", "common"]));
        let common = model.idf("common").unwrap();
        let rare = model.idf("rare").unwrap();

        // Smoothed idf of a term present everywhere is exactly 1
        assert!((common - 1.0).abs() < 1e-6);
        assert!(rare > common);
    }

    #[test]
    fn test_transform_is_normalized() {
        let corpus = docs(&["batman joker gotham", "batman robin", "toy cowboy"]);
        let model = TfidfModel::fit(&corpus);

        for doc in &corpus {
            let v = model.transform(doc);
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let model = TfidfModel::fit(&docs(&["batman"]));
        let v = model.transform(&["superman".to_string()]);
        assert!(v.is_zero());
    }
}
