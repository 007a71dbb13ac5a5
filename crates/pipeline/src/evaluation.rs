//! Evaluation Engine - offline precision/recall/F1
//!
//! A recommendation list is compared against the user's full rating
//! history, independent of what was excluded while ranking:
//!
//! ```text
//! TP = recommended ∩ liked        FP = recommended ∩ disliked
//! FN = liked − recommended        TN = disliked − recommended
//!
//! precision = |TP| / |recommended|
//! recall    = |TP| / |liked|
//! F1        = 2 × precision × recall / (precision + recall)
//! ```
//!
//! Each ratio is 0 when its denominator is.

use crate::user_labels;
use data_loader::{Catalog, ItemIndex, Rating, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Evaluation result for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: BTreeSet<String>,
    pub false_positives: BTreeSet<String>,
    pub false_negatives: BTreeSet<String>,
    pub true_negatives: BTreeSet<String>,
}

impl Metrics {
    /// Build from the recommended set and the ground-truth sets.
    ///
    /// `label` renders each key in the reported sets.
    fn from_sets<K: Ord>(
        recommended: &BTreeSet<K>,
        liked: &BTreeSet<K>,
        disliked: &BTreeSet<K>,
        label: impl Fn(&K) -> String,
    ) -> Self {
        let tp: Vec<&K> = recommended.intersection(liked).collect();
        let fp: Vec<&K> = recommended.intersection(disliked).collect();
        let fn_: Vec<&K> = liked.difference(recommended).collect();
        let tn: Vec<&K> = disliked.difference(recommended).collect();

        let precision = ratio(tp.len(), recommended.len());
        let recall = ratio(tp.len(), liked.len());
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let render = |keys: Vec<&K>| -> BTreeSet<String> { keys.into_iter().map(&label).collect() };
        Self {
            precision,
            recall,
            f1,
            true_positives: render(tp),
            false_positives: render(fp),
            false_negatives: render(fn_),
            true_negatives: render(tn),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Evaluate a list of recommended titles for `user_id`, matching by title.
///
/// Ratings pointing outside the catalog are ignored.
#[instrument(skip(recommended_titles, ratings, catalog))]
pub fn evaluate<S: AsRef<str>>(
    user_id: UserId,
    recommended_titles: &[S],
    ratings: &[Rating],
    catalog: &Catalog,
) -> Metrics {
    let recommended: BTreeSet<&str> = recommended_titles.iter().map(|title| title.as_ref()).collect();

    let mut liked = BTreeSet::new();
    let mut disliked = BTreeSet::new();
    for (item_id, label) in user_labels(user_id, ratings) {
        let Some(title) = catalog.resolve(item_id).and_then(|index| catalog.title(index)) else {
            continue;
        };
        if label.is_liked() {
            liked.insert(title);
        } else {
            disliked.insert(title);
        }
    }

    let metrics = Metrics::from_sets(&recommended, &liked, &disliked, |title| title.to_string());
    debug!(
        "precision={:.4} recall={:.4} f1={:.4}",
        metrics.precision, metrics.recall, metrics.f1
    );
    metrics
}

/// Evaluate a list of recommended catalog indices for `user_id`, matching
/// by index.
///
/// Use this when the catalog holds duplicate titles. Reported entries read
/// `"#<index> <title>"` so duplicates stay distinguishable.
#[instrument(skip(recommended, ratings, catalog))]
pub fn evaluate_indices(
    user_id: UserId,
    recommended: &[ItemIndex],
    ratings: &[Rating],
    catalog: &Catalog,
) -> Metrics {
    let recommended: BTreeSet<ItemIndex> = recommended
        .iter()
        .copied()
        .filter(|&index| index < catalog.len())
        .collect();

    let mut liked = BTreeSet::new();
    let mut disliked = BTreeSet::new();
    for (item_id, label) in user_labels(user_id, ratings) {
        let Some(index) = catalog.resolve(item_id) else {
            continue;
        };
        if label.is_liked() {
            liked.insert(index);
        } else {
            disliked.insert(index);
        }
    }

    let metrics = Metrics::from_sets(&recommended, &liked, &disliked, |&index| {
        format!("#{} {}", index, catalog.title(index).unwrap_or_default())
    });
    debug!(
        "precision={:.4} recall={:.4} f1={:.4}",
        metrics.precision, metrics.recall, metrics.f1
    );
    metrics
}

/// Macro-averaged metrics over many users
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub users: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl FromIterator<Metrics> for MetricsSummary {
    fn from_iter<I: IntoIterator<Item = Metrics>>(iter: I) -> Self {
        let mut summary = MetricsSummary::default();
        for metrics in iter {
            summary.users += 1;
            summary.precision += metrics.precision;
            summary.recall += metrics.recall;
            summary.f1 += metrics.f1;
        }

        if summary.users > 0 {
            let n = summary.users as f64;
            summary.precision /= n;
            summary.recall /= n;
            summary.f1 /= n;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Item, RatingLabel};

    fn create_test_catalog(titles: &[&str]) -> Catalog {
        Catalog::new(
            titles
                .iter()
                .map(|title| Item {
                    title: title.to_string(),
                    ..Item::default()
                })
                .collect(),
        )
    }

    fn titles(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_evaluate_basic() {
        let catalog = create_test_catalog(&["A", "B", "C", "D"]);
        let ratings = vec![
            Rating::new(1, 0, RatingLabel::Liked),
            Rating::new(1, 1, RatingLabel::Liked),
        ];

        let metrics = evaluate(1, &["A", "C"], &ratings, &catalog);

        assert_eq!(metrics.true_positives, titles(&["A"]));
        assert_eq!(metrics.false_negatives, titles(&["B"]));
        assert!(metrics.false_positives.is_empty());
        assert!(metrics.true_negatives.is_empty());
        assert!((metrics.precision - 0.5).abs() < 1e-9);
        assert!((metrics.recall - 0.5).abs() < 1e-9);
        assert!((metrics.f1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_negatives() {
        let catalog = create_test_catalog(&["A", "B", "C", "D"]);
        let ratings = vec![
            Rating::new(1, 0, RatingLabel::Liked),
            Rating::new(1, 2, RatingLabel::Disliked),
            Rating::new(1, 3, RatingLabel::Disliked),
            // Other users and out-of-range references do not count
            Rating::new(2, 1, RatingLabel::Liked),
            Rating::new(1, 10, RatingLabel::Liked),
        ];

        let metrics = evaluate(1, &["A", "C"], &ratings, &catalog);

        assert_eq!(metrics.true_positives, titles(&["A"]));
        assert_eq!(metrics.false_positives, titles(&["C"]));
        assert_eq!(metrics.true_negatives, titles(&["D"]));
        assert!(metrics.false_negatives.is_empty());
        assert!((metrics.recall - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_empty_inputs() {
        let catalog = create_test_catalog(&["A", "B"]);
        let empty: [&str; 0] = [];

        let metrics = evaluate(1, &empty, &[], &catalog);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);

        let metrics = evaluate(1, &["B"], &[Rating::new(1, 0, RatingLabel::Liked)], &catalog);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_evaluate_indices_with_duplicate_titles() {
        let catalog = create_test_catalog(&["Heat", "Heat", "Up"]);
        let ratings = vec![
            Rating::new(1, 0, RatingLabel::Liked),
            Rating::new(1, 1, RatingLabel::Disliked),
        ];

        let metrics = evaluate_indices(1, &[1, 2], &ratings, &catalog);

        assert!(metrics.true_positives.is_empty());
        assert_eq!(metrics.false_positives, titles(&["#1 Heat"]));
        assert_eq!(metrics.false_negatives, titles(&["#0 Heat"]));
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
    }

    #[test]
    fn test_summary_macro_average() {
        let a = Metrics {
            precision: 1.0,
            recall: 0.5,
            f1: 2.0 / 3.0,
            ..Metrics::default()
        };
        let b = Metrics::default();

        let summary: MetricsSummary = vec![a, b].into_iter().collect();
        assert_eq!(summary.users, 2);
        assert!((summary.precision - 0.5).abs() < 1e-9);
        assert!((summary.recall - 0.25).abs() < 1e-9);

        let empty: MetricsSummary = Vec::<Metrics>::new().into_iter().collect();
        assert_eq!(empty.users, 0);
        assert_eq!(empty.f1, 0.0);
    }
}
