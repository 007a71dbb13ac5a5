//! The fitted vector space and the `build_index` entry point.

use crate::analyzer::Analyzer;
use crate::blob::content_blob;
use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::tfidf::TfidfModel;
use crate::vector::SparseVector;
use data_loader::{Catalog, Item, ItemIndex};
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, instrument};

/// TF-IDF model plus one vector per catalog item.
///
/// Every vector has the model's dimension and shares its term-to-column
/// mapping; `vectors[i]` belongs to catalog item `i`.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    model: TfidfModel,
    vectors: Vec<SparseVector>,
}

impl VectorSpace {
    pub fn model(&self) -> &TfidfModel {
        &self.model
    }

    /// Vocabulary size (shared by every vector)
    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }

    /// Number of item vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, index: ItemIndex) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }
}

/// Immutable (catalog, vector space) pair.
///
/// Built once and never mutated; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    catalog: Catalog,
    vector_space: VectorSpace,
}

impl CorpusIndex {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vector_space(&self) -> &VectorSpace {
        &self.vector_space
    }

    /// Load a catalog file and index it.
    ///
    /// Any loading failure is reported as `CorpusUnavailable`.
    pub fn load(catalog_path: &Path, config: &IndexerConfig) -> Result<Self> {
        let catalog = Catalog::load_from_file(catalog_path)?;
        build_index(catalog.into_items(), config)
    }
}

/// Build the vector space over a catalog.
///
/// ## Algorithm
/// 1. Build each item's content blob and analyze it into terms (parallel)
/// 2. Fit the TF-IDF model over all documents
/// 3. Transform every document into an L2-normalized vector (parallel)
///
/// Fails with `CorpusUnavailable` when there are no items or no item
/// produces a single term.
#[instrument(skip_all, fields(items = items.len()))]
pub fn build_index(items: Vec<Item>, config: &IndexerConfig) -> Result<CorpusIndex> {
    if items.is_empty() {
        return Err(IndexError::corpus_unavailable("catalog has no items"));
    }

    let analyzer = Analyzer::new(config);
    let documents: Vec<Vec<String>> = items
        .par_iter()
        .map(|item| analyzer.analyze(&content_blob(item, config.joiner)))
        .collect();

    let model = TfidfModel::fit(&documents);
    if model.dimension() == 0 {
        return Err(IndexError::corpus_unavailable(
            "no item produced an indexable term",
        ));
    }

    let vectors: Vec<SparseVector> = documents
        .par_iter()
        .map(|terms| model.transform(terms))
        .collect();

    info!(
        "Indexed {} items over a vocabulary of {} terms",
        vectors.len(),
        model.dimension()
    );

    Ok(CorpusIndex {
        catalog: Catalog::new(items),
        vector_space: VectorSpace { model, vectors },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, genres: &[&str], director: &str, synopsis: &str) -> Item {
        Item {
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            director: director.to_string(),
            synopsis: synopsis.to_string(),
            ..Item::default()
        }
    }

    fn test_items() -> Vec<Item> {
        vec![
            item("The Dark Knight", &["Action", "Crime"], "Christopher Nolan", "Batman fights the Joker in Gotham."),
            item("Inception", &["Action", "Sci-Fi"], "Christopher Nolan", "A thief enters dreams to plant an idea."),
            item("Toy Story", &["Animation", "Comedy"], "John Lasseter", "Toys come alive when nobody watches."),
        ]
    }

    #[test]
    fn test_build_index_shapes() {
        let index = build_index(test_items(), &IndexerConfig::default()).unwrap();
        let space = index.vector_space();

        assert_eq!(index.catalog().len(), 3);
        assert_eq!(space.len(), 3);
        assert!(space.dimension() > 0);
        for vector in space.vectors() {
            assert!((vector.norm() - 1.0).abs() < 1e-5);
            assert!(vector.entries().iter().all(|&(c, _)| c < space.dimension()));
        }
    }

    #[test]
    fn test_joined_names_are_single_terms() {
        let index = build_index(test_items(), &IndexerConfig::default()).unwrap();
        let model = index.vector_space().model();

        assert!(model.column("christopher_nolan").is_some());
        assert!(model.column("christopher").is_none());
    }

    #[test]
    fn test_shared_director_is_more_similar() {
        let index = build_index(test_items(), &IndexerConfig::default()).unwrap();
        let space = index.vector_space();

        let knight = space.vector(0).unwrap();
        let inception = space.vector(1).unwrap();
        let toy_story = space.vector(2).unwrap();

        assert!(knight.dot(inception) > knight.dot(toy_story));
        assert!((knight.dot(knight) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_catalog_is_unavailable() {
        let result = build_index(Vec::new(), &IndexerConfig::default());
        assert!(matches!(result, Err(IndexError::CorpusUnavailable { .. })));
    }

    #[test]
    fn test_catalog_without_terms_is_unavailable() {
        let items = vec![item("Blank", &[], "", ""), item("Also Blank", &[], "", "the a")];
        let result = build_index(items, &IndexerConfig::default());
        assert!(matches!(result, Err(IndexError::CorpusUnavailable { .. })));
    }

    #[test]
    fn test_missing_catalog_file_is_unavailable() {
        let result = CorpusIndex::load(Path::new("no/such/catalog.csv"), &IndexerConfig::default());
        assert!(matches!(result, Err(IndexError::CorpusUnavailable { .. })));
    }
}
