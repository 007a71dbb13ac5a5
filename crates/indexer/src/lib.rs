//! # Indexer Crate
//!
//! Turns a movie catalog into a TF-IDF vector space.
//!
//! ## Components
//!
//! ### Content blob
//! Each item becomes one document: genres, director and cast as single
//! joined tokens, followed by the synopsis.
//!
//! ### Analyzer
//! Lower-cases, tokenizes, removes stop words, then emits unigrams and
//! bigrams (configurable through [`IndexerConfig`]).
//!
//! ### TF-IDF model
//! Smoothed IDF, raw term frequency, L2-normalized vectors. The vocabulary
//! is sorted so column assignment is deterministic.
//!
//! ## Example Usage
//!
//! ```ignore
//! use indexer::{build_index, IndexerConfig};
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/filmes.csv"))?;
//! let index = build_index(catalog.into_items(), &IndexerConfig::default())?;
//!
//! let space = index.vector_space();
//! println!("{} items, {} terms", space.len(), space.dimension());
//! ```

pub mod analyzer;
pub mod blob;
pub mod config;
pub mod error;
pub mod space;
pub mod stopwords;
pub mod tfidf;
pub mod vector;

pub use analyzer::Analyzer;
pub use blob::content_blob;
pub use config::{IndexerConfig, StopWordLanguage};
pub use error::{IndexError, Result};
pub use space::{build_index, CorpusIndex, VectorSpace};
pub use tfidf::TfidfModel;
pub use vector::{DenseVector, SparseVector};
