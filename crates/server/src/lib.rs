//! Server crate for the content-based recommendation engine.
//!
//! This crate contains the engine that owns the published model and the
//! rating log, and runs the pipeline for each request.

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::{CatalogEntry, ModelHandle, MovieRecommendation, RecommendationEngine};
