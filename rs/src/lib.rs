//! learnrec: learning content recommendation engine
//!
//! Turns a population's interaction history into ranked course suggestions
//! for one learner, using collaborative filtering, content-based scoring or a
//! hybrid of both, and evaluates any produced list against the learner's own
//! positive ratings.
//!
//! This library provides both a programmatic API for embedding into other
//! applications and a standalone MCP server for direct usage.

pub mod constants;
pub mod engine;
pub mod matrix;
pub mod metrics;
pub mod models;
pub mod sample;
pub mod server;
pub mod storage;

// Re-export main types for convenience
pub use engine::RecommendationEngine;
pub use matrix::{cosine_similarity, InteractionMatrix};
pub use metrics::{MetricSet, StrategyReport};
pub use models::{
    Dataset, Difficulty, Interaction, InteractionKind, Item, LearningStyle, Person,
    Recommendation, Strategy,
};
pub use server::LearnRecServer;
pub use storage::{LearningStore, MemoryStore, StoreError};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
