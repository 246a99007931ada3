//! # Prospect
//!
//! Research opportunity scoring for scientific literature searches. A search
//! (a research idea plus a keyword query) is scored on three dimensions -
//! novelty, citation velocity, and recency - each normalized against the
//! history of raw scores from prior searches, then averaged into an overall
//! opportunity score with a recommendation band. Around the scoring core sit
//! a citation forecaster and a density-based topic clusterer that group
//! stored article embeddings into emerging research areas.
//!
//! ## Quick Start
//!
//! ```rust
//! use prospect::prelude::*;
//!
//! async fn example() -> Result<()> {
//!     // In-memory storage plus a deterministic embedding provider
//!     let engine = init_with_defaults().await?;
//!
//!     let search = engine
//!         .create_search(
//!             "CRISPR delivery via lipid nanoparticles",
//!             "crispr lipid nanoparticle delivery",
//!             25,
//!         )
//!         .await?;
//!
//!     let article = ArticleBuilder::new("pmid-100", "Lipid nanoparticle design")
//!         .abstract_text("Ionizable lipids for mRNA and gene-editor delivery.")
//!         .build();
//!     engine
//!         .ingest_results(search.id, vec![ArticleMetadata::bare(article)])
//!         .await?;
//!
//!     let record = engine.score(search.id).await?;
//!     let band = Recommendation::from_overall(record.overall_score);
//!     println!("{}: {}", record.overall_score, band);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Score interpretation
//!
//! Scores are *relative*, not absolute: each dimension is min-max normalized
//! against the raw scores of every previously scored search, so the same
//! search scored at two different times can legitimately receive two
//! different values. The very first search always scores 1.0 on every
//! dimension (a single-point history is degenerate). Treat scores as a
//! ranking signal across a growing body of searches, not as a reproducible
//! measurement.
//!
//! ## BYOE (Bring Your Own Embeddings)
//!
//! Novelty scoring and topic clustering consume embeddings through the
//! [`embedding::EmbeddingProvider`] trait. Implement it over your provider
//! of choice (OpenAI, Cohere, a local sentence-transformer service) and pass
//! it to [`init`]; [`init_with_defaults`] wires in a deterministic hashing
//! provider suitable for tests and offline use.

pub mod cluster;
pub mod config;
pub mod core;
pub mod embedding;
pub mod forecast;
pub mod ingestion;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export core initialization functions
    pub use crate::{init, init_with_defaults};

    // The engine itself
    pub use crate::core::OpportunityEngine;

    // Re-export config types
    pub use crate::config::{
        ConfigBuilder, ConfigLoader, LogFormat, LogLevel, ProspectConfig,
    };

    // Re-export model types
    pub use crate::models::{
        Article, ArticleBuilder, CitationHistoryPoint, ScoreRecord, Search, TopicCluster,
    };

    // Ingestion and embedding seams
    pub use crate::embedding::{EmbeddingProvider, EmbeddingError};
    pub use crate::ingestion::{ArticleMetadata, ArticleSource};

    // Scoring surface
    pub use crate::scoring::{Recommendation, ScoringEngine};

    // Clustering surface
    pub use crate::cluster::{ClusterSnapshot, ClusterEngine};

    // Re-export storage types for advanced usage
    pub use crate::storage::{MemoryStore, OpportunityStore, StorageError};

    // Re-export essential result type
    pub use crate::{ProspectError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Prospect operations
#[derive(Debug, thiserror::Error)]
pub enum ProspectError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Error during a scoring run
    #[error("Scoring error: {0}")]
    Scoring(#[from] scoring::ScoreError),

    /// Error during a clustering pass
    #[error("Clustering error: {0}")]
    Clustering(#[from] cluster::ClusterError),

    /// Error from the embedding provider
    #[error("Embedding error: {0}")]
    Embedding(#[from] embedding::EmbeddingError),

    /// Error while ingesting article metadata
    #[error("Ingestion error: {0}")]
    Ingestion(#[from] ingestion::IngestError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),
}

/// Result type for Prospect operations
pub type Result<T> = std::result::Result<T, ProspectError>;

/// Initialize Prospect with default configuration.
///
/// Uses in-memory storage and the deterministic hashing embedding provider.
/// Good for tests, examples, and offline experimentation; production use
/// should call [`init`] with a real embedding provider.
pub async fn init_with_defaults() -> Result<std::sync::Arc<core::OpportunityEngine>> {
    let config = config::ConfigBuilder::defaults().build()?;
    let embedder = std::sync::Arc::new(embedding::deterministic::HashEmbedding::new(
        config.embedding.dimension,
    ));
    init(config, embedder).await
}

/// Initialize Prospect with the provided configuration and embedding
/// provider.
///
/// Installs the logging subscriber described by `config.logging` (ignoring
/// the error when one is already installed, as happens when embedding this
/// crate in a larger application) and returns a ready-to-use
/// [`core::OpportunityEngine`].
pub async fn init(
    config: config::ProspectConfig,
    embedder: std::sync::Arc<dyn embedding::EmbeddingProvider>,
) -> Result<std::sync::Arc<core::OpportunityEngine>> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let store = std::sync::Arc::new(storage::MemoryStore::new());

    Ok(std::sync::Arc::new(core::OpportunityEngine::new(
        store, embedder, config,
    )))
}
