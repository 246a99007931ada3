//! Trait definitions for storage backends.
//!
//! The two shared mutable structures - the raw score history and the
//! cluster table - are only ever written through single atomic calls
//! ([`ScoreStore::record_scoring_run`] and
//! [`ClusterStore::replace_clusters`]); a reader sees each write in full or
//! not at all.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Article, ArticleEmbedding, CitationHistoryPoint, CitationSnapshot, ClusterAssignment,
    RawScoreEntry, ScoreRecord, Search, TopicCluster,
};
use crate::storage::errors::StorageResult;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> StorageResult<bool>;

    /// Clear all data in the store
    async fn clear(&self) -> StorageResult<()>;

    /// Close connections and release resources
    async fn close(&self) -> StorageResult<()>;
}

/// Trait for search operations
#[async_trait]
pub trait SearchStore: BaseStore {
    /// Create a new search; searches are immutable after creation
    async fn create_search(&self, search: Search) -> StorageResult<Search>;

    /// Get a search by its id
    async fn get_search(&self, id: Uuid) -> StorageResult<Option<Search>>;

    /// Attach an article to a search (idempotent)
    async fn link_article(&self, search_id: Uuid, article_id: &str) -> StorageResult<()>;

    /// List the external ids of articles attached to a search
    async fn search_article_ids(&self, search_id: Uuid) -> StorageResult<Vec<String>>;
}

/// Trait for article and citation-data operations
#[async_trait]
pub trait ArticleStore: BaseStore {
    /// Insert an article, deduplicating by external id. Returns the stored
    /// article (the existing one when the id was already known).
    async fn upsert_article(&self, article: Article) -> StorageResult<Article>;

    /// Get an article by its external id
    async fn get_article(&self, external_id: &str) -> StorageResult<Option<Article>>;

    /// Record a citation count observation for an article
    async fn add_citation_snapshot(&self, snapshot: CitationSnapshot) -> StorageResult<()>;

    /// The most recently observed citation count, if any
    async fn latest_citation_count(&self, article_id: &str) -> StorageResult<Option<u32>>;

    /// Replace the stored per-year citation history of an article
    async fn put_citation_history(
        &self,
        article_id: &str,
        points: Vec<CitationHistoryPoint>,
    ) -> StorageResult<()>;

    /// The per-year citation history of an article, ordered by year;
    /// empty when none has been recorded
    async fn citation_history(&self, article_id: &str) -> StorageResult<Vec<CitationHistoryPoint>>;

    /// Store or refresh an article's embedding. An existing cluster label
    /// is preserved when the incoming embedding carries none.
    async fn upsert_embedding(&self, embedding: ArticleEmbedding) -> StorageResult<()>;

    /// All stored article embeddings
    async fn list_embeddings(&self) -> StorageResult<Vec<ArticleEmbedding>>;
}

/// Trait for score history and score record operations
#[async_trait]
pub trait ScoreStore: BaseStore {
    /// Raw score entries of every search except the given one.
    ///
    /// This is the normalization read; within one scoring run it must
    /// happen before that run's [`Self::record_scoring_run`] write so a
    /// search never normalizes against its own not-yet-written scalars.
    async fn raw_history(&self, exclude_search: Uuid) -> StorageResult<Vec<RawScoreEntry>>;

    /// Persist one completed scoring run: append the raw entry and store
    /// the score record as a single atomic write. A partially persisted
    /// run (one written without the other) is a correctness bug.
    async fn record_scoring_run(
        &self,
        entry: RawScoreEntry,
        record: ScoreRecord,
    ) -> StorageResult<()>;

    /// The most recent score record for a search, if any
    async fn latest_score(&self, search_id: Uuid) -> StorageResult<Option<ScoreRecord>>;

    /// All score records for a search, oldest first (retained for audit)
    async fn list_scores(&self, search_id: Uuid) -> StorageResult<Vec<ScoreRecord>>;
}

/// Trait for topic cluster operations
#[async_trait]
pub trait ClusterStore: BaseStore {
    /// Replace the entire cluster table and all article labels in one
    /// atomic write. Called only after a clustering pass has fully
    /// succeeded; a failed pass leaves the previous state intact.
    async fn replace_clusters(
        &self,
        assignments: Vec<ClusterAssignment>,
        clusters: Vec<TopicCluster>,
    ) -> StorageResult<()>;

    /// All topic clusters from the most recent completed pass
    async fn list_clusters(&self) -> StorageResult<Vec<TopicCluster>>;
}

/// Combined trait for everything the opportunity engine needs
pub trait OpportunityStore: SearchStore + ArticleStore + ScoreStore + ClusterStore {}

impl<T: SearchStore + ArticleStore + ScoreStore + ClusterStore> OpportunityStore for T {}
