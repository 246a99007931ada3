//! The opportunity engine: the context object wiring storage, embeddings,
//! scoring, forecasting, and clustering together.
//!
//! One engine is constructed at process start and passed around by
//! reference (usually `Arc`); components never reach for global state.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::cluster::{ClusterEngine, ClusterSnapshot};
use crate::config::ProspectConfig;
use crate::embedding::EmbeddingProvider;
use crate::forecast::CitationForecaster;
use crate::ingestion::ArticleMetadata;
use crate::models::{CitationHistoryPoint, CitationSnapshot, ScoreRecord, Search};
use crate::scoring::{ScoreError, ScoringEngine};
use crate::storage::OpportunityStore;
use crate::Result;

/// Source tag recorded on citation snapshots stored during ingestion.
const INGEST_SOURCE: &str = "ingest";

/// The primary interface for scoring searches and maintaining topic
/// clusters.
///
/// Scoring runs for different searches may interleave freely; the set of
/// history values two concurrent runs normalize against is not
/// deterministic, but every history write is atomic so neither ever sees
/// a torn entry. Clustering passes are serialized by an internal lock and
/// publish their output as an immutable snapshot swapped in atomically.
#[derive(Debug)]
pub struct OpportunityEngine {
    store: Arc<dyn OpportunityStore>,
    scoring: ScoringEngine,
    clustering: ClusterEngine,
    config: ProspectConfig,

    /// Output of the most recent successful clustering pass
    cluster_snapshot: RwLock<Arc<ClusterSnapshot>>,

    /// At most one clustering pass may be in flight at a time
    cluster_gate: Mutex<()>,
}

impl OpportunityEngine {
    /// Create an engine over the given store and embedding provider.
    pub fn new(
        store: Arc<dyn OpportunityStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: ProspectConfig,
    ) -> Self {
        let forecaster = CitationForecaster::new(config.forecast.horizon);
        let scoring = ScoringEngine::new(
            Arc::clone(&store),
            embedder,
            config.scoring.clone(),
        );
        let clustering = ClusterEngine::new(
            Arc::clone(&store),
            forecaster,
            config.clustering.clone(),
        );

        Self {
            store,
            scoring,
            clustering,
            config,
            cluster_snapshot: RwLock::new(Arc::new(ClusterSnapshot::empty())),
            cluster_gate: Mutex::new(()),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ProspectConfig {
        &self.config
    }

    /// Create and persist a new search.
    pub async fn create_search(
        &self,
        idea_text: impl Into<String>,
        keyword_text: impl Into<String>,
        max_results: usize,
    ) -> Result<Search> {
        let search = Search::new(idea_text, keyword_text, max_results);
        Ok(self.store.create_search(search).await?)
    }

    /// Store fetched article metadata and attach the articles to a search.
    ///
    /// Articles are deduplicated globally by external id; citation counts
    /// and histories are recorded when present and simply skipped when the
    /// source did not provide them. Returns the number of linked articles.
    pub async fn ingest_results(
        &self,
        search_id: Uuid,
        results: Vec<ArticleMetadata>,
    ) -> Result<usize> {
        let linked = results.len();
        for metadata in results {
            let article = self.store.upsert_article(metadata.article).await?;

            if let Some(count) = metadata.citation_count {
                self.store
                    .add_citation_snapshot(CitationSnapshot::now(
                        article.external_id.clone(),
                        count,
                        INGEST_SOURCE,
                    ))
                    .await?;
            }
            if !metadata.citation_history.is_empty() {
                let points = metadata
                    .citation_history
                    .iter()
                    .map(|&(year, count)| CitationHistoryPoint { year, count })
                    .collect();
                self.store
                    .put_citation_history(&article.external_id, points)
                    .await?;
            }

            self.store
                .link_article(search_id, &article.external_id)
                .await?;
        }
        info!(%search_id, articles = linked, "ingested search results");
        Ok(linked)
    }

    /// Return a search's score, computing one first if none exists yet.
    pub async fn score(&self, search_id: Uuid) -> Result<ScoreRecord> {
        if let Some(record) = self.store.latest_score(search_id).await? {
            return Ok(record);
        }
        self.rescore(search_id).await
    }

    /// Run a fresh scoring pass for a search, regardless of existing
    /// records.
    ///
    /// Re-scoring reads the raw-score history as it stands now, so the
    /// result may differ from earlier records for the same search; older
    /// records are retained for audit.
    pub async fn rescore(&self, search_id: Uuid) -> Result<ScoreRecord> {
        let search = self
            .store
            .get_search(search_id)
            .await?
            .ok_or(ScoreError::SearchNotFound(search_id))?;
        let record = self.scoring.score_search(&search).await?;
        info!(
            %search_id,
            overall = record.overall_score,
            "scoring run persisted"
        );
        Ok(record)
    }

    /// The most recent score record for a search.
    ///
    /// `None` means "not yet scored" - a valid state while background
    /// scoring is pending or after it failed - never a stale record from
    /// some other search.
    pub async fn latest_score(&self, search_id: Uuid) -> Result<Option<ScoreRecord>> {
        Ok(self.store.latest_score(search_id).await?)
    }

    /// Score a search on a background task, off the request path.
    pub fn spawn_score(self: &Arc<Self>, search_id: Uuid) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = engine.rescore(search_id).await {
                error!(%search_id, error = %e, "background scoring failed");
            }
        })
    }

    /// Run one full clustering-and-forecasting pass.
    ///
    /// Passes are mutually exclusive; a second caller waits for the first
    /// to finish. On success the new snapshot replaces the current one
    /// atomically; on failure the previous snapshot and the persisted
    /// cluster table both survive untouched.
    pub async fn cluster_and_forecast(&self) -> Result<Arc<ClusterSnapshot>> {
        let _gate = self.cluster_gate.lock().await;
        let snapshot = Arc::new(self.clustering.rebuild().await?);
        *self
            .cluster_snapshot
            .write()
            .expect("cluster snapshot lock poisoned") = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// Trigger a clustering pass without waiting for it.
    pub fn spawn_cluster_and_forecast(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = engine.cluster_and_forecast().await {
                error!(error = %e, "background clustering pass failed");
            }
        })
    }

    /// The output of the most recent successful clustering pass.
    ///
    /// Labels in the snapshot are valid only until the next pass
    /// completes.
    pub fn current_clusters(&self) -> Arc<ClusterSnapshot> {
        Arc::clone(
            &self
                .cluster_snapshot
                .read()
                .expect("cluster snapshot lock poisoned"),
        )
    }

    /// Release storage resources.
    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.store.close().await?)
    }
}
