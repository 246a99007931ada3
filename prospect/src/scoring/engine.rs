//! One complete scoring run for a search.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::models::{Article, ArticleEmbedding, RawScoreEntry, ScoreRecord, Search};
use crate::scoring::aggregate::{overall_score, round3};
use crate::scoring::normalize::normalize;
use crate::scoring::signals::{raw_novelty, raw_recency, raw_velocity};
use crate::storage::{OpportunityStore, StorageError};

/// Error type for scoring runs
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// The search id is unknown
    #[error("Search not found: {0}")]
    SearchNotFound(Uuid),

    /// The search has no articles attached, so no score is computable.
    /// Distinct from a computed score of zero.
    #[error("Search {0} has no articles to score")]
    NoArticles(Uuid),

    /// The embedding provider failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// A storage operation failed; the whole run must be retried
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Engine that turns a search's articles into a persisted [`ScoreRecord`].
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    store: Arc<dyn OpportunityStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create an engine over the given store and embedding provider.
    pub fn new(
        store: Arc<dyn OpportunityStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Score a search and persist the result.
    ///
    /// The raw-history read happens before this run's write, so a search
    /// never normalizes against its own not-yet-written scalars. The raw
    /// entry and the score record are persisted in one atomic storage
    /// call; any failure fails the run as a whole.
    pub async fn score_search(&self, search: &Search) -> Result<ScoreRecord, ScoreError> {
        let articles = self.load_articles(search.id).await?;
        if articles.is_empty() {
            return Err(ScoreError::NoArticles(search.id));
        }

        let mut citation_counts = Vec::with_capacity(articles.len());
        for article in &articles {
            citation_counts.push(self.store.latest_citation_count(&article.external_id).await?);
        }

        // Articles without any citation data are dropped from scoring when
        // the set is mixed. When no article has citation data at all the
        // velocity signal is a flat 0.0 and the remaining dimensions are
        // computed over the full set.
        let cited: Vec<usize> = citation_counts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|_| i))
            .collect();
        let scope: Vec<usize> = if cited.is_empty() {
            (0..articles.len()).collect()
        } else {
            cited
        };

        let scoped_articles: Vec<&Article> = scope.iter().map(|&i| &articles[i]).collect();
        let scoped_counts: Vec<Option<u32>> = scope.iter().map(|&i| citation_counts[i]).collect();
        let scoped_dates: Vec<Option<chrono::NaiveDate>> = scoped_articles
            .iter()
            .map(|a| a.publication_date)
            .collect();

        let query_vector = self.embedder.embed(&search.keyword_text).await?;
        let doc_vectors = self.embed_articles(&scoped_articles).await?;
        for (article, vector) in scoped_articles.iter().zip(doc_vectors.iter()) {
            self.store
                .upsert_embedding(ArticleEmbedding::new(
                    article.external_id.clone(),
                    vector.clone(),
                ))
                .await?;
        }

        let today = Utc::now().date_naive();
        let novelty_raw = raw_novelty(&query_vector, &doc_vectors);
        let citation_raw = raw_velocity(&scoped_counts, &scoped_dates, today);
        let recency_raw = raw_recency(&scoped_dates, self.config.recency_window_months, today);
        debug!(
            search_id = %search.id,
            novelty_raw,
            citation_raw,
            recency_raw,
            articles = scoped_articles.len(),
            "raw signals computed"
        );

        // Normalization baseline: every other search's raw scalars,
        // read strictly before this run's write below.
        let history = self.store.raw_history(search.id).await?;
        let novelty_history: Vec<f64> = history.iter().map(|h| h.novelty_raw).collect();
        let citation_history: Vec<f64> = history.iter().map(|h| h.citation_raw).collect();
        let recency_history: Vec<f64> = history.iter().map(|h| h.recency_raw).collect();

        let novelty_score = round3(normalize(novelty_raw, &novelty_history));
        let citation_velocity_score = round3(normalize(citation_raw, &citation_history));
        let recency_score = round3(normalize(recency_raw, &recency_history));

        let record = ScoreRecord {
            search_id: search.id,
            novelty_score,
            citation_velocity_score,
            recency_score,
            overall_score: overall_score(novelty_score, citation_velocity_score, recency_score),
            computed_at: Utc::now(),
        };
        let entry = RawScoreEntry {
            search_id: search.id,
            novelty_raw,
            citation_raw,
            recency_raw,
        };

        self.store.record_scoring_run(entry, record.clone()).await?;
        Ok(record)
    }

    async fn load_articles(&self, search_id: Uuid) -> Result<Vec<Article>, ScoreError> {
        let ids = self.store.search_article_ids(search_id).await?;
        let mut articles = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.store.get_article(id).await? {
                Some(article) => articles.push(article),
                None => warn!(article_id = %id, "linked article missing from store"),
            }
        }
        Ok(articles)
    }

    async fn embed_articles(
        &self,
        articles: &[&Article],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        // Embeddings share no mutable state, so they run concurrently.
        futures::future::try_join_all(
            articles
                .iter()
                .map(|article| async move { self.embedder.embed(&article.embedding_text()).await }),
        )
        .await
    }
}
