//! In-memory storage backend.
//!
//! All tables live behind one `RwLock`, which makes the two multi-table
//! writes ([`ScoreStore::record_scoring_run`] and
//! [`ClusterStore::replace_clusters`]) atomic without further machinery.
//! Suitable for tests, examples, and embedded use; a database-backed store
//! implements the same traits.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Article, ArticleEmbedding, CitationHistoryPoint, CitationSnapshot, ClusterAssignment,
    RawScoreEntry, ScoreRecord, Search, TopicCluster,
};
use crate::storage::errors::{StorageError, StorageResult};
use crate::storage::traits::{ArticleStore, BaseStore, ClusterStore, ScoreStore, SearchStore};

#[derive(Debug, Default)]
struct Tables {
    searches: HashMap<Uuid, Search>,
    search_articles: HashMap<Uuid, Vec<String>>,
    articles: HashMap<String, Article>,
    citation_snapshots: HashMap<String, Vec<CitationSnapshot>>,
    citation_histories: HashMap<String, Vec<CitationHistoryPoint>>,
    embeddings: HashMap<String, ArticleEmbedding>,
    raw_history: Vec<RawScoreEntry>,
    scores: Vec<ScoreRecord>,
    clusters: Vec<TopicCluster>,
}

/// In-memory implementation of all storage traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::Internal(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::Internal(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    async fn clear(&self) -> StorageResult<()> {
        *self.write()? = Tables::default();
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn create_search(&self, search: Search) -> StorageResult<Search> {
        let mut tables = self.write()?;
        if tables.searches.contains_key(&search.id) {
            return Err(StorageError::AlreadyExists(format!(
                "search {} already exists",
                search.id
            )));
        }
        tables.searches.insert(search.id, search.clone());
        Ok(search)
    }

    async fn get_search(&self, id: Uuid) -> StorageResult<Option<Search>> {
        Ok(self.read()?.searches.get(&id).cloned())
    }

    async fn link_article(&self, search_id: Uuid, article_id: &str) -> StorageResult<()> {
        let mut tables = self.write()?;
        if !tables.searches.contains_key(&search_id) {
            return Err(StorageError::NotFound(format!("search {search_id}")));
        }
        let linked = tables.search_articles.entry(search_id).or_default();
        if !linked.iter().any(|id| id == article_id) {
            linked.push(article_id.to_string());
        }
        Ok(())
    }

    async fn search_article_ids(&self, search_id: Uuid) -> StorageResult<Vec<String>> {
        Ok(self
            .read()?
            .search_articles
            .get(&search_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn upsert_article(&self, article: Article) -> StorageResult<Article> {
        let mut tables = self.write()?;
        // Articles are immutable once stored; dedupe by external id.
        if let Some(existing) = tables.articles.get(&article.external_id) {
            return Ok(existing.clone());
        }
        tables
            .articles
            .insert(article.external_id.clone(), article.clone());
        Ok(article)
    }

    async fn get_article(&self, external_id: &str) -> StorageResult<Option<Article>> {
        Ok(self.read()?.articles.get(external_id).cloned())
    }

    async fn add_citation_snapshot(&self, snapshot: CitationSnapshot) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables
            .citation_snapshots
            .entry(snapshot.article_id.clone())
            .or_default()
            .push(snapshot);
        Ok(())
    }

    async fn latest_citation_count(&self, article_id: &str) -> StorageResult<Option<u32>> {
        let tables = self.read()?;
        Ok(tables
            .citation_snapshots
            .get(article_id)
            .and_then(|snapshots| snapshots.iter().max_by_key(|s| s.observed_at))
            .map(|s| s.total_count))
    }

    async fn put_citation_history(
        &self,
        article_id: &str,
        mut points: Vec<CitationHistoryPoint>,
    ) -> StorageResult<()> {
        points.sort_by_key(|p| p.year);
        self.write()?
            .citation_histories
            .insert(article_id.to_string(), points);
        Ok(())
    }

    async fn citation_history(&self, article_id: &str) -> StorageResult<Vec<CitationHistoryPoint>> {
        Ok(self
            .read()?
            .citation_histories
            .get(article_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_embedding(&self, mut embedding: ArticleEmbedding) -> StorageResult<()> {
        let mut tables = self.write()?;
        if embedding.cluster_label.is_none() {
            if let Some(existing) = tables.embeddings.get(&embedding.article_id) {
                embedding.cluster_label = existing.cluster_label;
            }
        }
        tables
            .embeddings
            .insert(embedding.article_id.clone(), embedding);
        Ok(())
    }

    async fn list_embeddings(&self) -> StorageResult<Vec<ArticleEmbedding>> {
        Ok(self.read()?.embeddings.values().cloned().collect())
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn raw_history(&self, exclude_search: Uuid) -> StorageResult<Vec<RawScoreEntry>> {
        Ok(self
            .read()?
            .raw_history
            .iter()
            .filter(|entry| entry.search_id != exclude_search)
            .cloned()
            .collect())
    }

    async fn record_scoring_run(
        &self,
        entry: RawScoreEntry,
        record: ScoreRecord,
    ) -> StorageResult<()> {
        if entry.search_id != record.search_id {
            return Err(StorageError::Validation(format!(
                "raw entry search {} does not match score record search {}",
                entry.search_id, record.search_id
            )));
        }
        let mut tables = self.write()?;
        tables.raw_history.push(entry);
        tables.scores.push(record);
        Ok(())
    }

    async fn latest_score(&self, search_id: Uuid) -> StorageResult<Option<ScoreRecord>> {
        let tables = self.read()?;
        Ok(tables
            .scores
            .iter()
            .filter(|record| record.search_id == search_id)
            .max_by_key(|record| record.computed_at)
            .cloned())
    }

    async fn list_scores(&self, search_id: Uuid) -> StorageResult<Vec<ScoreRecord>> {
        let tables = self.read()?;
        let mut records: Vec<ScoreRecord> = tables
            .scores
            .iter()
            .filter(|record| record.search_id == search_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.computed_at);
        Ok(records)
    }
}

#[async_trait]
impl ClusterStore for MemoryStore {
    async fn replace_clusters(
        &self,
        assignments: Vec<ClusterAssignment>,
        clusters: Vec<TopicCluster>,
    ) -> StorageResult<()> {
        let mut tables = self.write()?;
        for assignment in &assignments {
            if let Some(embedding) = tables.embeddings.get_mut(&assignment.article_id) {
                embedding.cluster_label = Some(assignment.label);
            }
        }
        tables.clusters = clusters;
        Ok(())
    }

    async fn list_clusters(&self) -> StorageResult<Vec<TopicCluster>> {
        Ok(self.read()?.clusters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleBuilder, NOISE_LABEL};
    use chrono::Utc;

    #[tokio::test]
    async fn articles_are_deduplicated_by_external_id() {
        let store = MemoryStore::new();
        let first = ArticleBuilder::new("pmid-1", "Original title").build();
        let second = ArticleBuilder::new("pmid-1", "Different title").build();

        store.upsert_article(first.clone()).await.unwrap();
        let stored = store.upsert_article(second).await.unwrap();
        assert_eq!(stored.title, "Original title");
    }

    #[tokio::test]
    async fn latest_citation_count_picks_newest_snapshot() {
        let store = MemoryStore::new();
        store
            .add_citation_snapshot(CitationSnapshot {
                article_id: "pmid-1".into(),
                total_count: 5,
                source: "index".into(),
                observed_at: Utc::now() - chrono::Duration::days(30),
            })
            .await
            .unwrap();
        store
            .add_citation_snapshot(CitationSnapshot::now("pmid-1", 9, "index"))
            .await
            .unwrap();

        assert_eq!(store.latest_citation_count("pmid-1").await.unwrap(), Some(9));
        assert_eq!(store.latest_citation_count("pmid-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn raw_history_excludes_the_given_search() {
        let store = MemoryStore::new();
        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();
        for (search_id, novelty) in [(s1, 0.1), (s2, 0.2)] {
            let entry = RawScoreEntry {
                search_id,
                novelty_raw: novelty,
                citation_raw: 0.0,
                recency_raw: 0.0,
            };
            let record = ScoreRecord {
                search_id,
                novelty_score: 1.0,
                citation_velocity_score: 1.0,
                recency_score: 1.0,
                overall_score: 1.0,
                computed_at: Utc::now(),
            };
            store.record_scoring_run(entry, record).await.unwrap();
        }

        let history = store.raw_history(s1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].search_id, s2);
    }

    #[tokio::test]
    async fn record_scoring_run_rejects_mismatched_ids() {
        let store = MemoryStore::new();
        let entry = RawScoreEntry {
            search_id: Uuid::new_v4(),
            novelty_raw: 0.0,
            citation_raw: 0.0,
            recency_raw: 0.0,
        };
        let record = ScoreRecord {
            search_id: Uuid::new_v4(),
            novelty_score: 0.0,
            citation_velocity_score: 0.0,
            recency_score: 0.0,
            overall_score: 0.0,
            computed_at: Utc::now(),
        };
        assert!(store.record_scoring_run(entry, record).await.is_err());
    }

    #[tokio::test]
    async fn replace_clusters_relabels_embeddings() {
        let store = MemoryStore::new();
        store
            .upsert_embedding(ArticleEmbedding::new("pmid-1", vec![1.0]))
            .await
            .unwrap();
        store
            .upsert_embedding(ArticleEmbedding::new("pmid-2", vec![2.0]))
            .await
            .unwrap();

        let assignments = vec![
            ClusterAssignment {
                article_id: "pmid-1".into(),
                label: 0,
            },
            ClusterAssignment {
                article_id: "pmid-2".into(),
                label: NOISE_LABEL,
            },
        ];
        let clusters = vec![TopicCluster {
            label: 0,
            centroid: vec![1.0],
            member_count: 1,
            aggregate_velocity: 0.0,
            last_updated: Utc::now(),
        }];
        store.replace_clusters(assignments, clusters).await.unwrap();

        let embeddings = store.list_embeddings().await.unwrap();
        let labels: HashMap<String, Option<i32>> = embeddings
            .into_iter()
            .map(|e| (e.article_id, e.cluster_label))
            .collect();
        assert_eq!(labels["pmid-1"], Some(0));
        assert_eq!(labels["pmid-2"], Some(NOISE_LABEL));
        assert_eq!(store.list_clusters().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_embedding_preserves_existing_label() {
        let store = MemoryStore::new();
        let mut labeled = ArticleEmbedding::new("pmid-1", vec![1.0]);
        labeled.cluster_label = Some(2);
        store.upsert_embedding(labeled).await.unwrap();

        // Re-embedding after a metadata refresh must not wipe the label.
        store
            .upsert_embedding(ArticleEmbedding::new("pmid-1", vec![1.5]))
            .await
            .unwrap();
        let embeddings = store.list_embeddings().await.unwrap();
        assert_eq!(embeddings[0].cluster_label, Some(2));
        assert_eq!(embeddings[0].vector, vec![1.5]);
    }
}
