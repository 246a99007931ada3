//! Core data model for searches, articles, citation data, and scores.

mod article;
mod score;

pub use article::{Article, ArticleBuilder, CitationHistoryPoint, CitationSnapshot};
pub use score::{RawScoreEntry, ScoreRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cluster label assigned to points no density-based cluster claims.
pub const NOISE_LABEL: i32 = -1;

/// A literature search as entered by a user.
///
/// A search is immutable after creation. Articles are attached to it via the
/// storage layer, and each completed scoring run produces a [`ScoreRecord`]
/// for it; the most recent record is the search's current score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Search {
    /// Unique identifier for the search
    pub id: Uuid,

    /// Free-text description of the research idea
    pub idea_text: String,

    /// The keyword query submitted to the literature source
    pub keyword_text: String,

    /// Maximum number of results requested from the literature source
    pub max_results: usize,

    /// When the search was created
    pub created_at: DateTime<Utc>,
}

impl Search {
    /// Create a new search with a fresh id and the current timestamp.
    pub fn new(
        idea_text: impl Into<String>,
        keyword_text: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            idea_text: idea_text.into(),
            keyword_text: keyword_text.into(),
            max_results,
            created_at: Utc::now(),
        }
    }
}

/// An embedding vector owned by an article.
///
/// `cluster_label` is `None` until a clustering pass has run; `-1`
/// ([`NOISE_LABEL`]) marks points DBSCAN left unclustered. Labels are only
/// valid until the next full clustering pass replaces them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleEmbedding {
    /// External id of the owning article
    pub article_id: String,

    /// The dense embedding vector
    pub vector: Vec<f32>,

    /// Topic cluster label from the most recent clustering pass
    pub cluster_label: Option<i32>,
}

impl ArticleEmbedding {
    /// Create an unlabeled embedding for an article.
    pub fn new(article_id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            article_id: article_id.into(),
            vector,
            cluster_label: None,
        }
    }
}

/// The label → article assignment produced by one clustering pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterAssignment {
    /// External id of the article
    pub article_id: String,

    /// Assigned cluster label, [`NOISE_LABEL`] for noise points
    pub label: i32,
}

/// A topic cluster produced by a full clustering pass.
///
/// Clusters are rebuilt from scratch on every pass; rows from a previous
/// pass are replaced wholesale, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicCluster {
    /// Cluster label (non-negative; noise points never form a cluster)
    pub label: i32,

    /// Mean vector of the member embeddings
    pub centroid: Vec<f32>,

    /// Number of member articles
    pub member_count: usize,

    /// Mean forecasted citation velocity over the members
    pub aggregate_velocity: f64,

    /// When this cluster row was built
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_new_assigns_unique_ids() {
        let a = Search::new("idea", "keywords", 20);
        let b = Search::new("idea", "keywords", 20);
        assert_ne!(a.id, b.id);
        assert_eq!(a.max_results, 20);
    }

    #[test]
    fn embedding_starts_unlabeled() {
        let e = ArticleEmbedding::new("pmid-1", vec![0.1, 0.2]);
        assert_eq!(e.cluster_label, None);
    }
}
