//! Literature ingestion boundary.
//!
//! Fetching from PubMed-style sources (query expansion, metadata lookup,
//! citation counts) lives outside this crate. Implementations of
//! [`ArticleSource`] hand results over in [`ArticleMetadata`] form; the
//! engine stores them and takes it from there. Any field except the id and
//! title may be missing per article.

use async_trait::async_trait;

use crate::models::Article;

/// Error type for ingestion sources
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The upstream source rejected or failed the request
    #[error("Source error: {0}")]
    Source(String),

    /// A record could not be interpreted
    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Metadata for one article as delivered by a literature source.
#[derive(Debug, Clone)]
pub struct ArticleMetadata {
    /// The article's bibliographic fields
    pub article: Article,

    /// Current total citation count, when the source knows it
    pub citation_count: Option<u32>,

    /// Per-year citation deltas as `(year, count)` pairs; may be sparse
    /// or empty
    pub citation_history: Vec<(i32, u32)>,
}

impl ArticleMetadata {
    /// Metadata carrying only bibliographic fields.
    pub fn bare(article: Article) -> Self {
        Self {
            article,
            citation_count: None,
            citation_history: Vec::new(),
        }
    }
}

/// Interface to an external literature source.
#[async_trait]
pub trait ArticleSource: Send + Sync + 'static {
    /// Fetch metadata for the given external ids.
    ///
    /// Sources may return fewer records than requested; absent citation
    /// data is represented per record, never as an error.
    async fn fetch_article_metadata(
        &self,
        ids: &[String],
    ) -> Result<Vec<ArticleMetadata>, IngestError>;
}
