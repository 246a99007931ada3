//! Article and citation model types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A scientific article fetched from a literature source.
///
/// Articles are deduplicated globally by `external_id` (the source's own
/// identifier, e.g. a PMID) and are immutable once stored except for derived
/// data held in companion tables (citation snapshots, embeddings).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Domain-specific identifier from the literature source
    pub external_id: String,

    /// Article title
    pub title: String,

    /// Abstract text, when the source provides one
    pub abstract_text: Option<String>,

    /// Journal name
    pub journal: Option<String>,

    /// Publication date; may be unknown for some records
    pub publication_date: Option<NaiveDate>,

    /// Digital object identifier
    pub doi: Option<String>,
}

impl Article {
    /// The text used for embedding: title plus abstract when present.
    pub fn embedding_text(&self) -> String {
        match &self.abstract_text {
            Some(abstract_text) => format!("{} {}", self.title, abstract_text),
            None => self.title.clone(),
        }
    }
}

/// Builder for [`Article`] instances.
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    /// Start building an article from its required fields.
    pub fn new(external_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            article: Article {
                external_id: external_id.into(),
                title: title.into(),
                abstract_text: None,
                journal: None,
                publication_date: None,
                doi: None,
            },
        }
    }

    /// Set the abstract text.
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.article.abstract_text = Some(text.into());
        self
    }

    /// Set the journal name.
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.article.journal = Some(journal.into());
        self
    }

    /// Set the publication date.
    pub fn publication_date(mut self, date: NaiveDate) -> Self {
        self.article.publication_date = Some(date);
        self
    }

    /// Set the DOI.
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.article.doi = Some(doi.into());
        self
    }

    /// Finish building the article.
    pub fn build(self) -> Article {
        self.article
    }
}

/// A citation count observed for an article at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationSnapshot {
    /// External id of the cited article
    pub article_id: String,

    /// Total citation count at the time of observation
    pub total_count: u32,

    /// Where the count was observed (e.g. a citation index name)
    pub source: String,

    /// When the count was observed
    pub observed_at: DateTime<Utc>,
}

impl CitationSnapshot {
    /// Record a citation count observed now.
    pub fn now(article_id: impl Into<String>, total_count: u32, source: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            total_count,
            source: source.into(),
            observed_at: Utc::now(),
        }
    }
}

/// One period of an article's citation history.
///
/// Histories are per-year citation deltas, ordered by year. They may be
/// sparse (missing years) or entirely absent for an article.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CitationHistoryPoint {
    /// Calendar year of the period
    pub year: i32,

    /// Citations accumulated during that year
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_text_joins_title_and_abstract() {
        let article = ArticleBuilder::new("pmid-1", "CRISPR delivery")
            .abstract_text("Lipid nanoparticles for gene editing.")
            .build();
        assert_eq!(
            article.embedding_text(),
            "CRISPR delivery Lipid nanoparticles for gene editing."
        );
    }

    #[test]
    fn embedding_text_without_abstract_is_title() {
        let article = ArticleBuilder::new("pmid-2", "A title").build();
        assert_eq!(article.embedding_text(), "A title");
    }

    #[test]
    fn builder_sets_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let article = ArticleBuilder::new("pmid-3", "T")
            .journal("Nature Medicine")
            .publication_date(date)
            .doi("10.1038/example")
            .build();
        assert_eq!(article.journal.as_deref(), Some("Nature Medicine"));
        assert_eq!(article.publication_date, Some(date));
        assert_eq!(article.doi.as_deref(), Some("10.1038/example"));
    }
}
