//! Score history and score record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The raw (un-normalized) scalars produced by one scoring run.
///
/// Entries are append-only and write-once: they form the baseline every
/// future normalization scales against, so they are never recomputed or
/// deleted. Bounds derived from them can only widen over time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawScoreEntry {
    /// The search this run scored
    pub search_id: Uuid,

    /// Raw novelty scalar (size-damped mean cosine similarity)
    pub novelty_raw: f64,

    /// Raw citation velocity scalar (mean citations per month)
    pub citation_raw: f64,

    /// Raw recency scalar (damped fraction of recent publications)
    pub recency_raw: f64,
}

/// The normalized scores produced by one scoring run.
///
/// All component scores and the overall score lie in `[0, 1]` and are
/// rounded to three decimal places. A search may accumulate several records
/// through re-scoring; the one with the latest `computed_at` is current.
///
/// Scores are history-relative: recomputing the same search later, after
/// other searches have extended the raw-score history, can legitimately
/// yield different values. That is a documented property of the
/// normalization scheme, not drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    /// The search this record scores
    pub search_id: Uuid,

    /// Normalized novelty score in `[0, 1]`
    pub novelty_score: f64,

    /// Normalized citation velocity score in `[0, 1]`
    pub citation_velocity_score: f64,

    /// Normalized recency score in `[0, 1]`
    pub recency_score: f64,

    /// Arithmetic mean of the three component scores
    pub overall_score: f64,

    /// When the run completed
    pub computed_at: DateTime<Utc>,
}
