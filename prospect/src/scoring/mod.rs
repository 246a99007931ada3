//! The scoring and normalization engine.
//!
//! Three raw signals per search - novelty, citation velocity, recency -
//! each min-max normalized against the append-only history of every
//! previous run, then averaged into one overall opportunity score.
//!
//! Scores are comparable across searches performed at different times
//! precisely because they are history-relative; the flip side is that
//! every new search subtly shifts the baseline for all future scores, and
//! re-scoring an old search against a grown history may move its numbers.

pub mod aggregate;
mod engine;
pub mod normalize;
pub mod signals;

pub use aggregate::{overall_score, round3, Recommendation};
pub use engine::{ScoreError, ScoringEngine};
pub use normalize::normalize;
pub use signals::{raw_novelty, raw_recency, raw_velocity};
