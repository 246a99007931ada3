//! Opportunity aggregation and qualitative recommendation bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall score at or above this is a very high opportunity.
pub const VERY_HIGH_THRESHOLD: f64 = 0.8;
/// Overall score at or above this is a high opportunity.
pub const HIGH_THRESHOLD: f64 = 0.6;
/// Overall score at or above this is a moderate opportunity.
pub const MODERATE_THRESHOLD: f64 = 0.4;
/// Overall score at or above this is a limited opportunity.
pub const LIMITED_THRESHOLD: f64 = 0.2;

/// Round a score to three decimal places, the serialization precision for
/// all score values.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Combine the three normalized component scores into the overall
/// opportunity score: their arithmetic mean, rounded to three decimals.
///
/// Pure given its inputs. The inputs themselves are history-dependent via
/// normalization, so the overall score is not reproducible across time.
pub fn overall_score(novelty: f64, citation_velocity: f64, recency: f64) -> f64 {
    round3((novelty + citation_velocity + recency) / 3.0)
}

/// Qualitative recommendation derived from the overall score.
///
/// The band thresholds and wording are a presentation concern layered on
/// top of the scoring contract; callers may substitute their own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Overall score >= 0.8
    VeryHigh,
    /// Overall score >= 0.6
    High,
    /// Overall score >= 0.4
    Moderate,
    /// Overall score >= 0.2
    Limited,
    /// Everything below 0.2
    Low,
}

impl Recommendation {
    /// Band the overall score against the documented thresholds.
    pub fn from_overall(overall: f64) -> Self {
        if overall >= VERY_HIGH_THRESHOLD {
            Self::VeryHigh
        } else if overall >= HIGH_THRESHOLD {
            Self::High
        } else if overall >= MODERATE_THRESHOLD {
            Self::Moderate
        } else if overall >= LIMITED_THRESHOLD {
            Self::Limited
        } else {
            Self::Low
        }
    }

    /// User-facing recommendation text for this band.
    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryHigh => {
                "Very high opportunity - This research area shows excellent potential with high novelty and impact."
            }
            Self::High => {
                "High opportunity - This research area shows good potential for impactful work."
            }
            Self::Moderate => {
                "Moderate opportunity - Consider focusing on specific aspects to increase potential."
            }
            Self::Limited => {
                "Limited opportunity - This area may be saturated or has limited growth potential."
            }
            Self::Low => {
                "Low opportunity - Consider pivoting to more promising research areas."
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryHigh => write!(f, "very high"),
            Self::High => write!(f, "high"),
            Self::Moderate => write!(f, "moderate"),
            Self::Limited => write!(f, "limited"),
            Self::Low => write!(f, "low"),
        }
    }
}
