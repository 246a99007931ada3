//! Citation trajectory forecasting.
//!
//! Citation accumulation is locally well-approximated by a random walk with
//! drift, so the model here is intentionally minimal: one autoregressive
//! term over the first differences of the cumulative series (the shape of
//! an ARIMA(1,1,0)), fit by least squares. It stays robust on the short
//! (3-10 point) histories typical of recently published articles, which a
//! general model search would not.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CitationHistoryPoint;

/// Why a velocity estimate could not be computed.
///
/// Gaps are ordinary data conditions, not errors; they let callers and
/// tests tell "computed 0.0" apart from "could not compute".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalGap {
    /// Fewer than two distinct periods of citation history
    InsufficientHistory,
    /// The article's current citation total is zero or unknown
    NoCitations,
    /// The fit produced non-finite coefficients or projections
    DegenerateFit,
}

impl fmt::Display for SignalGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientHistory => write!(f, "insufficient citation history"),
            Self::NoCitations => write!(f, "no recorded citations"),
            Self::DegenerateFit => write!(f, "degenerate model fit"),
        }
    }
}

/// A forecasted citation velocity, or the reason none is available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum VelocityEstimate {
    /// Mean projected relative citation gain over the forecast horizon
    Computed(f64),
    /// No estimate could be produced
    Unavailable(SignalGap),
}

impl VelocityEstimate {
    /// The estimate as a plain scalar, degrading gaps to a neutral `0.0`.
    pub fn value_or_zero(&self) -> f64 {
        match self {
            Self::Computed(value) => *value,
            Self::Unavailable(_) => 0.0,
        }
    }

    /// Whether a value was actually computed.
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

/// Forecaster for per-article (or per-cluster) citation trajectories.
#[derive(Debug, Clone, Copy)]
pub struct CitationForecaster {
    horizon: usize,
}

impl CitationForecaster {
    /// Create a forecaster projecting `horizon` periods forward.
    pub fn new(horizon: usize) -> Self {
        Self { horizon }
    }

    /// The configured forecast horizon.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast the citation velocity of one article.
    ///
    /// `history` holds per-year citation deltas (possibly sparse, in any
    /// order); `current_total` is the article's citation count today.
    /// The per-year deltas are accumulated into a cumulative series, the
    /// model projects `horizon` periods past its end, and the velocity is
    /// the mean of `(projected - current_total) / current_total` over the
    /// projections.
    ///
    /// Preconditions that cannot be met degrade to
    /// [`VelocityEstimate::Unavailable`]; this function never fails.
    pub fn forecast_velocity(
        &self,
        history: &[CitationHistoryPoint],
        current_total: Option<u32>,
    ) -> VelocityEstimate {
        let current_total = match current_total {
            Some(total) if total > 0 => f64::from(total),
            _ => return VelocityEstimate::Unavailable(SignalGap::NoCitations),
        };

        let mut points: Vec<CitationHistoryPoint> = history.to_vec();
        points.sort_by_key(|p| p.year);
        points.dedup_by_key(|p| p.year);
        if points.len() < 2 {
            return VelocityEstimate::Unavailable(SignalGap::InsufficientHistory);
        }

        // Cumulative citation series from the yearly deltas.
        let mut cumulative = Vec::with_capacity(points.len());
        let mut running = 0.0f64;
        for point in &points {
            running += f64::from(point.count);
            cumulative.push(running);
        }

        let projections = match project(&cumulative, self.horizon) {
            Some(projections) => projections,
            None => return VelocityEstimate::Unavailable(SignalGap::DegenerateFit),
        };

        let velocity = projections
            .iter()
            .map(|p| (p - current_total) / current_total)
            .sum::<f64>()
            / projections.len() as f64;

        if velocity.is_finite() {
            VelocityEstimate::Computed(velocity)
        } else {
            VelocityEstimate::Unavailable(SignalGap::DegenerateFit)
        }
    }
}

impl Default for CitationForecaster {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Fit AR(1) with intercept on the first differences of `series` and roll
/// the fit forward `horizon` steps, returning the projected levels.
///
/// With a single difference pair the coefficient is unidentifiable and the
/// model degrades to a random walk with drift (`phi = 0`). Returns `None`
/// when the fit or projections go non-finite.
fn project(series: &[f64], horizon: usize) -> Option<Vec<f64>> {
    if horizon == 0 {
        return None;
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let (phi, intercept) = fit_ar1(&diffs);
    if !phi.is_finite() || !intercept.is_finite() {
        return None;
    }

    let mut level = *series.last()?;
    let mut diff = *diffs.last()?;
    let mut projections = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        diff = intercept + phi * diff;
        level += diff;
        if !level.is_finite() {
            return None;
        }
        projections.push(level);
    }
    Some(projections)
}

/// Least-squares AR(1) over `diffs`: regress each difference on its
/// predecessor. The coefficient is clamped to (-0.99, 0.99) so projections
/// on short noisy series stay stable.
fn fit_ar1(diffs: &[f64]) -> (f64, f64) {
    if diffs.len() < 2 {
        let drift = diffs.iter().sum::<f64>() / diffs.len().max(1) as f64;
        return (0.0, drift);
    }

    let x = &diffs[..diffs.len() - 1];
    let y = &diffs[1..];
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        cov += (xi - mean_x) * (yi - mean_y);
        var += (xi - mean_x) * (xi - mean_x);
    }

    if var < f64::EPSILON {
        // Constant differences: pure drift.
        return (0.0, mean_y);
    }

    let phi = (cov / var).clamp(-0.99, 0.99);
    let intercept = mean_y - phi * mean_x;
    (phi, intercept)
}
