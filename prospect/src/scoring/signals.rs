//! Raw score estimators: citation velocity, recency, and novelty.
//!
//! Each estimator produces an un-normalized scalar from whatever per-article
//! signals are available. Missing fields exclude an article from the
//! aggregate instead of contributing a fabricated zero; that keeps the mean
//! honest at the cost of basing it on fewer samples.

use chrono::{Datelike, NaiveDate};

use crate::embedding::cosine_similarity;

/// Whole calendar months from `earlier` to `later`, ignoring days.
fn months_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later.year() as i64 - earlier.year() as i64) * 12
        + (later.month() as i64 - earlier.month() as i64)
}

/// Raw citation velocity: mean citations-per-month over articles that have
/// both a citation count and a publication date.
///
/// The month denominator is floored at 1 so same-month publications do not
/// blow up the rate. Articles missing either field are skipped; `0.0` when
/// no article qualifies.
pub fn raw_velocity(
    citation_counts: &[Option<u32>],
    pub_dates: &[Option<NaiveDate>],
    now: NaiveDate,
) -> f64 {
    let mut rates = Vec::new();
    for (count, date) in citation_counts.iter().zip(pub_dates.iter()) {
        let (Some(count), Some(date)) = (count, date) else {
            continue;
        };
        let months = months_between(now, *date).max(1);
        rates.push(f64::from(*count) / months as f64);
    }

    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

/// Raw recency: fraction of articles published within the trailing window,
/// damped by one.
///
/// The denominator is `N + 1` where `N` counts articles with a known date,
/// so a single-article search can never reach a raw `1.0`. Unknown dates are
/// excluded from both numerator and denominator; `0.0` for an empty set.
pub fn raw_recency(pub_dates: &[Option<NaiveDate>], window_months: i64, now: NaiveDate) -> f64 {
    let mut known = 0usize;
    let mut recent = 0usize;
    for date in pub_dates.iter().flatten() {
        known += 1;
        if months_between(now, *date) <= window_months {
            recent += 1;
        }
    }

    if known == 0 {
        return 0.0;
    }
    recent as f64 / (known + 1) as f64
}

/// Raw novelty: mean cosine similarity of the query vector to each document
/// vector, divided by `N + 1`.
///
/// A topic returning many highly similar articles is not novel, so the
/// similarity signal is inversely damped by the size of the result set.
/// `0.0` for an empty document set.
pub fn raw_novelty(query_vector: &[f32], doc_vectors: &[Vec<f32>]) -> f64 {
    if doc_vectors.is_empty() {
        return 0.0;
    }

    let total: f64 = doc_vectors
        .iter()
        .map(|doc| f64::from(cosine_similarity(query_vector, doc)))
        .sum();
    let avg_sim = total / doc_vectors.len() as f64;
    avg_sim / (doc_vectors.len() + 1) as f64
}
