//! History-relative min-max normalization.

/// Map a raw scalar into `[0, 1]` by min-max scaling against a history
/// snapshot of previously recorded raw values of the same kind.
///
/// The value itself always participates in the bounds, so the result is in
/// range by construction. When every value in `history ∪ {raw}` is equal
/// (including the empty-history first run), the result is `1.0`: a signal
/// with no comparison baseline is treated as maximal opportunity rather
/// than undefined.
///
/// Because the history only ever grows, normalization bounds are
/// monotonically non-shrinking. A score computed today can be pushed down
/// by future extreme values it never saw, and re-normalizing the same raw
/// value against a larger history may give a smaller result. That
/// non-reproducibility is intentional; pass the same `history` snapshot to
/// reproduce a past score.
pub fn normalize(raw: f64, history: &[f64]) -> f64 {
    let mut lo = raw;
    let mut hi = raw;
    for &value in history {
        lo = lo.min(value);
        hi = hi.max(value);
    }

    if hi == lo {
        return 1.0;
    }
    (raw - lo) / (hi - lo)
}
