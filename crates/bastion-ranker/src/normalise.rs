//! Sub-score normalisation functions.
//!
//! Every helper returns a value in [0, 1]. Degenerate inputs map to 0,
//! the worst case, so absent data depresses a score instead of vanishing.

/// `part / whole`, clamped. An empty denominator yields 0.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}

/// Min-max normalisation within a given range [min_val, max_val].
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    if !value.is_finite() || (max_val - min_val).abs() < 1e-10 {
        return 0.0;
    }
    ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0)
}

/// Linear recency weight: 1.0 for today, falling to 0.0 at the window edge.
/// Future-dated and out-of-window events weigh 0.
pub fn recency_weight(age_days: i64, window_days: i64) -> f64 {
    if window_days <= 0 || age_days < 0 || age_days >= window_days {
        return 0.0;
    }
    1.0 - age_days as f64 / window_days as f64
}

/// `count / cap`, saturating at 1.0.
pub fn saturating(count: usize, cap: u32) -> f64 {
    if cap == 0 {
        return if count > 0 { 1.0 } else { 0.0 };
    }
    (count as f64 / cap as f64).min(1.0)
}

/// Map a 1–5 threat rating onto [0, 1]. Ratings outside 1..=5 are malformed.
pub fn threat_level_factor(level: u8) -> Option<f64> {
    if (1..=5).contains(&level) {
        Some(minmax_normalise(level as f64, 1.0, 5.0))
    } else {
        None
    }
}
