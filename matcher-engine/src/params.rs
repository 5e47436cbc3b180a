//! Normalization of the user-tunable search parameters.

/// Largest number of results a single search may request.
pub const MAX_RESULTS: u32 = 24;

/// Smallest number of results a single search may request.
pub const MIN_RESULTS: u32 = 1;

/// `top_k` used before the user edits it and for non-finite input.
pub const DEFAULT_TOP_K: f64 = 12.0;

/// Threshold percentage used before the user edits it and for non-finite input.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 0.0;

/// Clamps a user-entered result count to `MIN_RESULTS..=MAX_RESULTS`.
///
/// Fractional input is truncated toward zero before clamping.
pub fn clamp_top_k(raw: f64) -> u32 {
    let value = if raw.is_finite() { raw } else { DEFAULT_TOP_K };
    value.trunc().clamp(f64::from(MIN_RESULTS), f64::from(MAX_RESULTS)) as u32
}

/// Clamps a user-entered percentage to `0..=100`.
pub fn clamp_threshold_percent(raw: f64) -> f64 {
    let value = if raw.is_finite() {
        raw
    } else {
        DEFAULT_THRESHOLD_PERCENT
    };
    value.clamp(0.0, 100.0)
}

/// Converts a user-entered percentage to the fraction sent on the wire,
/// always within `0.0..=1.0`.
pub fn threshold_fraction(raw_percent: f64) -> f64 {
    (clamp_threshold_percent(raw_percent) / 100.0).clamp(0.0, 1.0)
}
