//! Numeric helpers shared by the models and the ledger boundary.

/// Round a value to tenths.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Replace NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Clamp a stock level to be non-negative, mapping NaN to zero.
pub fn clamp_stock(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Cosine ease with zero slope at both ends of `[0, 1]`.
pub fn cosine_ease(fraction: f64) -> f64 {
    (1.0 - (fraction * std::f64::consts::PI).cos()) / 2.0
}
