// Axis scaling helpers for nearest-term queries.

use ndarray::Array1;

/// Min-max stretch a column onto [-1, 1].
///
/// The minimum maps to -1 and the maximum to 1. A constant column (including
/// a single value) has no spread to stretch and maps to 0.0 everywhere. NaN
/// inputs stay NaN, and an infinite coordinate yields NaN or an endpoint
/// rather than being flattened.
pub fn stretch_neg1_to_1(values: &Array1<f64>) -> Array1<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range == 0.0 {
        return values.mapv(|v| if v.is_nan() { v } else { 0.0 });
    }
    values.mapv(|v| 2.0 * (v - min) / range - 1.0)
}
