// Standard normal distribution helpers for bootstrap p-values.

/// Error function, Abramowitz and Stegun 7.1.26 (|error| < 1.5e-7).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF.
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// P(X > threshold) for X ~ Normal(mean, std).
///
/// A zero `std` gives an infinite or NaN z and the result follows from it:
/// 1.0 or 0.0 for a nonzero mean, NaN when mean equals the threshold.
pub fn normal_sf(threshold: f64, mean: f64, std: f64) -> f64 {
    let z = (threshold - mean) / std;
    if z.is_nan() {
        return f64::NAN;
    }
    1.0 - standard_normal_cdf(z)
}
