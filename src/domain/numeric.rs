//! Shared numeric helpers for the simulator and metrics engine.

/// Round to 3 decimal places, the precision every reported percentage uses.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `numerator / denominator`, or `None` when the denominator is not a
/// positive finite number. Callers turn `None` into a typed error instead of
/// letting NaN or infinity leak into results.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && denominator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Simple daily returns `v[i]/v[i-1] - 1` for `i = 1..n`.
///
/// Returns `None` as soon as a non-positive base value is met.
pub fn daily_returns(values: &[f64]) -> Option<Vec<f64>> {
    values
        .windows(2)
        .map(|w| guarded_ratio(w[1], w[0]).map(|r| r - 1.0))
        .collect()
}

/// Sample standard deviation (n - 1 denominator). `None` for fewer than two
/// observations.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
