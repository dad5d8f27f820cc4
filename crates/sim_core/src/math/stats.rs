//! Descriptive statistics over return samples.
//!
//! All functions operate on plain slices and never allocate except where a
//! sorted copy is required (quantiles, median).
//!
//! ## Conventions
//!
//! - [`sample_std`] / [`sample_covariance`] use the `n - 1` denominator
//!   (historical calibration).
//! - [`population_std`] uses `n` (dispersion of a simulated distribution).
//! - [`quantile_sorted`] interpolates linearly between order statistics at
//!   position `h = (n - 1) * p`.
//!
//! Empty inputs yield `NaN` rather than panicking; callers that must reject
//! empty samples check length first.

/// Periodic log returns `ln(P_t / P_{t-1})`.
///
/// Returns an empty vector for fewer than two prices.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample covariance (`n - 1` denominator).
///
/// Returns 0 for fewer than two paired observations.
pub fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    let sum: f64 = x[..n]
        .iter()
        .zip(&y[..n])
        .map(|(a, b)| (a - mx) * (b - my))
        .sum();
    sum / (n - 1) as f64
}

/// Sample standard deviation (`n - 1` denominator).
///
/// Returns 0 for fewer than two observations.
pub fn sample_std(values: &[f64]) -> f64 {
    sample_covariance(values, values).max(0.0).sqrt()
}

/// Population standard deviation (`n` denominator).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / values.len() as f64).sqrt()
}

/// Pearson correlation coefficient, clamped to [-1, 1].
///
/// Returns `None` when either sample has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let cov = sample_covariance(x, y);
    let sx = sample_std(x);
    let sy = sample_std(y);
    if sx <= 0.0 || sy <= 0.0 {
        return None;
    }
    Some((cov / (sx * sy)).clamp(-1.0, 1.0))
}

/// Sorts a copy of `values` ascending using IEEE total ordering.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Empirical quantile of an ascending-sorted sample with linear interpolation.
///
/// `p` is clamped to [0, 1].
///
/// # Examples
///
/// ```
/// use sim_core::math::stats::quantile_sorted;
///
/// let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile_sorted(&xs, 0.5), 3.0);
/// assert_eq!(quantile_sorted(&xs, 0.25), 2.0);
/// assert_eq!(quantile_sorted(&xs, 0.125), 1.5);
/// ```
pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted_values[lo] + frac * (sorted_values[hi] - sorted_values[lo])
}

/// Empirical quantile of an unsorted sample.
pub fn quantile(values: &[f64], p: f64) -> f64 {
    quantile_sorted(&sorted(values), p)
}

/// Median (0.5 quantile).
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}
