//! Peak-to-trough drawdown.

/// How per-trajectory drawdowns are summarised across simulations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DrawdownMode {
    /// Average drawdown over all simulations.
    Mean,
    /// Largest drawdown of any simulation.
    #[default]
    Worst,
}

/// Maximum drawdown of a value trajectory, as a fraction of the running peak.
///
/// `max_t (peak_t - V_t) / peak_t` with `peak_t = max_{s<=t} V_s`. For a
/// trajectory of positive values the result lies in `[0, 1)`; an empty or
/// single-point trajectory has no drawdown.
///
/// # Examples
///
/// ```
/// use sim_risk::metrics::max_drawdown;
///
/// let values = [100.0, 120.0, 90.0, 110.0, 60.0, 130.0];
/// assert_eq!(max_drawdown(&values), 0.5);
/// assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
/// ```
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst.clamp(0.0, 1.0)
}
