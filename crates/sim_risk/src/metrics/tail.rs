//! Empirical Value-at-Risk and Conditional Value-at-Risk.
//!
//! Both figures are read directly off the simulated return distribution.
//! No distributional form is assumed, so jump-diffusion returns (which are
//! not log-normal) are treated exactly like GBM ones.
//!
//! ## Conventions
//!
//! - Returns are fractional (`0.05` is +5%).
//! - `VaR = -q` where `q` is the `1 - c` empirical quantile (linear
//!   interpolation between order statistics).
//! - `CVaR = -mean(r | r <= q)`.
//!
//! Both are loss magnitudes: positive when the quantile is a loss.

use sim_core::math::stats::{quantile_sorted, sorted};
use sim_core::{SimError, SimResult};

/// VaR and CVaR at one confidence level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TailRisk {
    /// Confidence level `c` in (0, 1)
    pub confidence: f64,
    /// Value-at-Risk as a positive loss magnitude
    pub var: f64,
    /// Conditional Value-at-Risk (expected shortfall), `>= var`
    pub cvar: f64,
}

/// Computes VaR and CVaR of `returns` at `confidence`.
///
/// The caller validates `confidence`; see
/// [`RiskCalculator`](super::RiskCalculator).
///
/// # Errors
///
/// [`SimError::EmptyDistribution`] if `returns` is empty.
pub(crate) fn tail_risk(returns: &[f64], confidence: f64) -> SimResult<TailRisk> {
    if returns.is_empty() {
        return Err(SimError::EmptyDistribution);
    }
    let ordered = sorted(returns);
    let q = quantile_sorted(&ordered, 1.0 - confidence);

    // The smallest order statistic is never above the interpolated quantile
    let tail_len = ordered.partition_point(|r| *r <= q).max(1);
    let tail_mean = ordered[..tail_len].iter().sum::<f64>() / tail_len as f64;

    let var = -q;
    // Guards against summation rounding when the tail is flat
    let cvar = (-tail_mean).max(var);

    Ok(TailRisk {
        confidence,
        var,
        cvar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_tail_risk_hundred_returns() {
        // -0.50, -0.49, ..., 0.49
        let returns: Vec<f64> = (0..100).map(|i| (i as f64 - 50.0) / 100.0).collect();
        let risk = tail_risk(&returns, 0.95).unwrap();

        // h = 99 * 0.05 = 4.95: between -0.46 and -0.45
        assert_relative_eq!(risk.var, 0.4505, epsilon = 1e-12);
        // Tail is the five lowest returns
        assert_relative_eq!(risk.cvar, 0.48, epsilon = 1e-12);
        assert!(risk.cvar >= risk.var);
    }

    #[test]
    fn test_tail_risk_order_independent() {
        let a = [0.1, -0.3, 0.05, -0.1, 0.2, -0.05];
        let mut b = a;
        b.reverse();
        assert_eq!(tail_risk(&a, 0.9).unwrap(), tail_risk(&b, 0.9).unwrap());
    }

    #[test]
    fn test_tail_risk_all_gains_negative_var() {
        let risk = tail_risk(&[0.1, 0.2, 0.3], 0.95).unwrap();
        assert!(risk.var < 0.0);
        assert!(risk.cvar >= risk.var);
    }

    #[test]
    fn test_tail_risk_single_sample() {
        let risk = tail_risk(&[-0.2], 0.99).unwrap();
        assert_relative_eq!(risk.var, 0.2);
        assert_relative_eq!(risk.cvar, 0.2);
    }

    #[test]
    fn test_tail_risk_empty() {
        assert_eq!(tail_risk(&[], 0.95), Err(SimError::EmptyDistribution));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn test_cvar_not_below_var(
            returns in prop::collection::vec(-0.99..3.0_f64, 1..200),
            confidence in 0.5..0.999_f64
        ) {
            let risk = tail_risk(&returns, confidence).unwrap();
            prop_assert!(risk.cvar >= risk.var);
        }
    }
}
