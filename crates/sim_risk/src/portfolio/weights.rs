//! Target portfolio weights.

use sim_core::{SimError, SimResult};

/// Absolute tolerance on the sum of weights.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Long-only capital weights keyed by ticker, summing to one.
///
/// Weights are never rescaled: a set that does not sum to one is rejected
/// rather than silently normalised.
///
/// # Examples
///
/// ```
/// use sim_risk::portfolio::PortfolioWeights;
///
/// let weights = PortfolioWeights::new([("SPY", 0.6), ("AGG", 0.4)]).unwrap();
/// assert_eq!(weights.weight_of("AGG"), Some(0.4));
///
/// assert!(PortfolioWeights::new([("SPY", 0.5), ("AGG", 0.4)]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioWeights {
    tickers: Vec<String>,
    weights: Vec<f64>,
}

impl PortfolioWeights {
    /// Creates a weight set from `(ticker, weight)` pairs.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidModelParameter`] for a non-finite or negative weight
    /// - [`SimError::AssetMismatch`] for a repeated ticker
    /// - [`SimError::WeightSum`] if the weights do not sum to one within
    ///   [`WEIGHT_TOLERANCE`] (including an empty set)
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> SimResult<Self> {
        let mut tickers: Vec<String> = Vec::new();
        let mut weights = Vec::new();

        for (ticker, weight) in pairs {
            let ticker = ticker.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(SimError::invalid_parameter(
                    format!("weight[{}]", ticker),
                    format!("must be finite and non-negative, got {}", weight),
                ));
            }
            if tickers.contains(&ticker) {
                return Err(SimError::AssetMismatch(format!(
                    "ticker {} weighted more than once",
                    ticker
                )));
            }
            tickers.push(ticker);
            weights.push(weight);
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SimError::WeightSum { sum });
        }

        Ok(Self { tickers, weights })
    }

    /// Weighted tickers in insertion order.
    #[inline]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Weights in insertion order.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of weighted assets.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false` for a validated set; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of `ticker`, if it is part of the portfolio.
    pub fn weight_of(&self, ticker: &str) -> Option<f64> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|idx| self.weights[idx])
    }

    /// Iterates `(ticker, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Reorders the weights to follow `tickers`.
    ///
    /// # Errors
    ///
    /// [`SimError::AssetMismatch`] unless `tickers` names exactly the
    /// weighted assets.
    pub fn aligned_to(&self, tickers: &[String]) -> SimResult<Vec<f64>> {
        if tickers.len() != self.len() {
            return Err(SimError::AssetMismatch(format!(
                "{} weighted assets, {} simulated",
                self.len(),
                tickers.len()
            )));
        }
        tickers
            .iter()
            .map(|ticker| {
                self.weight_of(ticker).ok_or_else(|| {
                    SimError::AssetMismatch(format!("no weight for simulated asset {}", ticker))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let w = PortfolioWeights::new([("A", 0.6), ("B", 0.4)]).unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w.tickers(), &["A".to_string(), "B".to_string()]);
        assert_eq!(w.weights(), &[0.6, 0.4]);
    }

    #[test]
    fn test_weights_not_summing_to_one() {
        let err = PortfolioWeights::new([("A", 0.5), ("B", 0.4)]).unwrap_err();
        match err {
            SimError::WeightSum { sum } => assert!((sum - 0.9).abs() < 1e-12),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_weights_within_tolerance() {
        assert!(PortfolioWeights::new([("A", 0.3333334), ("B", 0.6666666)]).is_ok());
        assert!(PortfolioWeights::new([("A", 0.334), ("B", 0.666)]).is_ok());
        assert!(PortfolioWeights::new([("A", 0.34), ("B", 0.67)]).is_err());
    }

    #[test]
    fn test_empty_weights_rejected() {
        let pairs: Vec<(String, f64)> = Vec::new();
        assert!(matches!(
            PortfolioWeights::new(pairs),
            Err(SimError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_negative_and_nan_weights_rejected() {
        assert!(matches!(
            PortfolioWeights::new([("A", 1.2), ("B", -0.2)]),
            Err(SimError::InvalidModelParameter { .. })
        ));
        assert!(matches!(
            PortfolioWeights::new([("A", f64::NAN), ("B", 1.0)]),
            Err(SimError::InvalidModelParameter { .. })
        ));
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        assert!(matches!(
            PortfolioWeights::new([("A", 0.5), ("A", 0.5)]),
            Err(SimError::AssetMismatch(_))
        ));
    }

    #[test]
    fn test_aligned_to_reorders() {
        let w = PortfolioWeights::new([("A", 0.7), ("B", 0.3)]).unwrap();
        let aligned = w
            .aligned_to(&["B".to_string(), "A".to_string()])
            .unwrap();
        assert_eq!(aligned, vec![0.3, 0.7]);
    }

    #[test]
    fn test_aligned_to_mismatch() {
        let w = PortfolioWeights::new([("A", 0.7), ("B", 0.3)]).unwrap();
        assert!(w.aligned_to(&["A".to_string()]).is_err());
        assert!(w
            .aligned_to(&["A".to_string(), "C".to_string()])
            .is_err());
    }
}
