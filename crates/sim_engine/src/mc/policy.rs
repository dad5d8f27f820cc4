//! Numeric policy for degenerate simulated prices.
//!
//! Extreme parameters can drive a price to zero, below zero (bootstrap of a
//! corrupt history), `NaN` or `+inf`. The engine applies one policy after every
//! step so that stored prices stay finite and strictly positive.

use sim_core::{SimError, SimResult};

/// Default replacement for non-positive or `NaN` prices.
pub const DEFAULT_PRICE_FLOOR: f64 = 1e-8;

/// What to do with a price that is not finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PricePolicy {
    /// Replace non-positive or `NaN` prices with `floor` and `+inf` with
    /// `f64::MAX`, counting each replacement.
    Clamp {
        /// Replacement for non-positive prices
        floor: f64,
    },
    /// Fail with [`SimError::NonPositivePrice`].
    Reject,
}

impl Default for PricePolicy {
    fn default() -> Self {
        PricePolicy::Clamp {
            floor: DEFAULT_PRICE_FLOOR,
        }
    }
}

impl PricePolicy {
    /// Checks the floor of a clamp policy.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            PricePolicy::Clamp { floor } if !floor.is_finite() || *floor <= 0.0 => Err(
                SimError::invalid_parameter("price_floor", format!("{} must be positive", floor)),
            ),
            _ => Ok(()),
        }
    }

    /// Applies the policy to the prices of `simulation` after `step`.
    ///
    /// Returns the number of prices adjusted.
    ///
    /// # Errors
    ///
    /// Under [`PricePolicy::Reject`], returns [`SimError::NonPositivePrice`]
    /// for the first offending asset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sim_engine::mc::PricePolicy;
    ///
    /// let mut prices = [100.0, -1.0, f64::NAN, f64::INFINITY];
    /// let adjusted = PricePolicy::Clamp { floor: 1e-8 }.apply(&mut prices, 0, 1).unwrap();
    /// assert_eq!(adjusted, 3);
    /// assert_eq!(prices, [100.0, 1e-8, 1e-8, f64::MAX]);
    ///
    /// assert!(PricePolicy::Reject.apply(&mut [0.0], 3, 7).is_err());
    /// ```
    #[inline]
    pub fn apply(&self, prices: &mut [f64], simulation: usize, step: usize) -> SimResult<usize> {
        let mut adjusted = 0;
        for (asset, price) in prices.iter_mut().enumerate() {
            if price.is_finite() && *price > 0.0 {
                continue;
            }
            match self {
                PricePolicy::Clamp { floor } => {
                    *price = if *price == f64::INFINITY { f64::MAX } else { *floor };
                    adjusted += 1;
                }
                PricePolicy::Reject => {
                    return Err(SimError::NonPositivePrice {
                        simulation,
                        step,
                        asset,
                    });
                }
            }
        }
        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_leaves_valid_prices() {
        let mut prices = [1.0, 2.0, 1e-300];
        let adjusted = PricePolicy::default().apply(&mut prices, 0, 1).unwrap();
        assert_eq!(adjusted, 0);
        assert_eq!(prices, [1.0, 2.0, 1e-300]);
    }

    #[test]
    fn test_clamp_replaces_degenerate_prices() {
        let mut prices = [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
        let adjusted = PricePolicy::Clamp { floor: 0.01 }
            .apply(&mut prices, 0, 1)
            .unwrap();
        assert_eq!(adjusted, 5);
        assert_eq!(prices, [0.01, 0.01, 0.01, f64::MAX, 0.01]);
    }

    #[test]
    fn test_reject_reports_location() {
        let mut prices = [1.0, 0.0];
        let err = PricePolicy::Reject.apply(&mut prices, 12, 34).unwrap_err();
        assert_eq!(
            err,
            SimError::NonPositivePrice {
                simulation: 12,
                step: 34,
                asset: 1,
            }
        );
    }

    #[test]
    fn test_validate_floor() {
        assert!(PricePolicy::default().validate().is_ok());
        assert!(PricePolicy::Reject.validate().is_ok());
        assert!(PricePolicy::Clamp { floor: -1.0 }.validate().is_err());
        assert!(PricePolicy::Clamp { floor: f64::NAN }.validate().is_err());
    }
}
