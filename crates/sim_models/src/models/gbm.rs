//! Multi-asset Geometric Brownian Motion.
//!
//! Each asset follows
//! ```text
//! dS = mu * S * dt + sigma * S * dW
//! ```
//! advanced with the exact log-space solution
//! ```text
//! S(t+dt) = S(t) * exp((mu - sigma^2/2) * dt + sigma * sqrt(dt) * Z)
//! ```
//! where `Z` is the asset's correlated standard normal shock.

use rand::Rng;
use sim_core::{SimError, SimResult};

use super::step::StepModel;
use crate::calibration::CalibratedParams;

/// GBM over a vector of assets with per-asset drift and volatility.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sim_models::models::{GbmModel, StepModel};
///
/// let model = GbmModel::new(vec![0.05], vec![0.0]).unwrap();
/// let mut prices = [100.0];
/// model.advance(&mut prices, &[0.0], 1.0, &mut StdRng::seed_from_u64(1));
/// assert!((prices[0] - 100.0 * 0.05_f64.exp()).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GbmModel {
    drift: Vec<f64>,
    volatility: Vec<f64>,
}

impl GbmModel {
    /// Creates a model from annualised drift and volatility.
    ///
    /// # Errors
    ///
    /// - [`SimError::AssetMismatch`] if the vectors differ in length
    /// - [`SimError::InvalidModelParameter`] for non-finite drift or negative
    ///   volatility
    pub fn new(drift: Vec<f64>, volatility: Vec<f64>) -> SimResult<Self> {
        validate_diffusion(&drift, &volatility)?;
        Ok(Self { drift, volatility })
    }

    /// Creates a model from calibrated parameters.
    pub fn from_params(params: &CalibratedParams) -> SimResult<Self> {
        Self::new(params.drift().to_vec(), params.volatility().to_vec())
    }

    /// Annualised drift per asset.
    pub fn drift(&self) -> &[f64] {
        &self.drift
    }

    /// Annualised volatility per asset.
    pub fn volatility(&self) -> &[f64] {
        &self.volatility
    }
}

impl StepModel for GbmModel {
    /// Number of drift entries.
    fn num_assets(&self) -> usize {
        self.drift.len()
    }

    /// Exact log-space step; draws nothing from `rng`.
    fn advance<R: Rng + ?Sized>(&self, prices: &mut [f64], shocks: &[f64], dt: f64, _rng: &mut R) {
        diffuse(prices, shocks, dt, &self.drift, &self.volatility);
    }

    /// Returns `"GBM"`.
    fn model_name(&self) -> &'static str {
        "GBM"
    }
}

/// Applies the log-space GBM update with the given drifts.
#[inline]
pub(crate) fn diffuse(prices: &mut [f64], shocks: &[f64], dt: f64, drift: &[f64], volatility: &[f64]) {
    let sqrt_dt = dt.sqrt();
    for (((s, z), mu), sigma) in prices.iter_mut().zip(shocks).zip(drift).zip(volatility) {
        let log_step = (mu - 0.5 * sigma * sigma) * dt + sigma * sqrt_dt * z;
        *s *= log_step.exp();
    }
}

/// Checks matching lengths, finite drifts and finite non-negative volatilities.
pub(crate) fn validate_diffusion(drift: &[f64], volatility: &[f64]) -> SimResult<()> {
    if drift.len() != volatility.len() {
        return Err(SimError::AssetMismatch(format!(
            "{} drifts but {} volatilities",
            drift.len(),
            volatility.len()
        )));
    }
    if let Some(mu) = drift.iter().find(|mu| !mu.is_finite()) {
        return Err(SimError::invalid_parameter("drift", format!("{} is not finite", mu)));
    }
    if let Some(sigma) = volatility.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(SimError::invalid_parameter(
            "volatility",
            format!("{} must be finite and non-negative", sigma),
        ));
    }
    Ok(())
}
