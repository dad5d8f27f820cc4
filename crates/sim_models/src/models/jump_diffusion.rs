//! Merton jump diffusion.
//!
//! Between jumps each asset follows GBM with a compensated drift; jumps arrive
//! independently per asset as a Poisson process:
//!
//! ```text
//! S(t+dt) = S(t) * exp((mu - lambda*kappa - sigma^2/2) dt + sigma sqrt(dt) Z + sum_{k=1..N} Y_k)
//! N ~ Poisson(lambda * dt),  Y_k ~ N(m, s^2),  kappa = exp(m + s^2/2) - 1
//! ```
//!
//! The compensation keeps `E[S(T)] = S(0) * exp(mu * T)`.

use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use sim_core::{SimError, SimResult};

use super::gbm::{diffuse, validate_diffusion};
use super::step::StepModel;
use crate::calibration::{CalibratedParams, JumpParams};

/// GBM diffusion plus compound Poisson log-normal jumps.
#[derive(Clone, Debug)]
pub struct JumpDiffusionModel {
    volatility: Vec<f64>,
    compensated_drift: Vec<f64>,
    jumps: JumpParams,
    jump_size: Normal<f64>,
}

impl JumpDiffusionModel {
    /// Creates a model from annualised drift, volatility and jump parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidModelParameter`] for invalid diffusion or jump
    /// parameters, [`SimError::AssetMismatch`] if drift and volatility differ
    /// in length.
    pub fn new(drift: Vec<f64>, volatility: Vec<f64>, jumps: JumpParams) -> SimResult<Self> {
        validate_diffusion(&drift, &volatility)?;
        jumps.validate()?;

        let jump_size = Normal::new(jumps.mean_log_jump, jumps.std_log_jump)
            .map_err(|e| SimError::invalid_parameter("std_log_jump", e.to_string()))?;
        let compensation = jumps.intensity * jumps.kappa();
        let compensated_drift = drift.iter().map(|mu| mu - compensation).collect();

        Ok(Self {
            volatility,
            compensated_drift,
            jumps,
            jump_size,
        })
    }

    /// Creates a model from calibrated parameters and jump parameters.
    pub fn from_params(params: &CalibratedParams, jumps: JumpParams) -> SimResult<Self> {
        Self::new(params.drift().to_vec(), params.volatility().to_vec(), jumps)
    }

    /// Jump parameters.
    pub fn jumps(&self) -> &JumpParams {
        &self.jumps
    }

    /// Diffusion drift after subtracting `lambda * kappa`.
    pub fn compensated_drift(&self) -> &[f64] {
        &self.compensated_drift
    }
}

impl StepModel for JumpDiffusionModel {
    /// Number of volatility entries.
    fn num_assets(&self) -> usize {
        self.volatility.len()
    }

    /// Diffuses with the compensated drift, then applies each asset's jumps.
    ///
    /// Jump counts and sizes are drawn from `rng`, one Poisson draw per asset.
    fn advance<R: Rng + ?Sized>(&self, prices: &mut [f64], shocks: &[f64], dt: f64, rng: &mut R) {
        diffuse(prices, shocks, dt, &self.compensated_drift, &self.volatility);

        let lambda_dt = self.jumps.intensity * dt;
        let arrivals = match Poisson::new(lambda_dt) {
            Ok(poisson) => poisson,
            // Zero intensity: no jumps
            Err(_) => return,
        };

        for s in prices.iter_mut() {
            let count: f64 = arrivals.sample(rng);
            let n_jumps = count as u64;
            if n_jumps == 0 {
                continue;
            }
            let log_jump: f64 = (0..n_jumps).map(|_| self.jump_size.sample(rng)).sum();
            *s *= log_jump.exp();
        }
    }

    /// Returns `"JumpDiffusion"`.
    fn model_name(&self) -> &'static str {
        "JumpDiffusion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jump_model_compensated_drift() {
        let jumps = JumpParams::default();
        let model = JumpDiffusionModel::new(vec![0.08], vec![0.2], jumps).unwrap();
        assert_relative_eq!(
            model.compensated_drift()[0],
            0.08 - 0.1 * jumps.kappa(),
            epsilon = 1e-15
        );
        assert_eq!(model.model_name(), "JumpDiffusion");
        assert_eq!(model.num_assets(), 1);
    }

    #[test]
    fn test_jump_model_rejects_negative_intensity() {
        let jumps = JumpParams {
            intensity: -1.0,
            mean_log_jump: 0.0,
            std_log_jump: 0.1,
        };
        assert!(matches!(
            JumpDiffusionModel::new(vec![0.0], vec![0.1], jumps),
            Err(SimError::InvalidModelParameter { .. })
        ));
    }

    #[test]
    fn test_zero_intensity_reduces_to_gbm() {
        let jumps = JumpParams::new(0.0, -0.05, 0.1).unwrap();
        let model = JumpDiffusionModel::new(vec![0.05], vec![0.2], jumps).unwrap();
        let gbm = super::super::GbmModel::new(vec![0.05], vec![0.2]).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let mut a = [100.0];
        let mut b = [100.0];
        model.advance(&mut a, &[0.3], 0.01, &mut rng);
        gbm.advance(&mut b, &[0.3], 0.01, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn test_certain_jumps_move_price() {
        // Huge intensity with a deterministic log jump of -0.1
        let jumps = JumpParams::new(1.0e4, -0.1, 0.0).unwrap();
        let model = JumpDiffusionModel::new(vec![0.0], vec![0.0], jumps).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut prices = [100.0];
        model.advance(&mut prices, &[0.0], 1.0 / 252.0, &mut rng);
        // Compensation cancels jumps in expectation only; the realised path must differ
        assert!(prices[0] != 100.0);
        assert!(prices[0].is_finite() && prices[0] > 0.0);
    }

    #[test]
    fn test_mean_terminal_matches_compensated_drift() {
        let jumps = JumpParams::new(2.0, -0.05, 0.1).unwrap();
        let model = JumpDiffusionModel::new(vec![0.05], vec![0.1], jumps).unwrap();
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        let n_paths = 20_000;
        let n_steps = 12;
        let dt = 1.0 / n_steps as f64;
        let mut total = 0.0;
        for _ in 0..n_paths {
            let mut prices = [100.0];
            for _ in 0..n_steps {
                let z = [normal.sample(&mut rng)];
                model.advance(&mut prices, &z, dt, &mut rng);
            }
            total += prices[0];
        }
        let mean = total / n_paths as f64;
        let expected = 100.0 * 0.05_f64.exp();
        assert!((mean - expected).abs() / expected < 0.01, "mean {} expected {}", mean, expected);
    }
}
