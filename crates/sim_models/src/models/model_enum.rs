//! Static dispatch enum for step models.
//!
//! `ModelEnum` wraps every [`StepModel`] so the engine can be generic over
//! the model without trait objects. Dispatch is a `match` per step.
//!
//! ## Example
//!
//! ```
//! use sim_core::math::CorrelationMatrix;
//! use sim_models::calibration::{CalibratedParams, JumpParams};
//! use sim_models::models::{ModelEnum, ModelKind, StepModel};
//!
//! let params = CalibratedParams::new(
//!     vec!["SPY".to_string(), "TLT".to_string()],
//!     vec![0.08, 0.03],
//!     vec![0.2, 0.1],
//!     CorrelationMatrix::identity(2),
//! )
//! .unwrap();
//!
//! let model = ModelEnum::jump_diffusion(&params, JumpParams::default()).unwrap();
//! assert_eq!(model.kind(), ModelKind::JumpDiffusion);
//! assert_eq!(model.num_assets(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sim_core::{SimError, SimResult};

use super::bootstrap::BootstrapModel;
use super::gbm::GbmModel;
use super::jump_diffusion::JumpDiffusionModel;
use super::step::StepModel;
use crate::calibration::{CalibratedParams, JumpParams};

/// Model selector, as named in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModelKind {
    /// Geometric Brownian Motion
    #[default]
    Gbm,
    /// Merton jump diffusion
    JumpDiffusion,
    /// Historical bootstrap
    Bootstrap,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Gbm => "gbm",
            ModelKind::JumpDiffusion => "jump_diffusion",
            ModelKind::Bootstrap => "bootstrap",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gbm" => Ok(ModelKind::Gbm),
            "jump_diffusion" | "jump-diffusion" | "merton" => Ok(ModelKind::JumpDiffusion),
            "bootstrap" => Ok(ModelKind::Bootstrap),
            other => Err(SimError::invalid_parameter(
                "model",
                format!("unknown model '{}', expected gbm, jump_diffusion or bootstrap", other),
            )),
        }
    }
}

/// Static dispatch over the available step models.
#[derive(Clone, Debug)]
pub enum ModelEnum {
    /// Geometric Brownian Motion
    Gbm(GbmModel),
    /// Merton jump diffusion
    JumpDiffusion(JumpDiffusionModel),
    /// Historical bootstrap
    Bootstrap(BootstrapModel),
}

impl ModelEnum {
    /// GBM from calibrated drift and volatility.
    pub fn gbm(params: &CalibratedParams) -> SimResult<Self> {
        Ok(ModelEnum::Gbm(GbmModel::from_params(params)?))
    }

    /// Jump diffusion from calibrated parameters and jump parameters.
    pub fn jump_diffusion(params: &CalibratedParams, jumps: JumpParams) -> SimResult<Self> {
        Ok(ModelEnum::JumpDiffusion(JumpDiffusionModel::from_params(
            params, jumps,
        )?))
    }

    /// Historical bootstrap.
    pub fn bootstrap(model: BootstrapModel) -> Self {
        ModelEnum::Bootstrap(model)
    }

    /// Which variant this is.
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelEnum::Gbm(_) => ModelKind::Gbm,
            ModelEnum::JumpDiffusion(_) => ModelKind::JumpDiffusion,
            ModelEnum::Bootstrap(_) => ModelKind::Bootstrap,
        }
    }
}

impl StepModel for ModelEnum {
    fn num_assets(&self) -> usize {
        match self {
            ModelEnum::Gbm(m) => m.num_assets(),
            ModelEnum::JumpDiffusion(m) => m.num_assets(),
            ModelEnum::Bootstrap(m) => m.num_assets(),
        }
    }

    #[inline]
    fn advance<R: Rng + ?Sized>(&self, prices: &mut [f64], shocks: &[f64], dt: f64, rng: &mut R) {
        match self {
            ModelEnum::Gbm(m) => m.advance(prices, shocks, dt, rng),
            ModelEnum::JumpDiffusion(m) => m.advance(prices, shocks, dt, rng),
            ModelEnum::Bootstrap(m) => m.advance(prices, shocks, dt, rng),
        }
    }

    fn uses_shocks(&self) -> bool {
        match self {
            ModelEnum::Gbm(m) => m.uses_shocks(),
            ModelEnum::JumpDiffusion(m) => m.uses_shocks(),
            ModelEnum::Bootstrap(m) => m.uses_shocks(),
        }
    }

    fn model_name(&self) -> &'static str {
        match self {
            ModelEnum::Gbm(m) => m.model_name(),
            ModelEnum::JumpDiffusion(m) => m.model_name(),
            ModelEnum::Bootstrap(m) => m.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sim_core::math::CorrelationMatrix;

    fn params() -> CalibratedParams {
        CalibratedParams::new(
            vec!["A".to_string()],
            vec![0.05],
            vec![0.2],
            CorrelationMatrix::identity(1),
        )
        .unwrap()
    }

    #[test]
    fn test_model_kind_parse_and_display() {
        assert_eq!("gbm".parse::<ModelKind>().unwrap(), ModelKind::Gbm);
        assert_eq!(
            "Jump_Diffusion".parse::<ModelKind>().unwrap(),
            ModelKind::JumpDiffusion
        );
        assert_eq!("bootstrap".parse::<ModelKind>().unwrap(), ModelKind::Bootstrap);
        assert!("heston".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::JumpDiffusion.to_string(), "jump_diffusion");
        assert_eq!(ModelKind::default(), ModelKind::Gbm);
    }

    #[test]
    fn test_enum_dispatch_matches_inner_model() {
        let inner = GbmModel::from_params(&params()).unwrap();
        let wrapped = ModelEnum::gbm(&params()).unwrap();
        assert_eq!(wrapped.kind(), ModelKind::Gbm);
        assert_eq!(wrapped.model_name(), "GBM");

        let mut rng = StdRng::seed_from_u64(0);
        let mut a = [100.0];
        let mut b = [100.0];
        inner.advance(&mut a, &[1.0], 0.1, &mut rng);
        wrapped.advance(&mut b, &[1.0], 0.1, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn test_bootstrap_variant() {
        let model = ModelEnum::bootstrap(BootstrapModel::from_returns(&[vec![0.0]]).unwrap());
        assert_eq!(model.kind(), ModelKind::Bootstrap);
        assert!(!model.uses_shocks());
        assert_eq!(model.num_assets(), 1);
    }

    #[test]
    fn test_jump_variant_rejects_bad_params() {
        let jumps = JumpParams {
            intensity: 0.1,
            mean_log_jump: 0.0,
            std_log_jump: -1.0,
        };
        assert!(ModelEnum::jump_diffusion(&params(), jumps).is_err());
    }
}
