//! Stochastic step models.
//!
//! - [`step`]: the [`StepModel`] trait
//! - [`gbm`]: Geometric Brownian Motion
//! - [`jump_diffusion`]: Merton jump diffusion
//! - [`bootstrap`]: historical return resampling
//! - [`model_enum`]: [`ModelEnum`] static dispatch and [`ModelKind`] selector

pub mod bootstrap;
pub mod gbm;
pub mod jump_diffusion;
pub mod model_enum;
pub mod step;

pub use bootstrap::BootstrapModel;
pub use gbm::GbmModel;
pub use jump_diffusion::JumpDiffusionModel;
pub use model_enum::{ModelEnum, ModelKind};
pub use step::StepModel;
