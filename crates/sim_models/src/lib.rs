//! # sim_models (L2: Models)
//!
//! Calibration of historical returns and the stochastic step models that
//! advance simulated prices.
//!
//! This crate provides:
//! - [`calibration::ReturnCalibrator`]: drift, volatility, correlation and
//!   covariance from trailing log returns
//! - [`calibration::CalibratedParams`] and [`calibration::JumpParams`]
//! - Step models: [`models::GbmModel`], [`models::JumpDiffusionModel`],
//!   [`models::BootstrapModel`]
//! - [`models::ModelEnum`] for static dispatch over the step models
//!
//! ## Design Principles
//!
//! - **Enum-based models** for static dispatch (no `Box<dyn StepModel>`)
//! - **Validate at construction**: every model and parameter set rejects
//!   invalid input once, so the simulation loop never re-checks
//! - **Whole-vector steps**: a model advances all assets of one simulation at
//!   a time, receiving already-correlated shocks from the engine
//!
//! ## Example
//!
//! ```
//! use sim_core::math::CorrelationMatrix;
//! use sim_models::calibration::CalibratedParams;
//! use sim_models::models::{ModelEnum, StepModel};
//!
//! let params = CalibratedParams::new(
//!     vec!["SPY".to_string()],
//!     vec![0.08],
//!     vec![0.0],
//!     CorrelationMatrix::identity(1),
//! )
//! .unwrap();
//!
//! let model = ModelEnum::gbm(&params).unwrap();
//! let mut prices = [100.0];
//! let mut rng = rand::thread_rng();
//! model.advance(&mut prices, &[0.0], 1.0, &mut rng);
//! assert!((prices[0] - 100.0 * 0.08_f64.exp()).abs() < 1e-9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calibration;
pub mod models;
