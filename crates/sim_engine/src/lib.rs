//! # sim_engine (L3: Path Generation)
//!
//! Monte Carlo engine producing correlated multi-asset price paths.
//!
//! This crate provides:
//! - [`rng::SimRng`]: seeded generator with per-simulation sub-streams
//! - [`mc::SimulationConfig`]: validated run configuration (builder pattern)
//! - [`mc::PricePolicy`]: clamp or reject degenerate prices
//! - [`mc::SimulatedPaths`]: flat row-major path buffer
//! - [`generator::PathGenerator`]: the shared driver loop, sequential or rayon
//!
//! ## Reproducibility
//!
//! Simulation `i` depends only on `(seed, i)`. Parallel runs are therefore
//! bit-identical to sequential ones, whatever the thread count.
//!
//! ## Example
//!
//! ```rust
//! use sim_core::math::CorrelationMatrix;
//! use sim_engine::generator::PathGenerator;
//! use sim_engine::mc::{PathStorage, SimulationConfig};
//! use sim_models::calibration::{CalibratedParams, JumpParams};
//! use sim_models::models::ModelEnum;
//!
//! let params = CalibratedParams::new(
//!     vec!["SPY".to_string()],
//!     vec![0.07],
//!     vec![0.18],
//!     CorrelationMatrix::identity(1),
//! )
//! .unwrap();
//! let model = ModelEnum::jump_diffusion(&params, JumpParams::default()).unwrap();
//!
//! let config = SimulationConfig::builder()
//!     .n_simulations(500)
//!     .n_steps(52)
//!     .storage(PathStorage::TerminalOnly)
//!     .build()
//!     .unwrap();
//!
//! let paths = PathGenerator::new(config).generate(&params, &model, &[470.0]).unwrap();
//! assert_eq!(paths.terminal_prices(0).len(), 500);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod generator;
pub mod mc;
pub mod rng;

pub use generator::PathGenerator;
