//! Monte Carlo run configuration and storage.
//!
//! - [`config`]: [`SimulationConfig`] and its builder, [`PathStorage`]
//! - [`policy`]: [`PricePolicy`] for non-positive prices
//! - [`paths`]: [`SimulatedPaths`] flat path buffer
//! - [`parallel`]: [`ParallelConfig`] rayon thresholds

pub mod config;
pub mod parallel;
pub mod paths;
pub mod policy;

pub use config::{
    PathStorage, SimulationConfig, SimulationConfigBuilder, DEFAULT_SEED, MAX_SIMULATIONS,
    MAX_STEPS,
};
pub use parallel::ParallelConfig;
pub use paths::SimulatedPaths;
pub use policy::{PricePolicy, DEFAULT_PRICE_FLOOR};
