//! # sim_core: Foundation Layer for the Risk Simulator
//!
//! ## Layer 1 (Foundation) Role
//!
//! sim_core is the bottom layer of the simulator workspace, providing:
//! - Historical price series: `AssetSeries`, `PricePoint` (`types::series`)
//! - Business-day helpers for scenario coverage checks (`types::time`)
//! - The shared error type `SimError` (`error`)
//! - Descriptive statistics and empirical quantiles (`math::stats`)
//! - Correlation matrices and Cholesky factors (`math::correlation`)
//! - The data-provider seam `MarketDataProvider` (`market_data`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other sim_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Calendar dates for price observations
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sim_core::math::stats::{log_returns, mean};
//! use sim_core::types::AssetSeries;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let series = AssetSeries::new(
//!     "SPY",
//!     vec![(d(2), 100.0), (d(3), 101.0), (d(4), 100.5)],
//! )
//! .unwrap();
//!
//! let returns = log_returns(&series.prices());
//! assert_eq!(returns.len(), 2);
//! assert!(mean(&returns).is_finite());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for series and correlation matrices

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod market_data;
pub mod math;
pub mod types;

pub use error::{SimError, SimResult};
