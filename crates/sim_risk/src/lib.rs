//! # sim_risk (L4: Risk Analytics)
//!
//! Turns simulated asset paths into portfolio-level risk figures and replays
//! historical crises against the same portfolio.
//!
//! This crate provides:
//! - [`portfolio`]: validated weights and fixed-weight aggregation of paths
//!   into portfolio trajectories
//! - [`metrics`]: empirical VaR, CVaR and maximum drawdown
//! - [`stress`]: deterministic replay of historical scenario windows
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              sim_risk (L4)              │
//! ├─────────────────────────────────────────┤
//! │  portfolio/ - weights, trajectories     │
//! │  metrics/   - VaR, CVaR, drawdown       │
//! │  stress/    - historical replay         │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             sim_engine (L3)             │
//! │  Seeded parallel path generation        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sim_core::math::CorrelationMatrix;
//! use sim_engine::generator::PathGenerator;
//! use sim_engine::mc::SimulationConfig;
//! use sim_models::calibration::CalibratedParams;
//! use sim_models::models::ModelEnum;
//! use sim_risk::metrics::RiskCalculator;
//! use sim_risk::portfolio::{aggregate, AggregationBasis, PortfolioWeights};
//!
//! let params = CalibratedParams::new(
//!     vec!["SPY".to_string(), "AGG".to_string()],
//!     vec![0.08, 0.05],
//!     vec![0.2, 0.15],
//!     CorrelationMatrix::new(&[1.0, 0.3, 0.3, 1.0], 2).unwrap(),
//! )
//! .unwrap();
//! let model = ModelEnum::gbm(&params).unwrap();
//! let config = SimulationConfig::builder()
//!     .n_simulations(500)
//!     .n_steps(52)
//!     .build()
//!     .unwrap();
//! let paths = PathGenerator::new(config)
//!     .generate(&params, &model, &[470.0, 98.0])
//!     .unwrap();
//!
//! let weights = PortfolioWeights::new([("SPY", 0.6), ("AGG", 0.4)]).unwrap();
//! let trajectories = aggregate(&paths, &weights, AggregationBasis::Normalised).unwrap();
//! let report = RiskCalculator::default().compute(&trajectories).unwrap();
//!
//! assert!(report.cvar >= report.var);
//! assert!((0.0..=1.0).contains(&report.max_drawdown));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod metrics;
pub mod portfolio;
pub mod stress;

pub use metrics::{DrawdownMode, RiskCalculator, RiskReport, TailRisk};
pub use portfolio::{AggregationBasis, PortfolioTrajectories, PortfolioWeights};
pub use stress::{StressReplayer, StressResult, StressScenario};
