//! Command-line runner for the stochastic simulation and risk analytics engine
//!
//! Wires the simulator crates into a single pipeline driven by a TOML run
//! configuration and a directory of CSV price files.
//!
//! # Pipeline
//!
//! ```text
//! CSV history ─▶ ReturnCalibrator ─▶ PathGenerator ─▶ PortfolioAggregator ─▶ RiskCalculator
//!      │                                                                          │
//!      └──────────────────────────▶ StressReplayer ─────────────────────────────▶ RunReport
//! ```
//!
//! # Commands
//!
//! - `risk-sim run` - Calibrate, simulate and report risk as JSON
//! - `risk-sim calibrate` - Print calibrated drift, volatility and correlation
//! - `risk-sim check` - Validate the configuration and its price files

pub mod commands;
pub mod config;
pub mod error;
pub mod provider;
pub mod report;

pub use config::{build_config, build_config_with_env, CliArgs, LogLevel, RunConfig};
pub use error::{CliError, Result};
pub use provider::CsvDataProvider;
pub use report::{CalibrationSummary, RunReport, RunSummary};
