//! Tail-risk and drawdown metrics.
//!
//! - [`RiskCalculator`]: builds a [`RiskReport`] from portfolio trajectories
//! - [`TailRisk`]: empirical VaR and CVaR of a return sample
//! - [`max_drawdown`]: peak-to-trough loss of one trajectory

mod calculator;
mod drawdown;
mod tail;

pub use calculator::{RiskCalculator, RiskReport, DEFAULT_CONFIDENCE};
pub use drawdown::{max_drawdown, DrawdownMode};
pub use tail::TailRisk;
