//! Risk report over a simulated distribution.

use rayon::prelude::*;
use sim_core::math::stats::{mean, median, population_std};
use sim_core::{SimError, SimResult};
use sim_engine::mc::{ParallelConfig, PathStorage};
use tracing::{info, warn};

use super::drawdown::{max_drawdown, DrawdownMode};
use super::tail::{tail_risk, TailRisk};
use crate::portfolio::PortfolioTrajectories;

/// Default VaR/CVaR confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Summary risk figures of one simulated distribution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskReport {
    /// Confidence level of `var` and `cvar`
    pub confidence: f64,
    /// Value-at-Risk of the terminal return (positive loss magnitude)
    pub var: f64,
    /// Conditional Value-at-Risk of the terminal return
    pub cvar: f64,
    /// Maximum drawdown summarised per `drawdown_mode`, in [0, 1]
    pub max_drawdown: f64,
    /// How `max_drawdown` was summarised
    pub drawdown_mode: DrawdownMode,
    /// Mean terminal return
    pub mean_return: f64,
    /// Median terminal return
    pub median_return: f64,
    /// Population standard deviation of terminal returns
    pub std_return: f64,
    /// Number of simulations analysed
    pub num_simulations: usize,
}

/// Computes VaR, CVaR and drawdown statistics.
///
/// # Examples
///
/// ```
/// use sim_risk::metrics::{DrawdownMode, RiskCalculator};
///
/// let calc = RiskCalculator::new(0.99).unwrap().with_drawdown_mode(DrawdownMode::Mean);
/// assert_eq!(calc.confidence(), 0.99);
///
/// let tail = calc.compute_from_returns(&[-0.3, -0.1, 0.0, 0.1, 0.2]).unwrap();
/// assert!(tail.cvar >= tail.var);
///
/// assert!(RiskCalculator::new(1.0).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RiskCalculator {
    confidence: f64,
    drawdown_mode: DrawdownMode,
    parallel: ParallelConfig,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            drawdown_mode: DrawdownMode::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl RiskCalculator {
    /// Creates a calculator at `confidence`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidModelParameter`] unless `0 < confidence < 1`.
    pub fn new(confidence: f64) -> SimResult<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(SimError::invalid_parameter(
                "confidence",
                format!("must lie in (0, 1), got {}", confidence),
            ));
        }
        Ok(Self {
            confidence,
            ..Self::default()
        })
    }

    /// Sets how drawdowns are summarised.
    pub fn with_drawdown_mode(mut self, mode: DrawdownMode) -> Self {
        self.drawdown_mode = mode;
        self
    }

    /// Overrides the rayon thresholds used for drawdowns.
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Confidence level.
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Drawdown summary mode.
    #[inline]
    pub fn drawdown_mode(&self) -> DrawdownMode {
        self.drawdown_mode
    }

    /// VaR and CVaR of a bare return sample.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyDistribution`] if `returns` is empty.
    pub fn compute_from_returns(&self, returns: &[f64]) -> SimResult<TailRisk> {
        tail_risk(returns, self.confidence)
    }

    /// Full report over portfolio trajectories.
    ///
    /// Drawdowns computed on terminal-only storage only see the initial and
    /// terminal values and understate intra-horizon losses.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyDistribution`] if there are no simulations.
    pub fn compute(&self, trajectories: &PortfolioTrajectories) -> SimResult<RiskReport> {
        let returns = trajectories.terminal_returns();
        let tail = self.compute_from_returns(returns)?;

        if trajectories.storage() == PathStorage::TerminalOnly {
            warn!("Drawdown computed from terminal-only storage");
        }

        let n = trajectories.num_simulations();
        let drawdowns: Vec<f64> = if self.parallel.should_parallelize(n) {
            (0..n)
                .into_par_iter()
                .with_min_len(self.parallel.batch_size)
                .map(|i| max_drawdown(trajectories.trajectory(i)))
                .collect()
        } else {
            trajectories.trajectories().map(max_drawdown).collect()
        };

        let max_drawdown = match self.drawdown_mode {
            DrawdownMode::Mean => mean(&drawdowns),
            DrawdownMode::Worst => drawdowns.iter().copied().fold(0.0, f64::max),
        };

        let report = RiskReport {
            confidence: self.confidence,
            var: tail.var,
            cvar: tail.cvar,
            max_drawdown,
            drawdown_mode: self.drawdown_mode,
            mean_return: mean(returns),
            median_return: median(returns),
            std_return: population_std(returns),
            num_simulations: n,
        };

        info!(
            confidence = report.confidence,
            var = report.var,
            cvar = report.cvar,
            max_drawdown = report.max_drawdown,
            num_simulations = n,
            "Risk metrics calculated"
        );
        Ok(report)
    }
}
