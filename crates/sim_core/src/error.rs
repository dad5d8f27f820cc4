//! Error types for structured error handling.
//!
//! Every component of the simulator reports failures through [`SimError`].
//! Errors are raised at the entry of the component that first needs the
//! offending value and are propagated to the caller unmodified.

use thiserror::Error;

use crate::math::correlation::CorrelationError;

/// Convenience alias used throughout the simulator crates.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur during calibration, simulation and risk analysis.
///
/// # Examples
/// ```
/// use sim_core::SimError;
///
/// let err = SimError::WeightSum { sum: 0.9 };
/// assert_eq!(format!("{}", err), "Portfolio weights sum to 0.9, expected 1");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Available history is shorter than the calibration window.
    #[error("Insufficient data for {ticker}: need {required} observations, got {available}")]
    InsufficientData {
        /// Ticker whose history is too short
        ticker: String,
        /// Observations required
        required: usize,
        /// Observations available
        available: usize,
    },

    /// Portfolio weights do not sum to one within tolerance.
    #[error("Portfolio weights sum to {sum}, expected 1")]
    WeightSum {
        /// Actual sum of the weights
        sum: f64,
    },

    /// Zero simulations were requested or produced.
    #[error("Empty distribution: no simulations to analyse")]
    EmptyDistribution,

    /// Historical data does not fully cover a stress window.
    #[error("Scenario '{scenario}' not covered by {ticker} history: {detail}")]
    ScenarioDataGap {
        /// Scenario name
        scenario: String,
        /// Ticker with the gap
        ticker: String,
        /// Description of the gap
        detail: String,
    },

    /// Model or simulation parameter outside its valid domain.
    #[error("Invalid model parameter '{name}': {reason}")]
    InvalidModelParameter {
        /// Parameter name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Price series violates its construction invariants.
    #[error("Invalid price series for {ticker}: {reason}")]
    InvalidSeries {
        /// Ticker of the series
        ticker: String,
        /// Violated invariant
        reason: String,
    },

    /// Calibration windows of different assets do not share the same dates.
    #[error("Series {ticker} is not aligned with {reference} over the calibration window")]
    SeriesMisaligned {
        /// Misaligned ticker
        ticker: String,
        /// Ticker used as the date reference
        reference: String,
    },

    /// Asset sets of two inputs do not match.
    #[error("Asset mismatch: {0}")]
    AssetMismatch(String),

    /// Correlation matrix validation or factorisation failed.
    #[error("Correlation error: {0}")]
    Correlation(#[from] CorrelationError),

    /// A simulated price became non-positive under the reject policy.
    #[error("Non-positive price in simulation {simulation}, step {step}, asset {asset}")]
    NonPositivePrice {
        /// Simulation index
        simulation: usize,
        /// Step index (1-based, step 0 is the initial price)
        step: usize,
        /// Asset index
        asset: usize,
    },
}

impl SimError {
    /// Shorthand for [`SimError::InvalidModelParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModelParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
