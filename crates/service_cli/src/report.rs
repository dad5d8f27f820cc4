//! JSON run report.

use serde::Serialize;
use sim_models::calibration::CalibratedParams;
use sim_models::models::ModelKind;
use sim_risk::metrics::RiskReport;
use sim_risk::stress::StressResult;

/// Calibrated parameters in a reader-friendly layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationSummary {
    /// Calibrated tickers
    pub tickers: Vec<String>,
    /// Annualised drift per ticker
    pub drift: Vec<f64>,
    /// Annualised volatility per ticker
    pub volatility: Vec<f64>,
    /// Correlation matrix rows
    pub correlation: Vec<Vec<f64>>,
    /// Returns used per ticker
    pub observations: usize,
}

impl From<&CalibratedParams> for CalibrationSummary {
    fn from(params: &CalibratedParams) -> Self {
        Self {
            tickers: params.tickers().to_vec(),
            drift: params.drift().to_vec(),
            volatility: params.volatility().to_vec(),
            correlation: params.correlation().to_rows(),
            observations: params.observations(),
        }
    }
}

/// Parameters that identify a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Model used
    pub model: ModelKind,
    /// Master seed
    pub seed: u64,
    /// Simulations run
    pub n_simulations: usize,
    /// Steps per simulation
    pub n_steps: usize,
    /// Horizon in years
    pub horizon_years: f64,
    /// Prices adjusted by the clamp policy
    pub clamped_prices: usize,
}

/// Everything a run produces, handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Run identification
    pub run: RunSummary,
    /// Calibration output
    pub calibration: CalibrationSummary,
    /// Simulated risk figures
    pub risk: RiskReport,
    /// Historical replays, one per scenario
    pub stress: Vec<StressResult>,
}

impl RunReport {
    /// Serialises the report as JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
