//! Historical bootstrap.
//!
//! Each step multiplies prices by the gross returns of one historical date,
//! drawn uniformly with replacement. Whole rows are resampled, so the
//! cross-sectional dependence between assets on a given date is kept without
//! estimating any correlation. One step corresponds to one observation period
//! of the source history; `dt` and the Gaussian shocks are ignored.

use rand::Rng;
use sim_core::math::stats::log_returns;
use sim_core::types::AssetSeries;
use sim_core::{SimError, SimResult};

use super::step::StepModel;
use crate::calibration::aligned_windows;

/// Resamples historical log-return rows.
#[derive(Clone, Debug, PartialEq)]
pub struct BootstrapModel {
    /// Row-major `(num_rows, num_assets)` log returns
    returns: Vec<f64>,
    num_assets: usize,
}

impl BootstrapModel {
    /// Builds the model from rows of per-asset log returns.
    ///
    /// # Errors
    ///
    /// - [`SimError::InsufficientData`] when no rows are given
    /// - [`SimError::AssetMismatch`] when rows differ in width
    /// - [`SimError::InvalidModelParameter`] for non-finite returns
    pub fn from_returns(rows: &[Vec<f64>]) -> SimResult<Self> {
        let num_assets = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || num_assets == 0 {
            return Err(SimError::InsufficientData {
                ticker: "bootstrap".to_string(),
                required: 1,
                available: 0,
            });
        }
        if let Some(row) = rows.iter().find(|r| r.len() != num_assets) {
            return Err(SimError::AssetMismatch(format!(
                "bootstrap row of width {} expected {}",
                row.len(),
                num_assets
            )));
        }
        let returns: Vec<f64> = rows.iter().flatten().copied().collect();
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(SimError::invalid_parameter(
                "returns",
                "bootstrap returns must be finite",
            ));
        }
        Ok(Self {
            returns,
            num_assets,
        })
    }

    /// Builds the model from the trailing `window` prices of each series.
    ///
    /// Uses the same alignment rules as the return calibrator.
    pub fn from_series(series: &[AssetSeries], window: usize) -> SimResult<Self> {
        let windows = aligned_windows(series, window)?;
        let per_asset: Vec<Vec<f64>> = windows
            .iter()
            .map(|w| log_returns(&w.iter().map(|p| p.price).collect::<Vec<_>>()))
            .collect();

        let rows: Vec<Vec<f64>> = (0..window - 1)
            .map(|t| per_asset.iter().map(|r| r[t]).collect())
            .collect();
        Self::from_returns(&rows)
    }

    /// Number of historical rows available for resampling.
    pub fn num_rows(&self) -> usize {
        self.returns.len() / self.num_assets
    }

    /// Log returns of row `idx`.
    pub fn row(&self, idx: usize) -> &[f64] {
        &self.returns[idx * self.num_assets..(idx + 1) * self.num_assets]
    }
}

impl StepModel for BootstrapModel {
    fn num_assets(&self) -> usize {
        self.num_assets
    }

    /// Applies one historical row drawn uniformly with replacement.
    fn advance<R: Rng + ?Sized>(&self, prices: &mut [f64], _shocks: &[f64], _dt: f64, rng: &mut R) {
        let idx = rng.gen_range(0..self.num_rows());
        for (s, r) in prices.iter_mut().zip(self.row(idx)) {
            *s *= r.exp();
        }
    }

    fn uses_shocks(&self) -> bool {
        false
    }

    fn model_name(&self) -> &'static str {
        "Bootstrap"
    }
}
