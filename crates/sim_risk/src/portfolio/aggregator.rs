//! Fixed-weight aggregation of simulated paths.

use rayon::prelude::*;
use sim_core::{SimError, SimResult};
use sim_engine::mc::{ParallelConfig, PathStorage, SimulatedPaths};
use tracing::{debug, info};

use super::weights::PortfolioWeights;

/// How asset prices are combined into a portfolio value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregationBasis {
    /// `V_t = Σ w_a · S_a(t) / S_a(0)`: weights are capital fractions.
    #[default]
    Normalised,
    /// `V_t = Σ w_a · S_a(t)`: literal weighted sum of prices.
    Price,
}

/// Portfolio value per simulation and stored step.
///
/// Row-major `(num_simulations, stored_steps)` matrix plus the terminal
/// return `V_final / V_initial - 1` of every simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioTrajectories {
    values: Vec<f64>,
    terminal_returns: Vec<f64>,
    num_simulations: usize,
    stored_steps: usize,
    storage: PathStorage,
    basis: AggregationBasis,
}

impl PortfolioTrajectories {
    /// Builds trajectories from a row-major value matrix.
    ///
    /// Useful for analysing externally produced value paths.
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptyDistribution`] when `num_simulations == 0`
    /// - [`SimError::InvalidModelParameter`] when `values` does not hold
    ///   `num_simulations` rows of at least two positive values
    pub fn from_values(
        values: Vec<f64>,
        num_simulations: usize,
        storage: PathStorage,
        basis: AggregationBasis,
    ) -> SimResult<Self> {
        if num_simulations == 0 {
            return Err(SimError::EmptyDistribution);
        }
        if values.len() % num_simulations != 0 || values.len() / num_simulations < 2 {
            return Err(SimError::invalid_parameter(
                "values",
                format!(
                    "{} values cannot form {} trajectories of at least two steps",
                    values.len(),
                    num_simulations
                ),
            ));
        }
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(SimError::invalid_parameter(
                "values",
                "portfolio values must be finite and positive",
            ));
        }
        let stored_steps = values.len() / num_simulations;
        let terminal_returns = terminal_returns(&values, stored_steps);
        Ok(Self {
            values,
            terminal_returns,
            num_simulations,
            stored_steps,
            storage,
            basis,
        })
    }

    /// Number of simulations.
    #[inline]
    pub fn num_simulations(&self) -> usize {
        self.num_simulations
    }

    /// Stored values per simulation.
    #[inline]
    pub fn stored_steps(&self) -> usize {
        self.stored_steps
    }

    /// Storage mode of the underlying paths.
    #[inline]
    pub fn storage(&self) -> PathStorage {
        self.storage
    }

    /// Aggregation basis used.
    #[inline]
    pub fn basis(&self) -> AggregationBasis {
        self.basis
    }

    /// Value trajectory of one simulation.
    #[inline]
    pub fn trajectory(&self, simulation: usize) -> &[f64] {
        let start = simulation * self.stored_steps;
        &self.values[start..start + self.stored_steps]
    }

    /// Portfolio value of `simulation` at stored index `step`.
    #[inline]
    pub fn value(&self, simulation: usize, step: usize) -> f64 {
        self.trajectory(simulation)[step]
    }

    /// Iterates over all trajectories in simulation order.
    pub fn trajectories(&self) -> std::slice::Chunks<'_, f64> {
        self.values.chunks(self.stored_steps)
    }

    /// Terminal return of every simulation.
    #[inline]
    pub fn terminal_returns(&self) -> &[f64] {
        &self.terminal_returns
    }

    /// Raw row-major value matrix.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

fn terminal_returns(values: &[f64], stored_steps: usize) -> Vec<f64> {
    values
        .chunks(stored_steps)
        .map(|row| row[stored_steps - 1] / row[0] - 1.0)
        .collect()
}

/// Combines per-asset paths into portfolio trajectories.
///
/// Weights are matched to simulated assets by ticker and held fixed for the
/// whole horizon (no rebalancing).
///
/// # Examples
///
/// ```
/// use sim_core::math::CorrelationMatrix;
/// use sim_engine::generator::PathGenerator;
/// use sim_engine::mc::SimulationConfig;
/// use sim_models::calibration::CalibratedParams;
/// use sim_models::models::ModelEnum;
/// use sim_risk::portfolio::{AggregationBasis, PortfolioAggregator, PortfolioWeights};
///
/// let params = CalibratedParams::new(
///     vec!["A".to_string(), "B".to_string()],
///     vec![0.05, 0.05],
///     vec![0.0, 0.0],
///     CorrelationMatrix::identity(2),
/// )
/// .unwrap();
/// let config = SimulationConfig::builder().n_simulations(4).n_steps(10).build().unwrap();
/// let paths = PathGenerator::new(config)
///     .generate(&params, &ModelEnum::gbm(&params).unwrap(), &[50.0, 200.0])
///     .unwrap();
///
/// let weights = PortfolioWeights::new([("A", 0.5), ("B", 0.5)]).unwrap();
/// let trajectories = PortfolioAggregator::new(AggregationBasis::Normalised)
///     .aggregate(&paths, &weights)
///     .unwrap();
///
/// assert!((trajectories.value(0, 0) - 1.0).abs() < 1e-12);
/// assert!((trajectories.terminal_returns()[0] - (0.05_f64.exp() - 1.0)).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PortfolioAggregator {
    basis: AggregationBasis,
    parallel: ParallelConfig,
}

impl PortfolioAggregator {
    /// Creates an aggregator with the default parallel settings.
    pub fn new(basis: AggregationBasis) -> Self {
        Self {
            basis,
            parallel: ParallelConfig::default(),
        }
    }

    /// Overrides the rayon thresholds.
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Aggregation basis.
    #[inline]
    pub fn basis(&self) -> AggregationBasis {
        self.basis
    }

    /// Aggregates `paths` with `weights`.
    ///
    /// # Errors
    ///
    /// - [`SimError::AssetMismatch`] when weighted and simulated tickers differ
    /// - [`SimError::EmptyDistribution`] when `paths` holds no simulation
    pub fn aggregate(
        &self,
        paths: &SimulatedPaths,
        weights: &PortfolioWeights,
    ) -> SimResult<PortfolioTrajectories> {
        let aligned = weights.aligned_to(paths.tickers())?;
        let n_simulations = paths.num_simulations();
        if n_simulations == 0 {
            return Err(SimError::EmptyDistribution);
        }

        let stored_steps = paths.stored_steps();
        let num_assets = paths.num_assets();

        // Per-asset multipliers applied to raw prices
        let factors: Vec<f64> = match self.basis {
            AggregationBasis::Normalised => (0..num_assets)
                .map(|a| aligned[a] / paths.initial_price(a))
                .collect(),
            AggregationBasis::Price => aligned,
        };

        info!(
            n_simulations,
            stored_steps,
            assets = num_assets,
            basis = ?self.basis,
            "Aggregating portfolio trajectories"
        );
        debug!(?factors, "Aggregation factors");

        let fill = |(i, row): (usize, &mut [f64])| {
            for (t, value) in row.iter_mut().enumerate() {
                *value = paths
                    .prices_at(i, t)
                    .iter()
                    .zip(&factors)
                    .map(|(price, factor)| price * factor)
                    .sum();
            }
        };

        let mut values = vec![0.0; n_simulations * stored_steps];
        if self.parallel.should_parallelize(n_simulations) {
            values
                .par_chunks_mut(stored_steps)
                .with_min_len(self.parallel.batch_size)
                .enumerate()
                .for_each(fill);
        } else {
            values.chunks_mut(stored_steps).enumerate().for_each(fill);
        }

        let terminal_returns = terminal_returns(&values, stored_steps);
        Ok(PortfolioTrajectories {
            values,
            terminal_returns,
            num_simulations: n_simulations,
            stored_steps,
            storage: paths.storage(),
            basis: self.basis,
        })
    }
}

/// Aggregates `paths` with `weights` on the given basis.
///
/// Shorthand for [`PortfolioAggregator::new`] followed by
/// [`PortfolioAggregator::aggregate`].
pub fn aggregate(
    paths: &SimulatedPaths,
    weights: &PortfolioWeights,
    basis: AggregationBasis,
) -> SimResult<PortfolioTrajectories> {
    PortfolioAggregator::new(basis).aggregate(paths, weights)
}
