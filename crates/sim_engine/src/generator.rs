//! Path Generator: correlated multi-asset Monte Carlo paths.
//!
//! ## Algorithm
//!
//! For simulation `i` with `dt = T / N`:
//!
//! 1. Seed sub-stream `SimRng::for_simulation(seed, i)`
//! 2. For each step: draw `Z ~ N(0, I)`, correlate `W = L * Z`, let the model
//!    advance the whole price vector, apply the [`PricePolicy`]
//! 3. Store every step ([`PathStorage::Full`]) or only the terminal one
//!
//! Each simulation writes only its own contiguous block of the output buffer,
//! so blocks are filled in parallel with rayon once the run is large enough.
//! The result is bit-identical to sequential execution.

use rayon::prelude::*;
use sim_core::math::CholeskyFactor;
use sim_core::{SimError, SimResult};
use sim_models::calibration::CalibratedParams;
use sim_models::models::{ModelEnum, StepModel};
use tracing::{debug, info, warn};

use crate::mc::{ParallelConfig, PathStorage, PricePolicy, SimulatedPaths, SimulationConfig};
use crate::rng::SimRng;

/// Generates simulated price paths for a calibrated asset universe.
///
/// # Examples
///
/// ```rust
/// use sim_core::math::CorrelationMatrix;
/// use sim_engine::generator::PathGenerator;
/// use sim_engine::mc::SimulationConfig;
/// use sim_models::calibration::CalibratedParams;
/// use sim_models::models::ModelEnum;
///
/// let params = CalibratedParams::new(
///     vec!["SPY".to_string(), "TLT".to_string()],
///     vec![0.08, 0.05],
///     vec![0.2, 0.15],
///     CorrelationMatrix::new(&[1.0, 0.3, 0.3, 1.0], 2).unwrap(),
/// )
/// .unwrap();
/// let model = ModelEnum::gbm(&params).unwrap();
/// let config = SimulationConfig::builder()
///     .n_simulations(100)
///     .n_steps(12)
///     .build()
///     .unwrap();
///
/// let paths = PathGenerator::new(config)
///     .generate(&params, &model, &[450.0, 95.0])
///     .unwrap();
///
/// assert_eq!(paths.num_simulations(), 100);
/// assert_eq!(paths.price(17, 0, 1), 95.0);
/// ```
#[derive(Clone, Debug)]
pub struct PathGenerator {
    config: SimulationConfig,
    parallel: ParallelConfig,
}

impl PathGenerator {
    /// Creates a generator with the default parallel settings.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            parallel: ParallelConfig::default(),
        }
    }

    /// Overrides the parallel settings.
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generates paths for every asset of `params`.
    ///
    /// `initial_prices` are in the asset order of `params`.
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptyDistribution`] / [`SimError::InvalidModelParameter`]
    ///   for an invalid configuration
    /// - [`SimError::AssetMismatch`] if the model or the initial prices do not
    ///   cover exactly the calibrated assets
    /// - [`SimError::InvalidModelParameter`] for a non-positive initial price
    /// - [`SimError::Correlation`] if the correlation matrix cannot be factored
    /// - [`SimError::NonPositivePrice`] under [`PricePolicy::Reject`]
    pub fn generate(
        &self,
        params: &CalibratedParams,
        model: &ModelEnum,
        initial_prices: &[f64],
    ) -> SimResult<SimulatedPaths> {
        self.config.validate()?;

        let num_assets = params.num_assets();
        if model.num_assets() != num_assets {
            return Err(SimError::AssetMismatch(format!(
                "model covers {} assets, calibration covers {}",
                model.num_assets(),
                num_assets
            )));
        }
        if initial_prices.len() != num_assets {
            return Err(SimError::AssetMismatch(format!(
                "{} initial prices for {} assets",
                initial_prices.len(),
                num_assets
            )));
        }
        if let Some((asset, price)) = initial_prices
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p <= 0.0)
        {
            return Err(SimError::invalid_parameter(
                "initial_price",
                format!("{} price {} must be positive", params.tickers()[asset], price),
            ));
        }

        let cholesky = params.correlation().cholesky()?;

        let n_simulations = self.config.n_simulations();
        let n_steps = self.config.n_steps();
        let storage = self.config.storage();
        let block = storage.stored_steps(n_steps) * num_assets;
        let parallel = self.parallel.should_parallelize(n_simulations);

        info!(
            model = model.model_name(),
            n_simulations,
            n_steps,
            assets = num_assets,
            parallel,
            "Generating simulated paths"
        );
        debug!(
            seed = self.config.seed(),
            horizon_years = self.config.horizon_years(),
            storage = ?storage,
            policy = ?self.config.price_policy(),
            "Path generation parameters"
        );

        let driver = Driver {
            config: &self.config,
            model,
            cholesky: &cholesky,
            initial_prices,
        };

        let mut data = vec![0.0; n_simulations * block];
        let outcomes: Vec<SimResult<usize>> = if parallel {
            data.par_chunks_mut(block)
                .with_min_len(self.parallel.batch_size)
                .enumerate()
                .map(|(i, out)| driver.simulate(i, out))
                .collect()
        } else {
            data.chunks_mut(block)
                .enumerate()
                .map(|(i, out)| driver.simulate(i, out))
                .collect()
        };

        // Lowest failing simulation wins, whatever the scheduling
        let mut clamped_count = 0;
        for outcome in outcomes {
            clamped_count += outcome?;
        }
        if clamped_count > 0 {
            warn!(clamped_count, "Price policy adjusted simulated prices");
        }

        Ok(SimulatedPaths::new(
            params.tickers().to_vec(),
            data,
            n_simulations,
            n_steps,
            self.config.horizon_years(),
            storage,
            clamped_count,
        ))
    }
}

/// Read-only state shared by every simulation of one run.
struct Driver<'a> {
    config: &'a SimulationConfig,
    model: &'a ModelEnum,
    cholesky: &'a CholeskyFactor<f64>,
    initial_prices: &'a [f64],
}

impl Driver<'_> {
    /// Runs simulation `index` into its output block; returns the number of
    /// clamped prices.
    fn simulate(&self, index: usize, out: &mut [f64]) -> SimResult<usize> {
        let num_assets = self.initial_prices.len();
        let dt = self.config.dt();
        let policy: PricePolicy = self.config.price_policy();
        let full = self.config.storage() == PathStorage::Full;
        let uses_shocks = self.model.uses_shocks();

        let mut rng = SimRng::for_simulation(self.config.seed(), index as u64);
        let mut prices = self.initial_prices.to_vec();
        let mut shocks = vec![0.0; num_assets];
        let mut clamped = 0;

        out[..num_assets].copy_from_slice(self.initial_prices);

        for step in 1..=self.config.n_steps() {
            if uses_shocks {
                rng.fill_normal(&mut shocks);
                self.cholesky.transform_inplace(&mut shocks);
            }
            self.model.advance(&mut prices, &shocks, dt, &mut rng);
            clamped += policy.apply(&mut prices, index, step)?;

            if full {
                out[step * num_assets..(step + 1) * num_assets].copy_from_slice(&prices);
            }
        }

        if !full {
            out[num_assets..2 * num_assets].copy_from_slice(&prices);
        }
        Ok(clamped)
    }
}
