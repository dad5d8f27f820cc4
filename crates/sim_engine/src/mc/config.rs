//! Simulation configuration.
//!
//! Configuration types and the builder for path generation runs.

use sim_core::{SimError, SimResult};

use super::policy::PricePolicy;

/// Maximum number of simulations allowed.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// Maximum number of time steps allowed per simulation.
pub const MAX_STEPS: usize = 100_000;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Which time steps are kept in the output buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathStorage {
    /// Every step, `n_steps + 1` prices per asset.
    #[default]
    Full,
    /// Initial and terminal prices only.
    ///
    /// Drawdown computed on this storage sees a two-point trajectory.
    TerminalOnly,
}

impl PathStorage {
    /// Number of stored time points for a run of `n_steps` steps.
    #[inline]
    pub fn stored_steps(&self, n_steps: usize) -> usize {
        match self {
            PathStorage::Full => n_steps + 1,
            PathStorage::TerminalOnly => 2,
        }
    }
}

/// Path generation configuration.
///
/// Immutable once built. Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use sim_engine::mc::{PathStorage, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .n_simulations(10_000)
///     .n_steps(252)
///     .horizon_years(1.0)
///     .seed(42)
///     .storage(PathStorage::TerminalOnly)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_simulations(), 10_000);
/// assert!((config.dt() - 1.0 / 252.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    n_simulations: usize,
    n_steps: usize,
    horizon_years: f64,
    seed: u64,
    storage: PathStorage,
    price_policy: PricePolicy,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of simulations.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Number of time steps per simulation.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Simulation horizon in years.
    #[inline]
    pub fn horizon_years(&self) -> f64 {
        self.horizon_years
    }

    /// Step length in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.horizon_years / self.n_steps as f64
    }

    /// Base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Storage mode.
    #[inline]
    pub fn storage(&self) -> PathStorage {
        self.storage
    }

    /// Numeric policy for non-positive prices.
    #[inline]
    pub fn price_policy(&self) -> PricePolicy {
        self.price_policy
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptyDistribution`] if `n_simulations` is 0
    /// - [`SimError::InvalidModelParameter`] if `n_simulations` exceeds
    ///   [`MAX_SIMULATIONS`], `n_steps` is outside `[1, MAX_STEPS]`, the horizon
    ///   is not a positive finite number or the price floor is invalid
    pub fn validate(&self) -> SimResult<()> {
        if self.n_simulations == 0 {
            return Err(SimError::EmptyDistribution);
        }
        if self.n_simulations > MAX_SIMULATIONS {
            return Err(SimError::invalid_parameter(
                "n_simulations",
                format!("{} exceeds maximum {}", self.n_simulations, MAX_SIMULATIONS),
            ));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(SimError::invalid_parameter(
                "n_steps",
                format!("{} must be in range [1, {}]", self.n_steps, MAX_STEPS),
            ));
        }
        if !self.horizon_years.is_finite() || self.horizon_years <= 0.0 {
            return Err(SimError::invalid_parameter(
                "horizon_years",
                format!("{} must be positive", self.horizon_years),
            ));
        }
        self.price_policy.validate()
    }
}

/// Builder for [`SimulationConfig`].
///
/// `n_simulations` and `n_steps` are required; the horizon defaults to one
/// year, the seed to [`DEFAULT_SEED`], storage to [`PathStorage::Full`] and the
/// policy to clamping at [`DEFAULT_PRICE_FLOOR`](super::policy::DEFAULT_PRICE_FLOOR).
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    n_simulations: Option<usize>,
    n_steps: Option<usize>,
    horizon_years: f64,
    seed: u64,
    storage: PathStorage,
    price_policy: PricePolicy,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            n_simulations: None,
            n_steps: None,
            horizon_years: 1.0,
            seed: DEFAULT_SEED,
            storage: PathStorage::default(),
            price_policy: PricePolicy::default(),
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the number of simulations.
    #[inline]
    pub fn n_simulations(mut self, n_simulations: usize) -> Self {
        self.n_simulations = Some(n_simulations);
        self
    }

    /// Sets the number of time steps.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the horizon in years.
    #[inline]
    pub fn horizon_years(mut self, horizon_years: f64) -> Self {
        self.horizon_years = horizon_years;
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the storage mode.
    #[inline]
    pub fn storage(mut self, storage: PathStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Sets the numeric policy.
    #[inline]
    pub fn price_policy(mut self, price_policy: PricePolicy) -> Self {
        self.price_policy = price_policy;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidModelParameter`] when a required field is
    /// missing, otherwise as [`SimulationConfig::validate`].
    pub fn build(self) -> SimResult<SimulationConfig> {
        let n_simulations = self
            .n_simulations
            .ok_or_else(|| SimError::invalid_parameter("n_simulations", "must be specified"))?;
        let n_steps = self
            .n_steps
            .ok_or_else(|| SimError::invalid_parameter("n_steps", "must be specified"))?;

        let config = SimulationConfig {
            n_simulations,
            n_steps,
            horizon_years: self.horizon_years,
            seed: self.seed,
            storage: self.storage,
            price_policy: self.price_policy,
        };
        config.validate()?;
        Ok(config)
    }
}
