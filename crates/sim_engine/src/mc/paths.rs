//! Simulated price paths.
//!
//! # Memory Layout
//!
//! A single row-major buffer of shape `(num_simulations, stored_steps,
//! num_assets)`:
//!
//! ```text
//! index(i, t, a) = (i * stored_steps + t) * num_assets + a
//! ```
//!
//! so the block of one simulation is contiguous and can be written by one
//! worker without synchronisation.

use super::config::PathStorage;

/// Output of the path generator.
///
/// Stored time index `0` always holds the initial prices bit-exactly. With
/// [`PathStorage::TerminalOnly`] index `1` holds the terminal prices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatedPaths {
    tickers: Vec<String>,
    data: Vec<f64>,
    num_simulations: usize,
    stored_steps: usize,
    num_assets: usize,
    num_steps: usize,
    horizon_years: f64,
    storage: PathStorage,
    clamped_count: usize,
}

impl SimulatedPaths {
    pub(crate) fn new(
        tickers: Vec<String>,
        data: Vec<f64>,
        num_simulations: usize,
        num_steps: usize,
        horizon_years: f64,
        storage: PathStorage,
        clamped_count: usize,
    ) -> Self {
        let num_assets = tickers.len();
        let stored_steps = storage.stored_steps(num_steps);
        debug_assert_eq!(data.len(), num_simulations * stored_steps * num_assets);
        Self {
            tickers,
            data,
            num_simulations,
            stored_steps,
            num_assets,
            num_steps,
            horizon_years,
            storage,
            clamped_count,
        }
    }

    /// Asset tickers in storage order.
    #[inline]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of simulations.
    #[inline]
    pub fn num_simulations(&self) -> usize {
        self.num_simulations
    }

    /// Number of stored time points per simulation.
    #[inline]
    pub fn stored_steps(&self) -> usize {
        self.stored_steps
    }

    /// Number of assets.
    #[inline]
    pub fn num_assets(&self) -> usize {
        self.num_assets
    }

    /// Number of simulated time steps (independent of storage).
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Simulation horizon in years.
    #[inline]
    pub fn horizon_years(&self) -> f64 {
        self.horizon_years
    }

    /// Storage mode used for this run.
    #[inline]
    pub fn storage(&self) -> PathStorage {
        self.storage
    }

    /// Number of prices adjusted by the clamp policy.
    #[inline]
    pub fn clamped_count(&self) -> usize {
        self.clamped_count
    }

    /// Price of `asset` in `simulation` at stored time index `step`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[inline]
    pub fn price(&self, simulation: usize, step: usize, asset: usize) -> f64 {
        assert!(step < self.stored_steps && asset < self.num_assets);
        self.data[(simulation * self.stored_steps + step) * self.num_assets + asset]
    }

    /// Prices of all assets of `simulation` at stored time index `step`.
    #[inline]
    pub fn prices_at(&self, simulation: usize, step: usize) -> &[f64] {
        let start = (simulation * self.stored_steps + step) * self.num_assets;
        &self.data[start..start + self.num_assets]
    }

    /// Contiguous block of one simulation, `stored_steps * num_assets` values.
    #[inline]
    pub fn simulation(&self, simulation: usize) -> &[f64] {
        let block = self.stored_steps * self.num_assets;
        &self.data[simulation * block..(simulation + 1) * block]
    }

    /// Initial price of `asset`.
    #[inline]
    pub fn initial_price(&self, asset: usize) -> f64 {
        self.price(0, 0, asset)
    }

    /// Terminal price of `asset` in `simulation`.
    #[inline]
    pub fn terminal_price(&self, simulation: usize, asset: usize) -> f64 {
        self.price(simulation, self.stored_steps - 1, asset)
    }

    /// Terminal prices of `asset` across all simulations.
    pub fn terminal_prices(&self, asset: usize) -> Vec<f64> {
        (0..self.num_simulations)
            .map(|i| self.terminal_price(i, asset))
            .collect()
    }

    /// Time in years of each stored index.
    pub fn stored_times(&self) -> Vec<f64> {
        match self.storage {
            PathStorage::Full => {
                let dt = self.horizon_years / self.num_steps as f64;
                (0..self.stored_steps).map(|t| t as f64 * dt).collect()
            }
            PathStorage::TerminalOnly => vec![0.0, self.horizon_years],
        }
    }

    /// Raw row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
