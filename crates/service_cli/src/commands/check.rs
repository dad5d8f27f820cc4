//! Check command implementation
//!
//! Validates the configuration and the price files it refers to without
//! running a simulation.

use std::collections::BTreeSet;

use sim_core::market_data::MarketDataProvider;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::provider::CsvDataProvider;
use crate::{CliError, Result};

/// Outcome of checking one ticker file.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerCheck {
    /// Ticker checked
    pub ticker: String,
    /// Observations inside the calibration range
    pub observations: usize,
    /// Whether the calibration window is covered
    pub sufficient: bool,
}

/// Checks every portfolio ticker and the benchmark.
///
/// Missing or unreadable files are errors; short histories are reported
/// through [`TickerCheck::sufficient`].
pub fn execute(config: &RunConfig) -> Result<Vec<TickerCheck>> {
    config.validate()?;
    config.portfolio_weights()?;

    let provider = CsvDataProvider::new(&config.data_dir);
    if !provider.dir().is_dir() {
        return Err(CliError::FileNotFound(provider.dir().to_path_buf()));
    }

    let (start, end) = config.calibration_range();
    let required = config.calibration_window;

    let tickers: BTreeSet<&str> = config
        .tickers
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(config.benchmark.as_str()))
        .collect();

    let mut checks = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let series = provider.fetch(ticker, start, end)?;
        let check = TickerCheck {
            ticker: ticker.to_string(),
            observations: series.len(),
            sufficient: series.len() >= required,
        };
        if check.sufficient {
            info!(ticker, observations = check.observations, "Price history OK");
        } else {
            warn!(
                ticker,
                observations = check.observations,
                required,
                "Price history shorter than calibration window"
            );
        }
        checks.push(check);
    }
    Ok(checks)
}

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Checking configuration");
    let checks = execute(config)?;
    let short: Vec<&str> = checks
        .iter()
        .filter(|c| !c.sufficient)
        .map(|c| c.ticker.as_str())
        .collect();
    if !short.is_empty() {
        return Err(CliError::Config(format!(
            "insufficient history for {}",
            short.join(", ")
        )));
    }
    println!("Configuration OK: {} price files checked", checks.len());
    Ok(())
}
