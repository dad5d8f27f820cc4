//! Calibrate command implementation
//!
//! Estimates drift, volatility and correlation from the CSV history and
//! prints them as JSON.

use tracing::info;

use crate::config::RunConfig;
use crate::provider::CsvDataProvider;
use crate::report::CalibrationSummary;
use crate::Result;

/// Calibrate and return the summary.
pub fn execute(config: &RunConfig) -> Result<CalibrationSummary> {
    let provider = CsvDataProvider::new(&config.data_dir);
    let (start, end) = config.calibration_range();
    let params = config
        .calibrator()
        .calibrate_from_provider(&provider, &config.tickers, start, end)?;
    Ok(CalibrationSummary::from(&params))
}

/// Run the calibrate command
pub fn run(config: &RunConfig, pretty: bool) -> Result<()> {
    info!(
        tickers = ?config.tickers,
        window = config.calibration_window,
        "Starting calibration"
    );
    let summary = execute(config)?;
    let json = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", json);
    info!("Calibration complete");
    Ok(())
}
