//! CSV-backed market data.
//!
//! Each ticker lives in `<dir>/<TICKER>.csv` with a header row and two
//! columns, `date` (`YYYY-MM-DD`) and `close`:
//!
//! ```text
//! date,close
//! 2024-01-02,472.65
//! 2024-01-03,468.79
//! ```
//!
//! Rows may appear in any order; they are sorted by date on load.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use sim_core::market_data::{MarketDataProvider, ProviderError};
use sim_core::types::AssetSeries;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CloseRecord {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close", alias = "adj_close", alias = "Adj Close")]
    close: f64,
}

/// Reads closing prices from a directory of CSV files.
#[derive(Clone, Debug)]
pub struct CsvDataProvider {
    dir: PathBuf,
}

impl CsvDataProvider {
    /// Creates a provider over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    /// Loads the full history of `ticker`.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnknownTicker`] if the file does not exist
    /// - [`ProviderError::Source`] if it cannot be parsed or violates the
    ///   series invariants (duplicate dates, non-positive prices)
    pub fn load(&self, ticker: &str) -> Result<AssetSeries, ProviderError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(ProviderError::UnknownTicker(ticker.to_string()));
        }
        let source = |reason: String| ProviderError::Source {
            ticker: ticker.to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| source(format!("failed to open {}: {}", path.display(), e)))?;

        let mut rows = Vec::new();
        for (idx, record) in reader.deserialize::<CloseRecord>().enumerate() {
            // Line 1 is the header
            let record = record.map_err(|e| source(format!("line {}: {}", idx + 2, e)))?;
            rows.push((record.date, record.close));
        }
        rows.sort_by_key(|(date, _)| *date);

        debug!(ticker, rows = rows.len(), path = %path.display(), "Loaded price history");
        AssetSeries::new(ticker, rows).map_err(|e| source(e.to_string()))
    }
}

impl MarketDataProvider for CsvDataProvider {
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssetSeries, ProviderError> {
        let full = self.load(ticker)?;
        let window = full.window(start, end);
        if window.is_empty() {
            return Err(ProviderError::NoData {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        AssetSeries::new(ticker, window.iter().map(|p| (p.date, p.price))).map_err(|e| {
            ProviderError::Source {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            }
        })
    }
}
