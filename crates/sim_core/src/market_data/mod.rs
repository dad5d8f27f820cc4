//! Market data provider seam.
//!
//! The simulator never downloads data itself. Historical prices arrive through
//! a [`MarketDataProvider`], implemented by the service layer (CSV files) or by
//! [`InMemoryProvider`] in tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::AssetSeries;

/// Failures reported by a data provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider has no data for the ticker at all.
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    /// Ticker is known but has no observations in the requested range.
    #[error("No observations for {ticker} between {start} and {end}")]
    NoData {
        /// Requested ticker
        ticker: String,
        /// Range start (inclusive)
        start: NaiveDate,
        /// Range end (inclusive)
        end: NaiveDate,
    },

    /// Underlying source could not be read.
    #[error("Failed to read {ticker}: {reason}")]
    Source {
        /// Requested ticker
        ticker: String,
        /// Source-specific description
        reason: String,
    },
}

impl ProviderError {
    /// Ticker the error refers to.
    pub fn ticker(&self) -> &str {
        match self {
            ProviderError::UnknownTicker(ticker) => ticker,
            ProviderError::NoData { ticker, .. } | ProviderError::Source { ticker, .. } => ticker,
        }
    }
}

/// Source of historical closing prices.
pub trait MarketDataProvider {
    /// Fetches observations of `ticker` with `start <= date <= end`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the ticker is unknown, the range holds
    /// no data, or the underlying source fails.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssetSeries, ProviderError>;
}

/// Provider backed by series held in memory.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sim_core::market_data::{InMemoryProvider, MarketDataProvider};
/// use sim_core::types::AssetSeries;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let spy = AssetSeries::new("SPY", vec![(d(2), 470.0), (d(3), 468.8), (d(4), 467.3)]).unwrap();
///
/// let provider = InMemoryProvider::new().with_series(spy);
/// let window = provider.fetch("SPY", d(3), d(31)).unwrap();
/// assert_eq!(window.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, AssetSeries>,
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the series for its ticker.
    pub fn with_series(mut self, series: AssetSeries) -> Self {
        self.insert(series);
        self
    }

    /// Adds (or replaces) the series for its ticker.
    pub fn insert(&mut self, series: AssetSeries) {
        self.series.insert(series.ticker().to_string(), series);
    }

    /// Number of tickers held.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` when no series are held.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AssetSeries, ProviderError> {
        let series = self
            .series
            .get(ticker)
            .ok_or_else(|| ProviderError::UnknownTicker(ticker.to_string()))?;

        let window = series.window(start, end);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn provider() -> InMemoryProvider {
        let spy = AssetSeries::new("SPY", vec![(d(2), 100.0), (d(3), 101.0), (d(4), 99.5)])
            .unwrap();
        InMemoryProvider::new().with_series(spy)
    }

    #[test]
    fn test_fetch_window() {
        let series = provider().fetch("SPY", d(1), d(3)).unwrap();
        assert_eq!(series.ticker(), "SPY");
        assert_eq!(series.prices(), vec![100.0, 101.0]);
    }

    #[test]
    fn test_fetch_unknown_ticker() {
        let err = provider().fetch("QQQ", d(1), d(31)).unwrap_err();
        assert_eq!(err, ProviderError::UnknownTicker("QQQ".to_string()));
        assert_eq!(err.ticker(), "QQQ");
    }

    #[test]
    fn test_fetch_empty_range() {
        let err = provider().fetch("SPY", d(10), d(20)).unwrap_err();
        assert!(matches!(err, ProviderError::NoData { .. }));
    }

    #[test]
    fn test_insert_replaces() {
        let mut p = provider();
        assert_eq!(p.len(), 1);
        p.insert(AssetSeries::new("SPY", vec![(d(5), 1.0)]).unwrap());
        assert_eq!(p.len(), 1);
        assert_eq!(p.fetch("SPY", d(1), d(31)).unwrap().len(), 1);
        assert!(!p.is_empty());
    }
}
