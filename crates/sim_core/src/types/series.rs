//! Historical price series.
//!
//! An [`AssetSeries`] is the immutable input to calibration and stress replay:
//! an ordered sequence of `(date, price)` observations for one ticker.
//!
//! ## Invariants
//!
//! Enforced once at construction:
//! - at least one observation
//! - strictly increasing dates
//! - finite, strictly positive prices

use chrono::NaiveDate;

use crate::error::{SimError, SimResult};

/// A single dated price observation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricePoint {
    /// Observation date
    pub date: NaiveDate,
    /// Closing price (strictly positive)
    pub price: f64,
}

/// Validated price history for one ticker.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sim_core::types::AssetSeries;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// let series = AssetSeries::new("QQQ", vec![(d(4), 430.0), (d(5), 425.5)]).unwrap();
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.last_price(), 425.5);
///
/// // Dates must be strictly increasing
/// assert!(AssetSeries::new("QQQ", vec![(d(5), 1.0), (d(4), 1.0)]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl AssetSeries {
    /// Creates a series from `(date, price)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSeries`] if the series is empty, dates are
    /// not strictly increasing, or any price is non-finite or non-positive.
    pub fn new(
        ticker: impl Into<String>,
        observations: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> SimResult<Self> {
        let ticker = ticker.into();
        let points: Vec<PricePoint> = observations
            .into_iter()
            .map(|(date, price)| PricePoint { date, price })
            .collect();

        if points.is_empty() {
            return Err(SimError::InvalidSeries {
                ticker,
                reason: "series has no observations".to_string(),
            });
        }

        for (idx, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(SimError::InvalidSeries {
                    ticker,
                    reason: format!("price {} on {} is not positive", point.price, point.date),
                });
            }
            if idx > 0 && point.date <= points[idx - 1].date {
                return Err(SimError::InvalidSeries {
                    ticker,
                    reason: format!(
                        "dates not strictly increasing at {} (previous {})",
                        point.date,
                        points[idx - 1].date
                    ),
                });
            }
        }

        Ok(Self { ticker, points })
    }

    /// Ticker symbol.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: construction rejects empty series.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations in date order.
    #[inline]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Observation dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Prices in date order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// First observation date.
    #[inline]
    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    /// Last observation date.
    #[inline]
    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// Most recent price, used as the simulation starting price.
    #[inline]
    pub fn last_price(&self) -> f64 {
        self.points[self.points.len() - 1].price
    }

    /// The last `n` observations (or all of them if fewer are available).
    pub fn trailing(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Observations with `start <= date <= end`.
    ///
    /// Returns an empty slice when the window does not intersect the series.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        if lo >= hi {
            &self.points[0..0]
        } else {
            &self.points[lo..hi]
        }
    }
}
