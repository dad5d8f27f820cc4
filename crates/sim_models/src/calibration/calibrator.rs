//! Return calibration from historical prices.
//!
//! ## Algorithm
//!
//! For each asset the trailing `window` prices give `window - 1` log returns
//! `r_t = ln(P_t / P_{t-1})`. With `ppy` periods per year:
//!
//! ```text
//! drift      = mean(r) * ppy
//! volatility = std(r) * sqrt(ppy)          (sample std, n - 1)
//! rho_ij     = pearson(r_i, r_j)           (0 if either variance is 0)
//! cov_ij     = cov(r_i, r_j) * ppy
//! ```
//!
//! Trailing windows must cover identical dates across all assets.

use chrono::NaiveDate;
use sim_core::market_data::MarketDataProvider;
use sim_core::math::stats::{log_returns, mean, pearson, sample_covariance, sample_std};
use sim_core::math::CorrelationMatrix;
use sim_core::types::{AssetSeries, PricePoint};
use sim_core::{SimError, SimResult};
use tracing::{debug, info};

use super::params::{CalibratedParams, DEFAULT_PERIODS_PER_YEAR};

/// Minimum window: three prices give the two returns a sample variance needs.
pub const MIN_WINDOW: usize = 3;

/// Estimates [`CalibratedParams`] from the trailing window of each series.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sim_core::types::AssetSeries;
/// use sim_models::calibration::ReturnCalibrator;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let spy = AssetSeries::new(
///     "SPY",
///     vec![(d(2), 100.0), (d(3), 101.0), (d(4), 100.0), (d(5), 102.0)],
/// )
/// .unwrap();
///
/// let params = ReturnCalibrator::new(4).calibrate(&[spy]).unwrap();
/// assert_eq!(params.tickers(), ["SPY"]);
/// assert_eq!(params.observations(), 3);
/// assert!(params.volatility()[0] > 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnCalibrator {
    window: usize,
    periods_per_year: f64,
}

impl ReturnCalibrator {
    /// Calibrator over the last `window` prices of each series.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }

    /// Sets the annualisation factor (default 252).
    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Calibration window in prices.
    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Annualisation factor.
    #[inline]
    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Calibrates drift, volatility, correlation and covariance.
    ///
    /// # Errors
    ///
    /// - [`SimError::InsufficientData`] if `window < MIN_WINDOW` or a series is shorter
    ///   than the window
    /// - [`SimError::SeriesMisaligned`] if trailing windows cover different dates
    /// - [`SimError::InvalidModelParameter`] for a non-positive annualisation factor
    pub fn calibrate(&self, series: &[AssetSeries]) -> SimResult<CalibratedParams> {
        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            return Err(SimError::invalid_parameter(
                "periods_per_year",
                format!("{} must be positive", self.periods_per_year),
            ));
        }

        let windows = aligned_windows(series, self.window)?;
        let returns: Vec<Vec<f64>> = windows
            .iter()
            .map(|w| log_returns(&w.iter().map(|p| p.price).collect::<Vec<_>>()))
            .collect();

        let n = series.len();
        let ppy = self.periods_per_year;
        let drift: Vec<f64> = returns.iter().map(|r| mean(r) * ppy).collect();
        let volatility: Vec<f64> = returns.iter().map(|r| sample_std(r) * ppy.sqrt()).collect();

        let mut corr = vec![0.0; n * n];
        let mut covariance = vec![0.0; n * n];
        for i in 0..n {
            corr[i * n + i] = 1.0;
            covariance[i * n + i] = sample_covariance(&returns[i], &returns[i]) * ppy;
            for j in (i + 1)..n {
                let rho = pearson(&returns[i], &returns[j]).unwrap_or(0.0);
                corr[i * n + j] = rho;
                corr[j * n + i] = rho;
                let cov = sample_covariance(&returns[i], &returns[j]) * ppy;
                covariance[i * n + j] = cov;
                covariance[j * n + i] = cov;
            }
        }
        let correlation = CorrelationMatrix::new(&corr, n)?;

        let tickers: Vec<String> = series.iter().map(|s| s.ticker().to_string()).collect();
        let observations = self.window - 1;
        info!(
            assets = n,
            window = self.window,
            observations,
            "Calibrated return parameters"
        );
        for (ticker, (mu, sigma)) in tickers.iter().zip(drift.iter().zip(&volatility)) {
            debug!(ticker = %ticker, drift = mu, volatility = sigma, "Calibrated asset");
        }

        CalibratedParams::from_parts(
            tickers,
            drift,
            volatility,
            correlation,
            covariance,
            ppy,
            observations,
        )
    }

    /// Fetches each ticker from `provider` over `[start, end]` and calibrates.
    ///
    /// # Errors
    ///
    /// Any provider failure is reported as [`SimError::InsufficientData`] for
    /// the ticker concerned; otherwise as [`ReturnCalibrator::calibrate`].
    pub fn calibrate_from_provider<P, S>(
        &self,
        provider: &P,
        tickers: &[S],
        start: NaiveDate,
        end: NaiveDate,
    ) -> SimResult<CalibratedParams>
    where
        P: MarketDataProvider + ?Sized,
        S: AsRef<str>,
    {
        let series = self.fetch_series(provider, tickers, start, end)?;
        self.calibrate(&series)
    }

    /// Fetches each ticker from `provider` over `[start, end]`.
    ///
    /// Callers that need the histories themselves (initial prices, bootstrap
    /// resampling) fetch once here and pass the result to
    /// [`ReturnCalibrator::calibrate`].
    ///
    /// # Errors
    ///
    /// Any provider failure is reported as [`SimError::InsufficientData`].
    pub fn fetch_series<P, S>(
        &self,
        provider: &P,
        tickers: &[S],
        start: NaiveDate,
        end: NaiveDate,
    ) -> SimResult<Vec<AssetSeries>>
    where
        P: MarketDataProvider + ?Sized,
        S: AsRef<str>,
    {
        fetch_all(provider, tickers, start, end, self.window)
    }
}

/// Fetches every ticker, mapping provider failures to `InsufficientData`.
fn fetch_all<P, S>(
    provider: &P,
    tickers: &[S],
    start: NaiveDate,
    end: NaiveDate,
    required: usize,
) -> SimResult<Vec<AssetSeries>>
where
    P: MarketDataProvider + ?Sized,
    S: AsRef<str>,
{
    tickers
        .iter()
        .map(|ticker| {
            let ticker = ticker.as_ref();
            provider.fetch(ticker, start, end).map_err(|e| {
                debug!(ticker, error = %e, "Provider failed");
                SimError::InsufficientData {
                    ticker: ticker.to_string(),
                    required,
                    available: 0,
                }
            })
        })
        .collect()
}

/// Trailing `window` observations of each series, checked for a common date grid.
pub(crate) fn aligned_windows(series: &[AssetSeries], window: usize) -> SimResult<Vec<&[PricePoint]>> {
    let first = series
        .first()
        .ok_or_else(|| SimError::AssetMismatch("no series supplied".to_string()))?;

    if window < MIN_WINDOW {
        return Err(SimError::InsufficientData {
            ticker: first.ticker().to_string(),
            required: MIN_WINDOW,
            available: window,
        });
    }

    for (idx, s) in series.iter().enumerate() {
        if series[..idx].iter().any(|other| other.ticker() == s.ticker()) {
            return Err(SimError::AssetMismatch(format!(
                "duplicate ticker {}",
                s.ticker()
            )));
        }
        if s.len() < window {
            return Err(SimError::InsufficientData {
                ticker: s.ticker().to_string(),
                required: window,
                available: s.len(),
            });
        }
    }

    let windows: Vec<&[PricePoint]> = series.iter().map(|s| s.trailing(window)).collect();
    let reference = windows[0];
    for (s, w) in series.iter().zip(&windows).skip(1) {
        let aligned = w.iter().zip(reference).all(|(a, b)| a.date == b.date);
        if !aligned {
            return Err(SimError::SeriesMisaligned {
                ticker: s.ticker().to_string(),
                reference: first.ticker().to_string(),
            });
        }
    }
    Ok(windows)
}
