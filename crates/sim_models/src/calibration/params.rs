//! Calibrated model parameters.

use sim_core::math::CorrelationMatrix;
use sim_core::{SimError, SimResult};

/// Default number of return periods per year (trading days).
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// Annualised per-asset drift and volatility with their dependence structure.
///
/// Asset order is the order of [`CalibratedParams::tickers`] and is shared by
/// every vector and matrix held here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibratedParams {
    tickers: Vec<String>,
    drift: Vec<f64>,
    volatility: Vec<f64>,
    correlation: CorrelationMatrix<f64>,
    covariance: Vec<f64>,
    periods_per_year: f64,
    observations: usize,
}

impl CalibratedParams {
    /// Builds parameters from explicit drift, volatility and correlation.
    ///
    /// The covariance is derived as `sigma_i * sigma_j * rho_ij`.
    ///
    /// # Errors
    ///
    /// - [`SimError::AssetMismatch`] when vector lengths or the correlation
    ///   dimension disagree with the number of tickers
    /// - [`SimError::InvalidModelParameter`] for non-finite drift or negative
    ///   or non-finite volatility
    pub fn new(
        tickers: Vec<String>,
        drift: Vec<f64>,
        volatility: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
    ) -> SimResult<Self> {
        let n = tickers.len();
        let mut covariance = vec![0.0; n * n];
        if volatility.len() == n && correlation.dim() == n {
            for i in 0..n {
                for j in 0..n {
                    covariance[i * n + j] = volatility[i] * volatility[j] * correlation.get(i, j);
                }
            }
        }
        Self::from_parts(
            tickers,
            drift,
            volatility,
            correlation,
            covariance,
            DEFAULT_PERIODS_PER_YEAR,
            0,
        )
    }

    pub(crate) fn from_parts(
        tickers: Vec<String>,
        drift: Vec<f64>,
        volatility: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
        covariance: Vec<f64>,
        periods_per_year: f64,
        observations: usize,
    ) -> SimResult<Self> {
        let n = tickers.len();
        if n == 0 {
            return Err(SimError::AssetMismatch("no assets supplied".to_string()));
        }
        if drift.len() != n || volatility.len() != n {
            return Err(SimError::AssetMismatch(format!(
                "{} tickers but {} drifts and {} volatilities",
                n,
                drift.len(),
                volatility.len()
            )));
        }
        if correlation.dim() != n || covariance.len() != n * n {
            return Err(SimError::AssetMismatch(format!(
                "{} tickers but correlation of dimension {}",
                n,
                correlation.dim()
            )));
        }
        for (ticker, (mu, sigma)) in tickers.iter().zip(drift.iter().zip(&volatility)) {
            if !mu.is_finite() {
                return Err(SimError::invalid_parameter(
                    "drift",
                    format!("{} drift {} is not finite", ticker, mu),
                ));
            }
            if !sigma.is_finite() || *sigma < 0.0 {
                return Err(SimError::invalid_parameter(
                    "volatility",
                    format!("{} volatility {} must be finite and non-negative", ticker, sigma),
                ));
            }
        }

        Ok(Self {
            tickers,
            drift,
            volatility,
            correlation,
            covariance,
            periods_per_year,
            observations,
        })
    }

    /// Asset tickers in model order.
    #[inline]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of assets.
    #[inline]
    pub fn num_assets(&self) -> usize {
        self.tickers.len()
    }

    /// Position of `ticker` in model order.
    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Annualised drift per asset.
    #[inline]
    pub fn drift(&self) -> &[f64] {
        &self.drift
    }

    /// Annualised volatility per asset.
    #[inline]
    pub fn volatility(&self) -> &[f64] {
        &self.volatility
    }

    /// Correlation of periodic log returns.
    #[inline]
    pub fn correlation(&self) -> &CorrelationMatrix<f64> {
        &self.correlation
    }

    /// Annualised covariance, row-major.
    #[inline]
    pub fn covariance(&self) -> &[f64] {
        &self.covariance
    }

    /// Return periods per year used for annualisation.
    #[inline]
    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Number of log returns per asset used for calibration (0 when built
    /// from explicit values).
    #[inline]
    pub fn observations(&self) -> usize {
        self.observations
    }
}

/// Merton jump parameters shared by every asset.
///
/// Log jump sizes are `N(mean_log_jump, std_log_jump^2)`, arriving as a
/// Poisson process with `intensity` jumps per year.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpParams {
    /// Jump arrival rate per year
    pub intensity: f64,
    /// Mean of the log jump size
    pub mean_log_jump: f64,
    /// Standard deviation of the log jump size
    pub std_log_jump: f64,
}

impl JumpParams {
    /// Creates validated jump parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidModelParameter`] for a negative intensity or
    /// standard deviation, or any non-finite value.
    pub fn new(intensity: f64, mean_log_jump: f64, std_log_jump: f64) -> SimResult<Self> {
        let params = Self {
            intensity,
            mean_log_jump,
            std_log_jump,
        };
        params.validate()?;
        Ok(params)
    }

    /// Re-checks the invariants of a value built field by field.
    pub fn validate(&self) -> SimResult<()> {
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(SimError::invalid_parameter(
                "intensity",
                format!("{} must be finite and non-negative", self.intensity),
            ));
        }
        if !self.mean_log_jump.is_finite() {
            return Err(SimError::invalid_parameter(
                "mean_log_jump",
                format!("{} is not finite", self.mean_log_jump),
            ));
        }
        if !self.std_log_jump.is_finite() || self.std_log_jump < 0.0 {
            return Err(SimError::invalid_parameter(
                "std_log_jump",
                format!("{} must be finite and non-negative", self.std_log_jump),
            ));
        }
        Ok(())
    }

    /// Expected relative jump size `E[e^Y] - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_models::calibration::JumpParams;
    ///
    /// let jumps = JumpParams::new(1.0, 0.0, 0.0).unwrap();
    /// assert_eq!(jumps.kappa(), 0.0);
    /// ```
    #[inline]
    pub fn kappa(&self) -> f64 {
        (self.mean_log_jump + 0.5 * self.std_log_jump * self.std_log_jump).exp() - 1.0
    }
}

impl Default for JumpParams {
    /// One jump per decade on average, mean log size -5%, std 10%.
    fn default() -> Self {
        Self {
            intensity: 0.1,
            mean_log_jump: -0.05,
            std_log_jump: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_asset_corr(rho: f64) -> CorrelationMatrix<f64> {
        CorrelationMatrix::new(&[1.0, rho, rho, 1.0], 2).unwrap()
    }

    fn tickers() -> Vec<String> {
        vec!["SPY".to_string(), "TLT".to_string()]
    }

    #[test]
    fn test_params_new_derives_covariance() {
        let params =
            CalibratedParams::new(tickers(), vec![0.08, 0.05], vec![0.2, 0.15], two_asset_corr(0.3))
                .unwrap();
        assert_eq!(params.num_assets(), 2);
        assert_eq!(params.index_of("TLT"), Some(1));
        assert_eq!(params.index_of("QQQ"), None);
        assert_relative_eq!(params.covariance()[0], 0.04, epsilon = 1e-15);
        assert_relative_eq!(params.covariance()[1], 0.2 * 0.15 * 0.3, epsilon = 1e-15);
        assert_eq!(params.covariance()[1], params.covariance()[2]);
        assert_eq!(params.periods_per_year(), DEFAULT_PERIODS_PER_YEAR);
        assert_eq!(params.observations(), 0);
    }

    #[test]
    fn test_params_rejects_negative_volatility() {
        let result =
            CalibratedParams::new(tickers(), vec![0.08, 0.05], vec![0.2, -0.1], two_asset_corr(0.0));
        assert!(matches!(
            result,
            Err(SimError::InvalidModelParameter { ref name, .. }) if name == "volatility"
        ));
    }

    #[test]
    fn test_params_rejects_nan_drift() {
        let result =
            CalibratedParams::new(tickers(), vec![f64::NAN, 0.05], vec![0.2, 0.1], two_asset_corr(0.0));
        assert!(matches!(result, Err(SimError::InvalidModelParameter { .. })));
    }

    #[test]
    fn test_params_rejects_length_mismatch() {
        let result = CalibratedParams::new(tickers(), vec![0.08], vec![0.2, 0.1], two_asset_corr(0.0));
        assert!(matches!(result, Err(SimError::AssetMismatch(_))));

        let result = CalibratedParams::new(
            tickers(),
            vec![0.08, 0.05],
            vec![0.2, 0.1],
            CorrelationMatrix::identity(3),
        );
        assert!(matches!(result, Err(SimError::AssetMismatch(_))));
    }

    #[test]
    fn test_jump_params_default() {
        let jumps = JumpParams::default();
        assert_eq!(jumps.intensity, 0.1);
        assert_eq!(jumps.mean_log_jump, -0.05);
        assert_eq!(jumps.std_log_jump, 0.1);
        assert!(jumps.validate().is_ok());
    }

    #[test]
    fn test_jump_params_kappa() {
        let jumps = JumpParams::default();
        assert_relative_eq!(jumps.kappa(), (-0.05_f64 + 0.005).exp() - 1.0, epsilon = 1e-15);
        assert!(jumps.kappa() < 0.0);
    }

    #[test]
    fn test_jump_params_validation() {
        assert!(JumpParams::new(-0.1, 0.0, 0.1).is_err());
        assert!(JumpParams::new(0.1, 0.0, -0.1).is_err());
        assert!(JumpParams::new(0.1, f64::INFINITY, 0.1).is_err());
        assert!(JumpParams::new(0.0, 0.0, 0.0).is_ok());
    }
}
