//! Calibration of model parameters from historical prices.
//!
//! - [`ReturnCalibrator`]: trailing-window estimation of drift, volatility,
//!   correlation and covariance
//! - [`CalibratedParams`]: the calibrated parameter set
//! - [`JumpParams`]: Merton jump parameters (supplied, not calibrated)

mod calibrator;
mod params;

pub use calibrator::{ReturnCalibrator, MIN_WINDOW};
pub use params::{CalibratedParams, JumpParams, DEFAULT_PERIODS_PER_YEAR};

pub(crate) use calibrator::aligned_windows;
