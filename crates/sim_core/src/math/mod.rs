//! Numerical building blocks.
//!
//! - [`stats`]: returns, moments, Pearson correlation, empirical quantiles
//! - [`correlation`]: validated correlation matrices and Cholesky factors

pub mod correlation;
pub mod stats;

pub use correlation::{CholeskyFactor, CorrelationError, CorrelationMatrix};
