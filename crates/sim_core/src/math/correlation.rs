//! Correlation matrices and their Cholesky factors.
//!
//! Correlated Gaussian shocks are produced from independent ones as
//!
//! ```text
//! W = L * Z,    C = L * L^T
//! ```
//!
//! where `C` is the correlation matrix and `L` its lower-triangular factor.
//!
//! ## Semi-definite matrices
//!
//! Historical correlation estimates are frequently singular (duplicated
//! tickers, perfectly collinear series, constant prices). The decomposition
//! here accepts positive *semi*-definite input: a pivot within
//! [`PIVOT_TOLERANCE`] of zero yields a zero column, and the remaining
//! entries of that column must also vanish. Genuinely indefinite matrices
//! are rejected with [`CorrelationError::NotPositiveSemiDefinite`].
//!
//! ## Usage
//!
//! ```
//! use sim_core::math::correlation::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5, 1.0], 2).unwrap();
//! let chol = corr.cholesky().unwrap();
//!
//! let mut z = [0.5_f64, 0.8];
//! chol.transform_inplace(&mut z);
//! assert_eq!(z[0], 0.5);
//! ```

use num_traits::Float;
use thiserror::Error;

/// Tolerance for diagonal, symmetry and pivot checks.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Errors raised when validating or factoring a correlation matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    /// Matrix has a negative pivot.
    #[error("Correlation matrix is not positive semi-definite (pivot {pivot} at row {index})")]
    NotPositiveSemiDefinite {
        /// Row at which the decomposition failed
        index: usize,
        /// Offending pivot value
        pivot: f64,
    },

    /// Flat buffer length does not match `dim * dim`.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// `dim * dim`
        expected: usize,
        /// Supplied length
        got: usize,
    },

    /// Diagonal element differs from one.
    #[error("Diagonal element at index {index} is {value}, expected 1")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Value found
        value: f64,
    },

    /// `C[i][j] != C[j][i]`.
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row
        i: usize,
        /// Column
        j: usize,
    },

    /// Off-diagonal entry outside [-1, 1] or not finite.
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row
        i: usize,
        /// Column
        j: usize,
        /// Value found
        value: f64,
    },
}

/// Validated symmetric correlation matrix, stored row-major.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationMatrix<T: Float> {
    data: Vec<T>,
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Builds a matrix from `dim * dim` row-major entries.
    ///
    /// # Errors
    ///
    /// - [`CorrelationError::InvalidDimensions`] on a length mismatch
    /// - [`CorrelationError::InvalidDiagonal`] if any `C[i][i] != 1`
    /// - [`CorrelationError::NotSymmetric`] if `C` is not symmetric
    /// - [`CorrelationError::OutOfRange`] for entries outside [-1, 1]
    pub fn new(data: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let tol = tolerance::<T>();
        let at = |i: usize, j: usize| data[i * dim + j];

        for i in 0..dim {
            let diag = at(i, i);
            if !diag.is_finite() || (diag - T::one()).abs() > tol {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: to_f64(diag),
                });
            }
            for j in (i + 1)..dim {
                let upper = at(i, j);
                if !upper.is_finite() || upper.abs() > T::one() + tol {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: to_f64(upper),
                    });
                }
                if (upper - at(j, i)).abs() > tol {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Identity matrix (uncorrelated assets).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Row-major entries.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copies the matrix into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.dim.max(1)).map(<[T]>::to_vec).collect()
    }

    /// Lower-triangular factor `L` with `C = L * L^T`.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::NotPositiveSemiDefinite`] when a pivot is
    /// negative beyond tolerance, or when a zero pivot leaves a non-zero
    /// residual below it.
    pub fn cholesky(&self) -> Result<CholeskyFactor<T>, CorrelationError> {
        let n = self.dim;
        let tol = tolerance::<T>();
        let mut lower = vec![T::zero(); n * n];

        for j in 0..n {
            let mut pivot = self.get(j, j);
            for k in 0..j {
                pivot = pivot - lower[j * n + k] * lower[j * n + k];
            }
            if pivot < -tol {
                return Err(CorrelationError::NotPositiveSemiDefinite {
                    index: j,
                    pivot: to_f64(pivot),
                });
            }

            let l_jj = if pivot > tol { pivot.sqrt() } else { T::zero() };
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let mut residual = self.get(i, j);
                for k in 0..j {
                    residual = residual - lower[i * n + k] * lower[j * n + k];
                }
                if l_jj > T::zero() {
                    lower[i * n + j] = residual / l_jj;
                } else if residual.abs() > tol.sqrt() {
                    return Err(CorrelationError::NotPositiveSemiDefinite {
                        index: i,
                        pivot: to_f64(residual),
                    });
                }
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower-triangular Cholesky factor.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor<T: Float> {
    data: Vec<T>,
    dim: usize,
}

impl<T: Float> CholeskyFactor<T> {
    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`; zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Returns `W = L * Z` as a new vector.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[T]) -> Vec<T> {
        let mut w = z[..self.dim].to_vec();
        self.transform_inplace(&mut w);
        w
    }

    /// Overwrites `z` with `L * z`.
    ///
    /// Rows are processed bottom-up so each `z[j]` with `j <= i` is still the
    /// original value when row `i` is computed.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform_inplace(&self, z: &mut [T]) {
        let n = self.dim;
        assert!(
            z.len() >= n,
            "shock vector length {} is less than matrix dimension {}",
            z.len(),
            n
        );

        for i in (0..n).rev() {
            let row = &self.data[i * n..i * n + i + 1];
            let mut acc = T::zero();
            for (l_ij, z_j) in row.iter().zip(z.iter()) {
                acc = acc + *l_ij * *z_j;
            }
            z[i] = acc;
        }
    }
}

#[inline]
fn tolerance<T: Float>() -> T {
    T::from(PIVOT_TOLERANCE).unwrap_or_else(T::epsilon)
}

#[inline]
fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
