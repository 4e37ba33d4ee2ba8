//! covariance — Cholesky factorization of `C = K + bI`.
//!
//! Purpose
//! -------
//! Factor the covariance once per fit and answer every downstream question
//! (solves, inverse, log-determinant) from the factor instead of forming a
//! raw inverse by elimination.
//!
//! Key behaviors
//! -------------
//! - [`CovarianceFactor::new`] copies the `ndarray` matrix into a
//!   `nalgebra::DMatrix` (`fill_dmatrix`) and runs `Cholesky`.
//! - [`CovarianceFactor::solve`] returns `C⁻¹v` via forward/back
//!   substitution; [`CovarianceFactor::log_det`] uses `2 Σ ln L_ii`.
//! - [`CovarianceFactor::inverse`] is only used where a full `C⁻¹` is
//!   unavoidable (trace terms of likelihood gradients).
//!
//! Invariants & assumptions
//! ------------------------
//! - Input matrices are square and symmetric. Positive definiteness is
//!   checked by the factorization itself; failure is reported as
//!   [`GpError::CovarianceNotPositiveDefinite`].
//! - The noise floor on `b` keeps well-posed fits away from that failure.
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};

use crate::gp::errors::{GpError, GpResult};

#[derive(Debug, Clone)]
pub struct CovarianceFactor {
    chol: Cholesky<f64, Dyn>,
    n: usize,
}

impl CovarianceFactor {
    /// # Errors
    /// [`GpError::CovarianceNotPositiveDefinite`] if the factorization fails
    /// or the matrix has non-finite entries.
    pub fn new(c: &Array2<f64>) -> GpResult<Self> {
        let n = c.nrows();
        if c.iter().any(|v| !v.is_finite()) {
            return Err(GpError::CovarianceNotPositiveDefinite { size: n });
        }
        let mut m = DMatrix::<f64>::zeros(n, n);
        fill_dmatrix(c, &mut m);
        let chol = Cholesky::new(m).ok_or(GpError::CovarianceNotPositiveDefinite { size: n })?;
        Ok(Self { chol, n })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// `C⁻¹ v`.
    pub fn solve(&self, v: &Array1<f64>) -> Array1<f64> {
        let rhs = DVector::from_iterator(self.n, v.iter().copied());
        let sol = self.chol.solve(&rhs);
        Array1::from_iter(sol.iter().copied())
    }

    /// `ln |C|`.
    pub fn log_det(&self) -> f64 {
        2.0 * self.chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>()
    }

    /// Dense `C⁻¹`.
    pub fn inverse(&self) -> Array2<f64> {
        let inv = self.chol.inverse();
        Array2::from_shape_fn((self.n, self.n), |(i, j)| inv[(i, j)])
    }

    /// `vᵀ C⁻¹ v`.
    pub fn quad_form(&self, v: &Array1<f64>) -> f64 {
        v.dot(&self.solve(v))
    }
}

/// Copy a square `ndarray` matrix into a pre-sized `DMatrix` column by
/// column.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for j in 0..src.ncols() {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}
