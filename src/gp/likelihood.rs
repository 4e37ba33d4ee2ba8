//! Gaussian log marginal likelihood `ln N(y | 0, C)` and its gradients.
//!
//! `ℓ = -½ yᵀC⁻¹y - ½ ln|C| - ½ N ln 2π`
//!
//! With `α = C⁻¹y` and `W = ααᵀ - C⁻¹`:
//!
//! - `∂ℓ/∂θ_k = ½ αᵀ(∂C/∂θ_k)α - ½ tr(C⁻¹ ∂C/∂θ_k) = ½ Σ_pq W_pq (∂C/∂θ_k)_pq`
//! - `∂ℓ/∂y = -α`
//!
//! The plain regressor maximizes this over the hyperparameters; the
//! preference regressor uses it as the GP prior on its latent values.
use ndarray::{Array1, Array2, ArrayView2};

use crate::gp::{
    covariance::CovarianceFactor,
    errors::{GpError, GpResult},
    hyperparams::KernelParams,
    kernel::{covariance_hyper_grads, covariance_matrix},
};

pub(crate) const HALF_LN_2PI: f64 = 0.918_938_533_204_672_8;

#[derive(Debug, Clone)]
pub struct MarginalLikelihood {
    factor: CovarianceFactor,
    alpha: Array1<f64>,
    value: f64,
}

impl MarginalLikelihood {
    /// Factor `C(θ)` for design `x` and evaluate `ln N(y | 0, C)`.
    ///
    /// # Errors
    /// - [`GpError::TargetLengthMismatch`] when `y` and `x` disagree.
    /// - [`GpError::CovarianceNotPositiveDefinite`].
    pub fn evaluate(
        x: ArrayView2<f64>, y: &Array1<f64>, params: &KernelParams,
    ) -> GpResult<Self> {
        if y.len() != x.ncols() {
            return Err(GpError::TargetLengthMismatch { expected: x.ncols(), found: y.len() });
        }
        let factor = CovarianceFactor::new(&covariance_matrix(x, params))?;
        let alpha = factor.solve(y);
        let n = y.len() as f64;
        let value = -0.5 * y.dot(&alpha) - 0.5 * factor.log_det() - n * HALF_LN_2PI;
        Ok(Self { factor, alpha, value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// `C⁻¹y`; the gradient with respect to `y` is `-alpha`.
    pub fn alpha(&self) -> &Array1<f64> {
        &self.alpha
    }

    /// Gradient with respect to `(a, b, r_1, …, r_d)`.
    pub fn hyper_grad(&self, x: ArrayView2<f64>, params: &KernelParams) -> Array1<f64> {
        let n = self.alpha.len();
        let outer = Array2::from_shape_fn((n, n), |(p, q)| self.alpha[p] * self.alpha[q]);
        let w = outer - self.factor.inverse();
        covariance_hyper_grads(x, params).iter().map(|dc| 0.5 * (&w * dc).sum()).collect()
    }
}
