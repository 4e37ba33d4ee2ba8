//! GP posterior prediction and the [`Regressor`] seam used by acquisition.
//!
//! With `C = K + bI`, `α = C⁻¹y` and `k = k(x, X)`:
//!
//! - `μ(x) = kᵀα`, `∇μ(x) = (∂k/∂x) α`
//! - `σ(x) = sqrt(max(a - kᵀC⁻¹k, 0))`,
//!   `∇σ(x) = -(∂k/∂x) C⁻¹k / σ(x)` (zero when `σ` is numerically zero)
use ndarray::{Array1, Array2, ArrayView1};

use crate::gp::{
    covariance::CovarianceFactor,
    errors::{GpError, GpResult},
    hyperparams::KernelParams,
    kernel::{covariance_matrix, cross_covariance, cross_covariance_point_jacobian},
};
use crate::optimization::numerical_stability::GENERAL_TOL;

/// Anything that predicts a posterior mean and standard deviation, with
/// gradients, over a `d × N` design matrix.
pub trait Regressor {
    fn design_matrix(&self) -> &Array2<f64>;

    /// Targets (plain GP) or latent values (preference GP), one per column.
    fn latent_values(&self) -> &Array1<f64>;

    fn kernel_params(&self) -> &KernelParams;

    fn predict_mu(&self, x: ArrayView1<f64>) -> GpResult<f64>;
    fn predict_sigma(&self, x: ArrayView1<f64>) -> GpResult<f64>;
    fn predict_mu_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>>;
    fn predict_sigma_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>>;

    fn dim(&self) -> usize {
        self.design_matrix().nrows()
    }

    fn num_points(&self) -> usize {
        self.design_matrix().ncols()
    }
}

/// Fitted posterior: design, values, hyperparameters and the cached factor.
#[derive(Debug, Clone)]
pub struct Posterior {
    x: Array2<f64>,
    y: Array1<f64>,
    params: KernelParams,
    factor: CovarianceFactor,
    alpha: Array1<f64>,
}

impl Posterior {
    /// # Errors
    /// - [`GpError::EmptyDesignMatrix`] for zero columns.
    /// - Shape mismatches between `x`, `y` and `params`.
    /// - [`GpError::CovarianceNotPositiveDefinite`] from the factorization.
    pub fn new(x: Array2<f64>, y: Array1<f64>, params: KernelParams) -> GpResult<Self> {
        if x.ncols() == 0 {
            return Err(GpError::EmptyDesignMatrix);
        }
        if y.len() != x.ncols() {
            return Err(GpError::TargetLengthMismatch { expected: x.ncols(), found: y.len() });
        }
        params.check_dim(x.nrows())?;
        let factor = CovarianceFactor::new(&covariance_matrix(x.view(), &params))?;
        let alpha = factor.solve(&y);
        Ok(Self { x, y, params, factor, alpha })
    }

    fn check_point(&self, x: ArrayView1<f64>) -> GpResult<()> {
        if x.len() != self.x.nrows() {
            return Err(GpError::PointDimMismatch { expected: self.x.nrows(), found: x.len() });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(GpError::NonFiniteInput { what: "query point" });
        }
        Ok(())
    }

    fn variance_terms(&self, x: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>, f64) {
        let k = cross_covariance(x, self.x.view(), &self.params);
        let c_inv_k = self.factor.solve(&k);
        let var = (self.params.signal_var() - k.dot(&c_inv_k)).max(0.0);
        (k, c_inv_k, var)
    }
}

impl Regressor for Posterior {
    fn design_matrix(&self) -> &Array2<f64> {
        &self.x
    }

    fn latent_values(&self) -> &Array1<f64> {
        &self.y
    }

    fn kernel_params(&self) -> &KernelParams {
        &self.params
    }

    fn predict_mu(&self, x: ArrayView1<f64>) -> GpResult<f64> {
        self.check_point(x)?;
        Ok(cross_covariance(x, self.x.view(), &self.params).dot(&self.alpha))
    }

    fn predict_sigma(&self, x: ArrayView1<f64>) -> GpResult<f64> {
        self.check_point(x)?;
        let (_, _, var) = self.variance_terms(x);
        Ok(var.sqrt())
    }

    fn predict_mu_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>> {
        self.check_point(x)?;
        let jac = cross_covariance_point_jacobian(x, self.x.view(), &self.params);
        Ok(jac.dot(&self.alpha))
    }

    fn predict_sigma_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>> {
        self.check_point(x)?;
        let (_, c_inv_k, var) = self.variance_terms(x);
        let sigma = var.sqrt();
        if sigma < GENERAL_TOL {
            return Ok(Array1::zeros(x.len()));
        }
        let jac = cross_covariance_point_jacobian(x, self.x.view(), &self.params);
        Ok(jac.dot(&c_inv_k) * (-1.0 / sigma))
    }
}
