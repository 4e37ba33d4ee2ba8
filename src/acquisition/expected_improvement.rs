//! Expected improvement over the best posterior mean at observed points.
//!
//! ```text
//! EI(x) = σ(x) [z Φ(z) + φ(z)],   z = (μ(x) - μ*) / σ(x)
//! ∇EI(x) = Φ(z) ∇μ(x) + φ(z) ∇σ(x)
//! ```
//!
//! `μ* = max_j μ(X_j)`. Where `σ(x)` is numerically zero EI is defined as
//! `0` with a zero gradient.
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::gp::{
    errors::{GpError, GpResult},
    posterior::Regressor,
};
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Grad, Theta},
    numerical_stability::GENERAL_TOL,
    two_phase::BoxObjective,
};

/// Standard normal CDF (`erfc`-based in statrs, accurate in both tails).
pub fn normal_cdf(z: f64) -> f64 {
    Normal::standard().cdf(z)
}

pub fn normal_pdf(z: f64) -> f64 {
    Normal::standard().pdf(z)
}

/// Largest posterior mean over the design columns.
///
/// # Errors
/// [`GpError::EmptyDesignMatrix`] when the regressor has no data.
pub fn best_observed_mean<R: Regressor>(regressor: &R) -> GpResult<f64> {
    let mut best: Option<f64> = None;
    for col in regressor.design_matrix().columns() {
        let mu = regressor.predict_mu(col)?;
        best = Some(best.map_or(mu, |b: f64| b.max(mu)));
    }
    best.ok_or(GpError::EmptyDesignMatrix)
}

/// EI bound to a regressor with `μ*` computed once.
pub struct ExpectedImprovement<'a, R> {
    regressor: &'a R,
    best: f64,
}

impl<'a, R: Regressor> ExpectedImprovement<'a, R> {
    pub fn new(regressor: &'a R) -> GpResult<Self> {
        Ok(Self { regressor, best: best_observed_mean(regressor)? })
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn value_at(&self, x: ArrayView1<f64>) -> GpResult<f64> {
        let sigma = self.regressor.predict_sigma(x)?;
        if sigma < GENERAL_TOL {
            return Ok(0.0);
        }
        let z = (self.regressor.predict_mu(x)? - self.best) / sigma;
        Ok((sigma * (z * normal_cdf(z) + normal_pdf(z))).max(0.0))
    }

    pub fn grad_at(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>> {
        let sigma = self.regressor.predict_sigma(x)?;
        if sigma < GENERAL_TOL {
            return Ok(Array1::zeros(x.len()));
        }
        let z = (self.regressor.predict_mu(x)? - self.best) / sigma;
        let mu_g = self.regressor.predict_mu_grad(x)?;
        let sigma_g = self.regressor.predict_sigma_grad(x)?;
        Ok(mu_g * normal_cdf(z) + sigma_g * normal_pdf(z))
    }
}

impl<'a, R: Regressor> BoxObjective for ExpectedImprovement<'a, R> {
    fn value(&self, x: &Theta) -> OptResult<f64> {
        Ok(self.value_at(x.view())?)
    }

    fn grad(&self, x: &Theta) -> OptResult<Grad> {
        Ok(self.grad_at(x.view())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::{hyperparams::KernelParams, regressor::GaussianProcessRegressor};
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::{Array2, array};

    fn regressor() -> GaussianProcessRegressor {
        let x = array![[0.1, 0.4, 0.75], [0.3, 0.9, 0.5]];
        let y = array![0.2, 0.6, -0.1];
        let params = KernelParams::new(0.5, 1e-4, array![0.3, 0.4]).unwrap();
        GaussianProcessRegressor::with_hyperparams(x, y, params).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The CDF/PDF helpers match textbook values.
    fn normal_helpers_match_reference_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(normal_cdf(1.959_963_984_540_054), 0.975, epsilon = 1e-10);
        assert_relative_eq!(normal_cdf(-1.0) + normal_cdf(1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            normal_pdf(0.0),
            1.0 / (2.0 * std::f64::consts::PI).sqrt(),
            epsilon = 1e-15
        );
        assert!(normal_cdf(-40.0) >= 0.0);
    }

    #[test]
    // Purpose
    // -------
    // EI is non-negative over a grid of the unit square and μ* is the best
    // mean at the observed columns.
    fn expected_improvement_is_non_negative() {
        let r = regressor();
        let ei = ExpectedImprovement::new(&r).unwrap();
        assert_relative_eq!(ei.best(), r.predict_mu(array![0.4, 0.9].view()).unwrap());

        for i in 0..=10 {
            for j in 0..=10 {
                let x = array![i as f64 / 10.0, j as f64 / 10.0];
                let v = ei.value_at(x.view()).unwrap();
                assert!(v >= 0.0 && v.is_finite(), "EI({x}) = {v}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The analytic EI gradient matches central differences away from the
    // data.
    fn expected_improvement_gradient_matches_finite_differences() {
        let r = regressor();
        let ei = ExpectedImprovement::new(&r).unwrap();
        for x in [array![0.55, 0.2], array![0.25, 0.65], array![0.9, 0.9]] {
            let analytic = ei.grad_at(x.view()).unwrap();
            let fd = x.central_diff(&|z: &Array1<f64>| ei.value_at(z.view()).unwrap());
            for i in 0..2 {
                assert_relative_eq!(analytic[i], fd[i], epsilon = 1e-6, max_relative = 1e-4);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Without data there is no incumbent mean.
    fn empty_regressor_has_no_best_mean() {
        let params = KernelParams::shared(0.5, 1e-4, 0.3, 2).unwrap();
        let r = GaussianProcessRegressor::with_hyperparams(Array2::zeros((2, 0)), array![], params)
            .unwrap();
        assert_eq!(best_observed_mean(&r).unwrap_err(), GpError::EmptyDesignMatrix);
    }
}
