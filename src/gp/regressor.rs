//! Gaussian-process regression on real-valued targets.
//!
//! Hyperparameters `(a, b, r)` are the MAP estimate of the log marginal
//! likelihood plus log-normal priors, found by a two-phase search over the
//! box `[1e-8, 50]^(d+2)` (noise bounded below by [`NOISE_FLOOR`]).
use ndarray::{Array1, Array2, ArrayView1};

use crate::gp::{
    errors::{GpError, GpResult},
    hyperparams::{HYPER_LOWER, HYPER_UPPER, HyperPriors, KernelParams, NOISE_FLOOR},
    likelihood::MarginalLikelihood,
    options::GpFitOptions,
    posterior::{Posterior, Regressor},
};
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Grad, Theta},
    two_phase::{BoxObjective, SearchBounds, TwoPhaseOptions, TwoPhaseSearch},
};

/// Search box for `(a, b, r_1, …, r_d)`.
pub(crate) fn hyper_bounds(dim: usize) -> OptResult<SearchBounds> {
    let mut lower = Array1::from_elem(dim + 2, HYPER_LOWER);
    lower[1] = NOISE_FLOOR;
    Ok(SearchBounds::new(lower, Array1::from_elem(dim + 2, HYPER_UPPER))?)
}

/// Log marginal likelihood plus log prior, as a function of packed
/// hyperparameters.
struct HyperPosterior<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    priors: &'a HyperPriors,
}

impl<'a> HyperPosterior<'a> {
    fn params(&self, theta: &Theta) -> GpResult<KernelParams> {
        KernelParams::from_theta(theta, self.x.nrows())
    }
}

impl<'a> BoxObjective for HyperPosterior<'a> {
    fn value(&self, theta: &Theta) -> OptResult<f64> {
        let p = self.params(theta)?;
        let ml = MarginalLikelihood::evaluate(self.x.view(), self.y, &p)?;
        Ok(ml.value() + self.priors.log_density(&p))
    }

    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        let p = self.params(theta)?;
        let ml = MarginalLikelihood::evaluate(self.x.view(), self.y, &p)?;
        Ok(ml.hyper_grad(self.x.view(), &p) + self.priors.grad(&p))
    }
}

/// GP regressor over a `d × N` design matrix.
///
/// With zero observations no fit happens: the hyperparameters stay at the
/// supplied (or prior-location) values and predictions are those of the
/// prior, `μ = 0` and `σ = sqrt(a)`.
#[derive(Debug, Clone)]
pub struct GaussianProcessRegressor {
    x: Array2<f64>,
    y: Array1<f64>,
    params: KernelParams,
    posterior: Option<Posterior>,
}

impl GaussianProcessRegressor {
    /// MAP-fit hyperparameters under the default regression priors.
    ///
    /// # Errors
    /// - Shape and finiteness problems in `x`, `y`.
    /// - Budget/configuration errors and a final covariance that cannot be
    ///   factored.
    pub fn fit(x: Array2<f64>, y: Array1<f64>, opts: &GpFitOptions) -> OptResult<Self> {
        Self::fit_with_priors(x, y, &HyperPriors::regression_default(), opts)
    }

    pub fn fit_with_priors(
        x: Array2<f64>, y: Array1<f64>, priors: &HyperPriors, opts: &GpFitOptions,
    ) -> OptResult<Self> {
        check_inputs(&x, &y)?;
        let dim = x.nrows();
        let start = priors.location(dim)?;
        if x.ncols() == 0 {
            return Ok(Self { x, y, params: start, posterior: None });
        }

        let bounds = hyper_bounds(dim)?;
        let search = TwoPhaseSearch::swarm_lbfgs(
            TwoPhaseOptions::new(opts.global_budget, opts.local_budget, opts.verbose)?,
            opts.seed,
        );
        let objective = HyperPosterior { x: &x, y: &y, priors };
        let best = search.maximize(&objective, &bounds, Some(&start.to_theta()))?;
        let params = KernelParams::from_theta(&best.x, dim)?;
        Ok(Self::with_hyperparams(x, y, params)?)
    }

    /// Build the posterior at fixed hyperparameters; no optimization.
    pub fn with_hyperparams(x: Array2<f64>, y: Array1<f64>, params: KernelParams) -> GpResult<Self> {
        check_inputs(&x, &y)?;
        params.check_dim(x.nrows())?;
        let posterior = if x.ncols() == 0 {
            None
        } else {
            Some(Posterior::new(x.clone(), y.clone(), params.clone())?)
        };
        Ok(Self { x, y, params, posterior })
    }

    pub fn is_fitted(&self) -> bool {
        self.posterior.is_some()
    }

    fn check_point(&self, x: ArrayView1<f64>) -> GpResult<()> {
        if x.len() != self.x.nrows() {
            return Err(GpError::PointDimMismatch { expected: self.x.nrows(), found: x.len() });
        }
        Ok(())
    }
}

fn check_inputs(x: &Array2<f64>, y: &Array1<f64>) -> GpResult<()> {
    if x.nrows() == 0 {
        return Err(GpError::LengthScaleDimMismatch { expected: 1, found: 0 });
    }
    if y.len() != x.ncols() {
        return Err(GpError::TargetLengthMismatch { expected: x.ncols(), found: y.len() });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(GpError::NonFiniteInput { what: "design matrix" });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(GpError::NonFiniteInput { what: "targets" });
    }
    Ok(())
}

impl Regressor for GaussianProcessRegressor {
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
        match &self.posterior {
            Some(p) => p.predict_mu(x),
            None => self.check_point(x).map(|_| 0.0),
        }
    }

    fn predict_sigma(&self, x: ArrayView1<f64>) -> GpResult<f64> {
        match &self.posterior {
            Some(p) => p.predict_sigma(x),
            None => self.check_point(x).map(|_| self.params.signal_var().sqrt()),
        }
    }

    fn predict_mu_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>> {
        match &self.posterior {
            Some(p) => p.predict_mu_grad(x),
            None => self.check_point(x).map(|_| Array1::zeros(x.len())),
        }
    }

    fn predict_sigma_grad(&self, x: ArrayView1<f64>) -> GpResult<Array1<f64>> {
        match &self.posterior {
            Some(p) => p.predict_sigma_grad(x),
            None => self.check_point(x).map(|_| Array1::zeros(x.len())),
        }
    }
}
