//! Preference regressor: a GP over latent values observed only through
//! Bradley–Terry–Luce choices.
//!
//! Log posterior
//! -------------
//! For latent values `y` (one per design column) and hyperparameters `θ`:
//!
//! ```text
//! L(y, θ) = ln N(y | 0, C(θ)) + Σ_sets ln P_BTL(winner | y_set) + ln p(θ)
//! ```
//!
//! Fit plan
//! --------
//! 1. Latent stage: maximize `L` over `y` alone at the default
//!    hyperparameters (concave in `y`; unconstrained L-BFGS from `y = 0`).
//! 2. Hyperparameter stage (when estimating): particle swarm over the
//!    hyperparameter box with `y` fixed; the defaults compete with the
//!    swarm's best point.
//! 3. Joint stage (when estimating): L-BFGS over `(y, θ)` in a box, seeded
//!    from stages 1–2. It is kept only if it improves `L`.
//!
//! Every fit restarts from the defaults; nothing is carried over from an
//! earlier fit.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, s};

use crate::gp::{
    btl::{preference_log_likelihood, preference_log_likelihood_grad},
    covariance::CovarianceFactor,
    data::PreferenceData,
    errors::{GpError, GpResult},
    export::{write_design_csv, write_preferences_csv},
    hyperparams::{HyperPriors, KernelParams, PreferenceHyperparams},
    kernel::covariance_matrix,
    likelihood::{HALF_LN_2PI, MarginalLikelihood},
    options::PreferenceFitOptions,
    posterior::{Posterior, Regressor},
    regressor::hyper_bounds,
};
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Cost, Grad, LogDensity, MapOptions, Theta, maximize},
    two_phase::{
        BoxObjective, GlobalSearch, LbfgsRefine, LocalRefine, SearchBounds, SearchPoint,
        SwarmOptions, SwarmSearch,
    },
};

/// Half-width of the latent-value box used by the joint stage.
const LATENT_BOUND: f64 = 25.0;

/// Latent stage: `y ↦ L(y, θ₀)` with the covariance factored once.
struct LatentPosterior<'a> {
    factor: CovarianceFactor,
    data: &'a PreferenceData,
    btl_scale: f64,
}

impl<'a> LatentPosterior<'a> {
    fn new(data: &'a PreferenceData, params: &KernelParams, btl_scale: f64) -> GpResult<Self> {
        let factor = CovarianceFactor::new(&covariance_matrix(data.x().view(), params))?;
        Ok(Self { factor, data, btl_scale })
    }
}

impl<'a> LogDensity for LatentPosterior<'a> {
    type Data = ();

    fn value(&self, y: &Theta, _: &()) -> OptResult<Cost> {
        let n = y.len() as f64;
        let prior = -0.5 * self.factor.quad_form(y) - 0.5 * self.factor.log_det() - n * HALF_LN_2PI;
        Ok(prior + preference_log_likelihood(y, self.data.preferences(), self.btl_scale))
    }

    fn check(&self, y: &Theta, _: &()) -> OptResult<()> {
        if y.len() != self.factor.size() {
            return Err(GpError::TargetLengthMismatch {
                expected: self.factor.size(),
                found: y.len(),
            }
            .into());
        }
        Ok(())
    }

    fn grad(&self, y: &Theta, _: &()) -> OptResult<Grad> {
        let btl = preference_log_likelihood_grad(y, self.data.preferences(), self.btl_scale);
        Ok(btl - self.factor.solve(y))
    }
}

/// Hyperparameter stage: `θ ↦ L(y₀, θ)` with `y₀` fixed. The BTL term is
/// constant in `θ` and left out.
struct HyperStage<'a> {
    data: &'a PreferenceData,
    y: &'a Array1<f64>,
    priors: &'a HyperPriors,
}

impl<'a> BoxObjective for HyperStage<'a> {
    fn value(&self, theta: &Theta) -> OptResult<f64> {
        let p = KernelParams::from_theta(theta, self.data.dim())?;
        let ml = MarginalLikelihood::evaluate(self.data.x().view(), self.y, &p)?;
        Ok(ml.value() + self.priors.log_density(&p))
    }
}

/// Joint stage over `z = (y_1..y_N, a, b, r_1..r_d)`.
struct JointPosterior<'a> {
    data: &'a PreferenceData,
    priors: &'a HyperPriors,
    btl_scale: f64,
}

impl<'a> JointPosterior<'a> {
    fn split(&self, z: &Theta) -> GpResult<(Array1<f64>, KernelParams)> {
        let n = self.data.num_points();
        let y = z.slice(s![..n]).to_owned();
        let p = KernelParams::from_theta(&z.slice(s![n..]).to_owned(), self.data.dim())?;
        Ok((y, p))
    }

    /// Stack latent values on top of packed hyperparameters (or their
    /// gradient).
    fn join(y: &Array1<f64>, hyper: &Array1<f64>) -> Theta {
        y.iter().copied().chain(hyper.iter().copied()).collect()
    }

    fn bounds(&self) -> OptResult<SearchBounds> {
        let n = self.data.num_points();
        let hyper = hyper_bounds(self.data.dim())?;
        let lower = std::iter::repeat(-LATENT_BOUND).take(n).chain(hyper.lower().iter().copied());
        let upper = std::iter::repeat(LATENT_BOUND).take(n).chain(hyper.upper().iter().copied());
        SearchBounds::new(lower.collect(), upper.collect())
    }
}

impl<'a> BoxObjective for JointPosterior<'a> {
    fn value(&self, z: &Theta) -> OptResult<f64> {
        let (y, p) = self.split(z)?;
        let ml = MarginalLikelihood::evaluate(self.data.x().view(), &y, &p)?;
        Ok(ml.value()
            + self.priors.log_density(&p)
            + preference_log_likelihood(&y, self.data.preferences(), self.btl_scale))
    }

    fn grad(&self, z: &Theta) -> OptResult<Grad> {
        let (y, p) = self.split(z)?;
        let ml = MarginalLikelihood::evaluate(self.data.x().view(), &y, &p)?;
        let gy = preference_log_likelihood_grad(&y, self.data.preferences(), self.btl_scale)
            - ml.alpha();
        let gh = ml.hyper_grad(self.data.x().view(), &p) + self.priors.grad(&p);
        Ok(Self::join(&gy, &gh))
    }
}

/// Fitted preference model.
#[derive(Debug, Clone)]
pub struct PreferenceRegressor {
    data: PreferenceData,
    hyper: PreferenceHyperparams,
    params: KernelParams,
    y: Array1<f64>,
    posterior: Option<Posterior>,
}

impl PreferenceRegressor {
    /// Fit latent values and, when `opts.estimate_hyperparams` is set,
    /// kernel hyperparameters, following the three-stage plan in the module
    /// docs.
    ///
    /// Data without any column yields an unfitted model at the defaults.
    ///
    /// # Errors
    /// - Zero-dimensional data.
    /// - Solver failures in the latent stage, or a covariance that cannot be
    ///   factored at the final estimate.
    pub fn fit(
        data: PreferenceData, hyper: PreferenceHyperparams, opts: &PreferenceFitOptions,
    ) -> OptResult<Self> {
        let dim = data.dim();
        let defaults = hyper.kernel_params(dim)?;
        if data.num_points() == 0 {
            return Ok(Self { data, hyper, params: defaults, y: Array1::zeros(0), posterior: None });
        }

        let y0 = {
            let latent = LatentPosterior::new(&data, &defaults, hyper.btl_scale)?;
            let latent_opts = MapOptions::with_max_iter(opts.latent_budget, opts.verbose)?;
            maximize(&latent, Array1::zeros(data.num_points()), &(), &latent_opts)?.theta_hat
        };

        let (y, params) = if opts.estimate_hyperparams {
            Self::estimate_jointly(&data, &hyper, y0, defaults, opts)?
        } else {
            (y0, defaults)
        };

        let posterior = Posterior::new(data.x().clone(), y.clone(), params.clone())?;
        Ok(Self { data, hyper, params, y, posterior: Some(posterior) })
    }

    fn estimate_jointly(
        data: &PreferenceData, hyper: &PreferenceHyperparams, y0: Array1<f64>,
        defaults: KernelParams, opts: &PreferenceFitOptions,
    ) -> OptResult<(Array1<f64>, KernelParams)> {
        let priors = hyper.priors()?;
        let dim = data.dim();

        let stage = HyperStage { data, y: &y0, priors: &priors };
        let theta0 = defaults.to_theta();
        let incumbent = SearchPoint::new(theta0.clone(), stage.value(&theta0)?);
        let swarm = SwarmSearch::new(SwarmOptions {
            seed: opts.seed,
            verbose: opts.verbose,
            ..SwarmOptions::default()
        });
        let theta1 = match swarm.search(&stage, &hyper_bounds(dim)?, opts.map_budget) {
            Ok(found) => incumbent.better(found).x,
            Err(_) => incumbent.x,
        };

        let joint = JointPosterior { data, priors: &priors, btl_scale: hyper.btl_scale };
        let bounds = joint.bounds()?;
        let z1 = bounds.clamp(&JointPosterior::join(&y0, &theta1));
        let start = SearchPoint::new(z1.clone(), joint.value(&z1)?);
        let best = match LbfgsRefine::new(opts.verbose).refine(&joint, &bounds, &z1, opts.map_budget)
        {
            Ok(polished) if polished.value.is_finite() && polished.value > start.value => polished,
            _ => start,
        };
        Ok(joint.split(&best.x)?)
    }

    pub fn data(&self) -> &PreferenceData {
        &self.data
    }

    pub fn hyperparams(&self) -> &PreferenceHyperparams {
        &self.hyper
    }

    pub fn is_fitted(&self) -> bool {
        self.posterior.is_some()
    }

    /// Column index of the largest latent value; the first index wins ties.
    ///
    /// # Errors
    /// [`GpError::EmptyDesignMatrix`] when there is no data.
    pub fn find_arg_max_index(&self) -> GpResult<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.y.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i).ok_or(GpError::EmptyDesignMatrix)
    }

    /// Design column with the largest latent value: the best point seen.
    pub fn find_arg_max(&self) -> GpResult<Array1<f64>> {
        Ok(self.data.x().column(self.find_arg_max_index()?).to_owned())
    }

    /// Log posterior `L(y, θ)` at the fitted estimate.
    pub fn log_posterior(&self) -> GpResult<f64> {
        if self.y.is_empty() {
            return Err(GpError::EmptyDesignMatrix);
        }
        let priors = self.hyper.priors()?;
        let ml = MarginalLikelihood::evaluate(self.data.x().view(), &self.y, &self.params)?;
        Ok(ml.value()
            + priors.log_density(&self.params)
            + preference_log_likelihood(&self.y, self.data.preferences(), self.hyper.btl_scale))
    }

    /// Write `X.csv` (one row per design column: coordinates, then the latent
    /// value) and `D.csv` (one row per preference set, winner first) into
    /// `dir`.
    ///
    /// # Errors
    /// [`GpError::Io`] when a file cannot be created or written.
    pub fn dump_data(&self, dir: impl AsRef<Path>) -> GpResult<()> {
        let dir = dir.as_ref();
        let y = if self.y.is_empty() { None } else { Some(&self.y) };

        let x_path = dir.join("X.csv");
        let file = File::create(&x_path).map_err(|e| io_error(&x_path, e))?;
        write_design_csv(BufWriter::new(file), self.data.x(), y).map_err(|e| io_error(&x_path, e))?;

        let d_path = dir.join("D.csv");
        let file = File::create(&d_path).map_err(|e| io_error(&d_path, e))?;
        write_preferences_csv(BufWriter::new(file), self.data.preferences())
            .map_err(|e| io_error(&d_path, e))
    }

    fn check_point(&self, x: ArrayView1<f64>) -> GpResult<()> {
        if x.len() != self.data.dim() {
            return Err(GpError::PointDimMismatch { expected: self.data.dim(), found: x.len() });
        }
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> GpError {
    GpError::Io { path: path.display().to_string(), text: e.to_string() }
}

impl Regressor for PreferenceRegressor {
    fn design_matrix(&self) -> &Array2<f64> {
        self.data.x()
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
