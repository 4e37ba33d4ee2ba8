//! Kernel hyperparameters and their log-normal priors.
//!
//! Packing order
//! -------------
//! Whenever hyperparameters travel through an optimizer they are packed as
//! `θ = (a, b, r_1, …, r_d)`: signal variance, noise variance, then one
//! length-scale per input dimension.
use ndarray::Array1;
use statrs::distribution::{Continuous, LogNormal};

use crate::gp::errors::{GpError, GpResult, check_positive};

/// Lower bound for the noise variance. Keeps `K + bI` safely positive
/// definite when the MAP estimate pushes `b` toward zero.
pub const NOISE_FLOOR: f64 = 1e-6;

/// Lower end of the hyperparameter search box (signal variance and
/// length-scales).
pub const HYPER_LOWER: f64 = 1e-8;

/// Upper end of the hyperparameter search box.
pub const HYPER_UPPER: f64 = 50.0;

/// Validated ARD squared-exponential hyperparameters plus observation noise.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelParams {
    signal_var: f64,
    noise: f64,
    length_scales: Array1<f64>,
}

impl KernelParams {
    /// # Errors
    /// [`GpError::InvalidHyperparameter`] if any value is non-finite or
    /// `<= 0`, or if there are no length-scales.
    pub fn new(signal_var: f64, noise: f64, length_scales: Array1<f64>) -> GpResult<Self> {
        check_positive("signal variance", signal_var)?;
        check_positive("noise variance", noise)?;
        if length_scales.is_empty() {
            return Err(GpError::LengthScaleDimMismatch { expected: 1, found: 0 });
        }
        for &r in length_scales.iter() {
            check_positive("length-scale", r)?;
        }
        Ok(Self { signal_var, noise, length_scales })
    }

    /// One length-scale `r` shared by all `dim` inputs.
    pub fn shared(signal_var: f64, noise: f64, r: f64, dim: usize) -> GpResult<Self> {
        Self::new(signal_var, noise, Array1::from_elem(dim, r))
    }

    pub fn signal_var(&self) -> f64 {
        self.signal_var
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn length_scales(&self) -> &Array1<f64> {
        &self.length_scales
    }

    pub fn dim(&self) -> usize {
        self.length_scales.len()
    }

    /// Pack as `(a, b, r_1, …, r_d)`.
    pub fn to_theta(&self) -> Array1<f64> {
        let mut theta = Array1::zeros(self.dim() + 2);
        theta[0] = self.signal_var;
        theta[1] = self.noise;
        theta.slice_mut(ndarray::s![2..]).assign(&self.length_scales);
        theta
    }

    /// Unpack `(a, b, r_1, …, r_d)`, validating every entry.
    pub fn from_theta(theta: &Array1<f64>, dim: usize) -> GpResult<Self> {
        if theta.len() != dim + 2 {
            return Err(GpError::LengthScaleDimMismatch {
                expected: dim,
                found: theta.len().saturating_sub(2),
            });
        }
        Self::new(theta[0], theta[1], theta.slice(ndarray::s![2..]).to_owned())
    }

    /// Check that these parameters fit `dim`-dimensional inputs.
    pub fn check_dim(&self, dim: usize) -> GpResult<()> {
        if self.dim() != dim {
            return Err(GpError::LengthScaleDimMismatch { expected: dim, found: self.dim() });
        }
        Ok(())
    }
}

/// Log-normal prior on a positive scalar: `ln x ~ N(mu, sigma2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalPrior {
    pub mu: f64,
    pub sigma2: f64,
}

impl LogNormalPrior {
    pub fn new(mu: f64, sigma2: f64) -> GpResult<Self> {
        if !mu.is_finite() {
            return Err(GpError::NonFiniteInput { what: "prior location" });
        }
        check_positive("prior variance", sigma2)?;
        Ok(Self { mu, sigma2 })
    }

    /// Prior whose log-location sits at `ln(center)`.
    pub fn centered_at(center: f64, sigma2: f64) -> GpResult<Self> {
        Self::new(check_positive("prior center", center)?.ln(), sigma2)
    }

    /// Log density of `x`; `-∞` if the fields were set to an invalid
    /// location or variance after construction.
    pub fn log_pdf(&self, x: f64) -> f64 {
        LogNormal::new(self.mu, self.sigma2.sqrt()).map_or(f64::NEG_INFINITY, |d| d.ln_pdf(x))
    }

    /// `d ln p / dx = -1/x - (ln x - μ) / (σ² x)`.
    pub fn d_log_pdf(&self, x: f64) -> f64 {
        -1.0 / x - (x.ln() - self.mu) / (self.sigma2 * x)
    }
}

/// Independent log-normal priors on `a`, `b` and every `r_i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperPriors {
    pub signal_var: LogNormalPrior,
    pub noise: LogNormalPrior,
    pub length_scale: LogNormalPrior,
}

impl HyperPriors {
    /// Priors used for plain GP regression: log-locations `ln 0.5` for `a`
    /// and `r`, `ln 1e-4` for `b`, all with variance `0.5`.
    pub fn regression_default() -> Self {
        let half = 0.5f64.ln();
        Self {
            signal_var: LogNormalPrior { mu: half, sigma2: 0.5 },
            noise: LogNormalPrior { mu: (1e-4f64).ln(), sigma2: 0.5 },
            length_scale: LogNormalPrior { mu: half, sigma2: 0.5 },
        }
    }

    /// Priors centred on a set of default values with a common variance.
    pub fn centered(a: f64, b: f64, r: f64, variance: f64) -> GpResult<Self> {
        Ok(Self {
            signal_var: LogNormalPrior::centered_at(a, variance)?,
            noise: LogNormalPrior::centered_at(b, variance)?,
            length_scale: LogNormalPrior::centered_at(r, variance)?,
        })
    }

    /// Prior modes `exp(μ)` as a starting point, one shared length-scale.
    pub fn location(&self, dim: usize) -> GpResult<KernelParams> {
        KernelParams::shared(
            self.signal_var.mu.exp(),
            self.noise.mu.exp().max(NOISE_FLOOR),
            self.length_scale.mu.exp(),
            dim,
        )
    }

    pub fn log_density(&self, params: &KernelParams) -> f64 {
        self.signal_var.log_pdf(params.signal_var)
            + self.noise.log_pdf(params.noise)
            + params.length_scales.iter().map(|&r| self.length_scale.log_pdf(r)).sum::<f64>()
    }

    /// Gradient of [`Self::log_density`] in packing order.
    pub fn grad(&self, params: &KernelParams) -> Array1<f64> {
        let mut g = Array1::zeros(params.dim() + 2);
        g[0] = self.signal_var.d_log_pdf(params.signal_var);
        g[1] = self.noise.d_log_pdf(params.noise);
        for (i, &r) in params.length_scales.iter().enumerate() {
            g[i + 2] = self.length_scale.d_log_pdf(r);
        }
        g
    }
}

/// Caller-facing defaults of the preference model.
///
/// `a`, `r`, `b` are the kernel defaults (and the centres of the priors
/// when hyperparameters are estimated); `variance` is the log-normal prior
/// variance; `btl_scale` is the choice-model temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceHyperparams {
    pub a: f64,
    pub r: f64,
    pub b: f64,
    pub variance: f64,
    pub btl_scale: f64,
}

impl PreferenceHyperparams {
    pub fn new(a: f64, r: f64, b: f64, variance: f64, btl_scale: f64) -> GpResult<Self> {
        check_positive("signal variance", a)?;
        check_positive("length-scale", r)?;
        check_positive("noise variance", b)?;
        check_positive("prior variance", variance)?;
        check_positive("btl scale", btl_scale)?;
        Ok(Self { a, r, b, variance, btl_scale })
    }

    pub fn kernel_params(&self, dim: usize) -> GpResult<KernelParams> {
        KernelParams::shared(self.a, self.b.max(NOISE_FLOOR), self.r, dim)
    }

    pub fn priors(&self) -> GpResult<HyperPriors> {
        HyperPriors::centered(self.a, self.b.max(NOISE_FLOOR), self.r, self.variance)
    }
}

impl Default for PreferenceHyperparams {
    fn default() -> Self {
        Self { a: 0.5, r: 0.5, b: 0.005, variance: 0.25, btl_scale: 0.01 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Non-positive or non-finite values are rejected with the field name.
    fn kernel_params_reject_invalid_values() {
        assert_eq!(
            KernelParams::new(0.0, 0.1, array![1.0]),
            Err(GpError::InvalidHyperparameter { name: "signal variance", value: 0.0 })
        );
        assert!(KernelParams::new(1.0, f64::NAN, array![1.0]).is_err());
        assert!(KernelParams::new(1.0, 0.1, array![1.0, -2.0]).is_err());
        assert!(KernelParams::new(1.0, 0.1, array![]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Packing order is (a, b, r...) and unpacking inverts it.
    fn theta_packing_round_trips() {
        let p = KernelParams::new(0.7, 0.01, array![0.2, 0.3]).unwrap();
        let theta = p.to_theta();

        assert_eq!(theta, array![0.7, 0.01, 0.2, 0.3]);
        assert_eq!(KernelParams::from_theta(&theta, 2).unwrap(), p);
        assert!(KernelParams::from_theta(&theta, 3).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The closed-form log density matches statrs, and its derivative matches
    // a central difference.
    fn log_normal_prior_matches_statrs_and_fd() {
        let prior = LogNormalPrior::new(0.5f64.ln(), 0.5).unwrap();
        let reference = LogNormal::new(0.5f64.ln(), 0.5f64.sqrt()).unwrap();
        for &x in &[0.05, 0.5, 1.3, 7.0] {
            assert_relative_eq!(prior.log_pdf(x), reference.ln_pdf(x), epsilon = 1e-12);
            let h = 1e-6 * x;
            let fd = (prior.log_pdf(x + h) - prior.log_pdf(x - h)) / (2.0 * h);
            assert_relative_eq!(prior.d_log_pdf(x), fd, epsilon = 1e-5, max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // A prior whose public fields were overwritten with an invalid variance
    // reports zero density instead of NaN.
    fn log_normal_prior_with_invalid_variance_has_no_mass() {
        let mut prior = LogNormalPrior::new(0.0, 1.0).unwrap();
        prior.sigma2 = -1.0;
        assert_eq!(prior.log_pdf(1.0), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Preference defaults follow the documented values and noise never drops
    // below the floor.
    fn preference_defaults_and_noise_floor() {
        let h = PreferenceHyperparams::default();
        assert_eq!((h.a, h.r, h.b, h.variance, h.btl_scale), (0.5, 0.5, 0.005, 0.25, 0.01));

        let tiny = PreferenceHyperparams::new(0.5, 0.5, 1e-12, 0.25, 0.01).unwrap();
        assert_eq!(tiny.kernel_params(3).unwrap().noise(), NOISE_FLOOR);
        assert!(PreferenceHyperparams::new(0.5, 0.5, 0.005, 0.0, 0.01).is_err());
    }
}
