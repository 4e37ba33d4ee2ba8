//! gp — Gaussian-process models over a `d × N` design matrix.
//!
//! Purpose
//! -------
//! Hold every statistical piece of the optimizer: the ARD squared-exponential
//! kernel and its derivatives, hyperparameters with log-normal priors, the
//! Cholesky-factored covariance, posterior prediction, and the two fitted
//! models that sit on top of them.
//!
//! Key behaviors
//! -------------
//! - [`GaussianProcessRegressor`]: real-valued targets, MAP hyperparameters
//!   via the two-phase search.
//! - [`PreferenceRegressor`]: latent values observed only through
//!   Bradley–Terry–Luce choices, fitted jointly with (optionally)
//!   hyperparameters.
//! - [`Regressor`]: the prediction surface both models expose (mean,
//!   standard deviation and their gradients in the query point).
//!
//! Invariants & assumptions
//! ------------------------
//! - Hyperparameters are validated on construction; kernel functions assume
//!   `a, b, r_i > 0`.
//! - Noise never drops below [`NOISE_FLOOR`], which keeps `K + bI`
//!   factorizable.
//! - Design columns are points; insertion order is preserved.
//!
//! Conventions
//! -----------
//! - Hyperparameters travel through optimizers packed as `(a, b, r_1..r_d)`.
//! - Model fits return `OptResult`; purely model-level operations return
//!   `GpResult`.

pub mod btl;
pub mod covariance;
pub mod data;
pub mod errors;
pub mod export;
pub mod hyperparams;
pub mod kernel;
pub mod likelihood;
pub mod options;
pub mod posterior;
pub mod preference;
pub mod regressor;

pub use self::data::{Preference, PreferenceData};
pub use self::errors::{GpError, GpResult};
pub use self::hyperparams::{
    HyperPriors, KernelParams, LogNormalPrior, NOISE_FLOOR, PreferenceHyperparams,
};
pub use self::options::{GpFitOptions, PreferenceFitOptions};
pub use self::posterior::{Posterior, Regressor};
pub use self::preference::PreferenceRegressor;
pub use self::regressor::GaussianProcessRegressor;

pub mod prelude {
    pub use super::{
        GaussianProcessRegressor, GpError, GpFitOptions, GpResult, KernelParams, Preference,
        PreferenceData, PreferenceFitOptions, PreferenceHyperparams, PreferenceRegressor,
        Regressor,
    };
}
