//! map_optimizer — argmin-powered maximizer for log densities.
//!
//! Purpose
//! -------
//! Maximize smooth log densities `ℓ(θ)` (log marginal likelihoods,
//! log posteriors, log acquisition surfaces) with L-BFGS. Callers implement
//! [`LogDensity`] and call [`maximize`] with a starting point and a
//! validated [`MapOptions`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)` and flips the sign of analytic gradients. Models that
//!   do not provide a gradient fall back to `finitediff` central (then
//!   forward) differences of the cost.
//! - [`maximize`] validates the start with [`LogDensity::check`], builds an
//!   L-BFGS solver for the configured [`traits::LineSearcher`] and delegates
//!   to [`run::run_lbfgs`].
//! - [`OptimOutcome`] reports the best point, `ℓ(θ̂)`, the termination
//!   status and argmin's evaluation counters.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are unconstrained `Theta` vectors. Box constraints are the
//!   caller's business (see `two_phase::LbfgsRefine`, which reparametrizes
//!   through a logistic map).
//! - [`LogDensity::value`] and [`LogDensity::grad`] report invalid inputs as
//!   [`OptError`] values; the optimizer never panics on them.
//! - [`Tolerances`] and [`MapOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - User-facing values are in `ℓ` space; only the adapter sees costs.
//! - Errors bubble up as [`OptResult<T>`]; argmin errors are converted
//!   through `From<argmin::core::Error>`.
//!
//! Testing notes
//! -------------
//! - [`builders`] tests solver construction for both line searches.
//! - [`api`] tests full solves on concave toy densities, including the
//!   finite-difference fallback.
//! - [`traits`] tests option validation and line-search parsing.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogDensity, MapOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogDensity, MapOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
