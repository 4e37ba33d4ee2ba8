//! optimization — MAP optimizer, bounded two-phase search, numerical helpers,
//! and the unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical backend shared by every fitter in the crate: the
//! GP hyperparameter fit, the preference regressor's latent and
//! hyperparameter MAP estimates, and the expected-improvement search.
//! Callers describe an objective and a budget and never touch argmin
//! generics directly.
//!
//! Key behaviors
//! -------------
//! - `map_optimizer`: maximize an unconstrained log density `ℓ(θ)` with
//!   argmin L-BFGS (More–Thuente or Hager–Zhang line search), with
//!   finite-difference gradients when a model supplies none.
//! - `two_phase`: maximize over a finite box with a seeded particle swarm
//!   followed by L-BFGS refinement, behind the `GlobalSearch` /
//!   `LocalRefine` strategy traits.
//! - `numerical_stability`: logistic/logit, log-sum-exp and softmax
//!   without overflow, plus shared tolerances.
//! - `errors`: one enum, [`OptError`], with conversions from argmin and
//!   GP-model errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - All searches are budget-bounded. Running out of budget returns the best
//!   point found so far; it is not an error.
//! - Invalid configurations (tolerances, budgets, bounds) are rejected at
//!   construction time as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Everything maximizes. The sign flip to argmin's cost minimization
//!   happens in the adapters only.
//! - Vectors are `ndarray::Array1<f64>` (`Theta`, `Grad`).
//! - No I/O unless the `obs_slog` feature is enabled and a caller asks for
//!   verbose runs.
//!
//! Testing notes
//! -------------
//! - Each submodule unit-tests its own concern: option validation, sign
//!   conventions, toy concave solves, swarm reproducibility, box handling
//!   and the two-phase incumbent policy.

pub mod errors;
pub mod map_optimizer;
pub mod numerical_stability;
pub mod two_phase;

pub use self::errors::{OptError, OptResult};

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::map_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
    pub use super::two_phase::prelude::*;
}
