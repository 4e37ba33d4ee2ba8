//! numerical_stability — guarded transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the numerically stable scalar and vector transforms used by the
//! optimizers and the preference model, together with the small tolerances
//! that every layer should agree on.
//!
//! Key behaviors
//! -------------
//! - `safe_logistic` / `safe_logit` map between unconstrained reals and the
//!   open unit interval; the two-phase local refinement uses them to express
//!   a finite box as an unconstrained problem.
//! - `log_sum_exp` / `safe_softmax` evaluate choice probabilities without
//!   overflow for large `|f| / scale`.
//! - `LOGIT_EPS` and `GENERAL_TOL` are the shared clamps.
//!
//! Conventions
//! -----------
//! - Pure functions over `f64` and `ndarray` views; no I/O, no state.
//! - Inputs are assumed finite; validation happens in the calling layer.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against naïve formulas on safe
//!   grids and check tail behavior, mass conservation and shift invariance.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    GENERAL_TOL, LOGIT_EPS, log_sum_exp, safe_logistic, safe_logit, safe_softmax,
};

pub mod prelude {
    pub use super::transformations::{
        GENERAL_TOL, LOGIT_EPS, log_sum_exp, safe_logistic, safe_logit, safe_softmax,
    };
}
