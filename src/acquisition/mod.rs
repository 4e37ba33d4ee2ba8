//! acquisition — expected improvement and the search for the next query.
//!
//! Purpose
//! -------
//! Turn a fitted [`Regressor`](crate::gp::Regressor) into the next point to
//! show: the maximizer of expected improvement over `[0, 1]^d`.
//!
//! Key behaviors
//! -------------
//! - [`ExpectedImprovement`] evaluates EI and its gradient with the
//!   incumbent mean `μ*` cached.
//! - [`find_next_point`] runs the two-phase search (seeded swarm, then
//!   L-BFGS) on EI.
//! - [`calc_acquisition_value`] evaluates EI at one point for inspection.
//!
//! Invariants & assumptions
//! ------------------------
//! - EI is never negative and is `0` where the posterior standard deviation
//!   is numerically zero.
//! - The regressor must hold at least one observation.

pub mod expected_improvement;
pub mod search;

pub use self::expected_improvement::{ExpectedImprovement, best_observed_mean};
pub use self::search::{calc_acquisition_value, find_next_point};
