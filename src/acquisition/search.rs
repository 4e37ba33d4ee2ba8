//! Maximizing expected improvement over the unit hypercube.
use ndarray::{Array1, ArrayView1};

use crate::acquisition::expected_improvement::ExpectedImprovement;
use crate::gp::{errors::GpResult, posterior::Regressor};
use crate::optimization::{
    errors::OptResult,
    two_phase::{SearchBounds, TwoPhaseOptions, TwoPhaseSearch},
};

/// Next query point: argmax of EI over `[0, 1]^d`.
///
/// A seeded particle swarm spends at most `opts.global_budget` evaluations,
/// initial scatter included, then L-BFGS polishes the best particle for up
/// to `opts.local_budget` iterations. Identical inputs and seed give the
/// identical point.
///
/// # Errors
/// - No data in `regressor` (EI needs an incumbent).
/// - Invalid budgets, or a swarm failure.
pub fn find_next_point<R: Regressor>(
    regressor: &R, opts: &TwoPhaseOptions, seed: u64,
) -> OptResult<Array1<f64>> {
    let ei = ExpectedImprovement::new(regressor)?;
    let bounds = SearchBounds::unit_cube(regressor.dim())?;
    let search = TwoPhaseSearch::swarm_lbfgs(*opts, seed);
    Ok(search.maximize(&ei, &bounds, None)?.x)
}

/// EI at a single point, independent of any search. A pure function of the
/// regressor state and `x`.
pub fn calc_acquisition_value<R: Regressor>(regressor: &R, x: ArrayView1<f64>) -> GpResult<f64> {
    ExpectedImprovement::new(regressor)?.value_at(x)
}
