//! Executor plumbing shared by every argmin run in the crate: the L-BFGS
//! runner behind [`maximize`](super::maximize) and the optional terminal
//! observer the particle swarm reuses.
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient, observers::ObserverMode};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Grad, LogDensity, MapOptions, OptimOutcome, Theta, adapter::ArgMinAdapter},
};

/// argmin state of every L-BFGS run.
type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Attach a non-blocking terminal slog observer when `verbose` is set and
/// the `obs_slog` feature is compiled in; otherwise return `executor`
/// unchanged.
pub(crate) fn attach_terminal_observer<O, S, I>(
    executor: Executor<O, S, I>, verbose: bool,
) -> Executor<O, S, I>
where
    S: Solver<O, I>,
    I: State,
{
    #[cfg(feature = "obs_slog")]
    if verbose {
        return executor
            .add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always);
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = verbose;
    executor
}

/// Run L-BFGS from `theta0` on a log density and report the best state.
///
/// `opts.tols.max_iter` caps the iterations; without it argmin's own cap
/// applies. With `obs_slog` and `opts.verbose`, `ℓ(θ₀)` and `‖∇ℓ(θ₀)‖` are
/// printed before the first iteration.
///
/// # Errors
/// - argmin runtime errors (line-search failures, cost-function errors)
///   through `From<argmin::core::Error>`.
/// - A missing or non-finite best point.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MapOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogDensity,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState>,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        report_start(&theta0, &problem)?;
    }
    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| match max_iter {
        Some(n) => state.param(theta0).max_iters(n as u64),
        None => state.param(theta0),
    });
    let result = attach_terminal_observer(executor, opts.verbose).run()?;
    outcome_from_state(result.state().clone())
}

/// Costs are `-ℓ`, so the reported value flips the sign back.
fn outcome_from_state(mut state: LbfgsState) -> OptResult<OptimOutcome> {
    let grad = state.take_gradient();
    let theta_hat = state.take_best_param();
    OptimOutcome::new(
        theta_hat,
        -state.get_best_cost(),
        state.get_termination_status().clone(),
        state.get_iter(),
        state.get_func_counts().clone(),
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn report_start<F: LogDensity>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()> {
    let ell = -problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => eprintln!("start: ell = {ell:.6}, |grad| = {:.6}", g.l2_norm()),
        Err(_) => eprintln!("start: ell = {ell:.6}"),
    }
    Ok(())
}
