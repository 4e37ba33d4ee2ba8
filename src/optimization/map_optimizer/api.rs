//! High-level entry point for maximizing a [`LogDensity`].
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogDensity, MapOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS starting from `theta0`.
///
/// Validates the start with `f.check`, wraps `(f, data)` in an
/// [`ArgMinAdapter`], builds the solver for `opts.line_searcher` and runs it
/// for at most `opts.tols.max_iter` iterations.
///
/// # Errors
/// - Anything `f.check` rejects.
/// - Solver construction and runtime errors (e.g. a failed line search).
///
/// # Example
/// ```
/// use ndarray::{array, Array1};
/// use sequential_line_search::optimization::errors::OptResult;
/// use sequential_line_search::optimization::map_optimizer::{maximize, LogDensity, MapOptions};
///
/// struct Bowl;
/// impl LogDensity for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Array1<f64>, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Array1<f64>, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MapOptions::default())?;
/// assert!(out.value > -1e-8);
/// # Ok::<(), sequential_line_search::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogDensity>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MapOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
