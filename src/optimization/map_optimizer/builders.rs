//! L-BFGS solver construction.
//!
//! The builders apply crate-level options (memory size, gradient and cost
//! tolerances) and leave the initial point and iteration cap to the runner.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    map_optimizer::{
        traits::MapOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, memory `opts.lbfgs_mem` (or
/// [`DEFAULT_LBFGS_MEM`]) and the tolerances in `opts.tols`.
pub fn build_optimizer_hager_zhang(opts: &MapOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search; see [`build_optimizer_hager_zhang`].
pub fn build_optimizer_more_thuente(opts: &MapOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient and cost tolerances to any L-BFGS variant.
///
/// Absent tolerances keep argmin's defaults.
///
/// # Errors
/// Tolerances rejected by argmin surface as [`OptError`] through
/// `From<argmin::core::Error>`.
///
/// [`OptError`]: crate::optimization::errors::OptError
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MapOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::map_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction of both L-BFGS variants with default and explicit memory,
    // and tolerance wiring via `configure_lbfgs`. Full solves are covered in
    // `api`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders succeed with default memory and full tolerances.
    fn builders_succeed_with_default_memory() {
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();
        let hz = MapOptions::new(tols, LineSearcher::HagerZhang, false, None).unwrap();
        let mt = MapOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // An explicit memory size is accepted.
    fn builders_respect_explicit_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).unwrap();
        let opts = MapOptions::new(tols, LineSearcher::HagerZhang, false, Some(11)).unwrap();

        assert!(build_optimizer_hager_zhang(&opts).is_ok());
        assert!(build_optimizer_more_thuente(&opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // With only an iteration cap, `configure_lbfgs` leaves argmin's defaults
    // in place.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MapOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        assert!(configure_lbfgs(raw, &opts).is_ok());
    }
}
