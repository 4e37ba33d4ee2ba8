//! Global-then-local driver.
use crate::optimization::{
    errors::OptResult,
    map_optimizer::Theta,
    two_phase::{
        bounds::{SearchBounds, SearchPoint},
        local::LbfgsRefine,
        options::{SwarmOptions, TwoPhaseOptions},
        swarm::SwarmSearch,
        traits::{BoxObjective, GlobalSearch, LocalRefine},
    },
};

/// Runs a [`GlobalSearch`] over the box, then polishes the best candidate
/// with a [`LocalRefine`].
///
/// Policy:
/// - The optional start point is evaluated and competes with the global
///   candidate; the start wins ties.
/// - The local result replaces the incumbent only if it is strictly better.
/// - A failing local phase is not an error: the incumbent is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPhaseSearch<G = SwarmSearch, L = LbfgsRefine> {
    pub global: G,
    pub local: L,
    pub options: TwoPhaseOptions,
}

impl TwoPhaseSearch<SwarmSearch, LbfgsRefine> {
    /// Particle swarm followed by L-BFGS, both seeded/configured from the
    /// arguments.
    pub fn swarm_lbfgs(options: TwoPhaseOptions, seed: u64) -> Self {
        let swarm = SwarmOptions { seed, verbose: options.verbose, ..SwarmOptions::default() };
        Self {
            global: SwarmSearch::new(swarm),
            local: LbfgsRefine::new(options.verbose),
            options,
        }
    }
}

impl<G: GlobalSearch, L: LocalRefine> TwoPhaseSearch<G, L> {
    pub fn new(global: G, local: L, options: TwoPhaseOptions) -> Self {
        Self { global, local, options }
    }

    /// # Errors
    /// - `start` with the wrong dimension.
    /// - Global-phase failures, and the objective's error at `start`.
    pub fn maximize<O: BoxObjective>(
        &self, objective: &O, bounds: &SearchBounds, start: Option<&Theta>,
    ) -> OptResult<SearchPoint> {
        let incumbent = match start {
            Some(x0) => {
                bounds.check_point(x0)?;
                let x0 = bounds.clamp(x0);
                let v0 = objective.value(&x0)?;
                Some(SearchPoint::new(x0, v0))
            }
            None => None,
        };
        let global = self.global.search(objective, bounds, self.options.global_budget)?;
        let best = match incumbent {
            Some(p) => p.better(global),
            None => global,
        };

        match self.local.refine(objective, bounds, &best.x, self.options.local_budget) {
            Ok(polished) if polished.value.is_finite() && polished.value > best.value => {
                Ok(polished)
            }
            _ => Ok(best),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptError, two_phase::traits::FnObjective};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Two bumps on [0, 1]: a wide low one at 0.2 and a narrower high one
    /// at 0.8.
    fn two_bumps(x: &Theta) -> f64 {
        0.3 * (-((x[0] - 0.2) / 0.15).powi(2)).exp() + (-((x[0] - 0.8) / 0.1).powi(2)).exp()
    }

    fn two_bumps_grad(x: &Theta) -> Theta {
        let a = 0.3 * (-((x[0] - 0.2) / 0.15).powi(2)).exp() * (-2.0 * (x[0] - 0.2) / 0.0225);
        let b = (-((x[0] - 0.8) / 0.1).powi(2)).exp() * (-2.0 * (x[0] - 0.8) / 0.01);
        array![a + b]
    }

    struct Failing;

    impl LocalRefine for Failing {
        fn refine<O: BoxObjective>(
            &self, _objective: &O, _bounds: &SearchBounds, _start: &Theta, _budget: usize,
        ) -> OptResult<SearchPoint> {
            Err(OptError::ConditionViolated { text: "line search".to_string() })
        }
    }

    #[test]
    // Purpose
    // -------
    // A local start in the wrong basin does not trap the search: the global
    // phase finds the higher bump and L-BFGS polishes it.
    //
    // Given
    // -----
    // - Start at 0.2 (top of the low bump), 400 global evaluations.
    //
    // Expect
    // ------
    // - x̂ ≈ 0.8, f(x̂) ≈ 1.
    fn two_phase_escapes_local_basin() {
        let objective =
            FnObjective::new(|x: &Theta| Ok(two_bumps(x)), |x: &Theta| Ok(two_bumps_grad(x)));
        let bounds = SearchBounds::unit_cube(1).unwrap();
        let search =
            TwoPhaseSearch::swarm_lbfgs(TwoPhaseOptions::new(400, 100, false).unwrap(), 3);

        let best = search.maximize(&objective, &bounds, Some(&array![0.2])).unwrap();

        assert_abs_diff_eq!(best.x[0], 0.8, epsilon = 1e-3);
        assert_abs_diff_eq!(best.value, 1.0, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // A failing local phase falls back to the best of start and global
    // candidate instead of erroring.
    fn failing_local_phase_keeps_global_candidate() {
        let objective = FnObjective::value_only(|x: &Theta| Ok(-(x[0] - 0.4).abs()));
        let bounds = SearchBounds::unit_cube(1).unwrap();
        let search = TwoPhaseSearch::new(
            SwarmSearch::default(),
            Failing,
            TwoPhaseOptions::new(100, 10, false).unwrap(),
        );

        let best = search.maximize(&objective, &bounds, None).unwrap();

        assert!(best.value > -0.05);
    }

    #[test]
    // Purpose
    // -------
    // A start point of the wrong length is rejected up front.
    fn start_point_dimension_is_checked() {
        let objective = FnObjective::value_only(|x: &Theta| Ok(x.sum()));
        let bounds = SearchBounds::unit_cube(2).unwrap();
        let search = TwoPhaseSearch::swarm_lbfgs(TwoPhaseOptions::new(10, 10, false).unwrap(), 0);

        let err = search.maximize(&objective, &bounds, Some(&array![0.5])).unwrap_err();

        assert_eq!(err, OptError::PointDimMismatch { expected: 2, found: 1 });
    }
}
