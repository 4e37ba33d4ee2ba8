//! L-BFGS local refinement inside a box.
//!
//! The box is removed by reparametrization: each coordinate is written as
//! `x_i = lo_i + w_i σ(θ_i)` with `w_i = hi_i - lo_i` and `σ` the logistic
//! function, and L-BFGS runs on the unconstrained `θ`. The chain rule gives
//! `∂/∂θ_i = w_i σ(θ_i)(1 - σ(θ_i)) ∂/∂x_i`.
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Cost, Grad, LogDensity, MapOptions, Theta, maximize},
    numerical_stability::{safe_logistic, safe_logit},
    two_phase::{
        bounds::{SearchBounds, SearchPoint},
        traits::{BoxObjective, LocalRefine},
    },
};

/// Gradient-based refinement through the logistic box transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LbfgsRefine {
    pub verbose: bool,
}

impl LbfgsRefine {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// Unconstrained view of a [`BoxObjective`].
struct LogisticBox<'a, O> {
    objective: &'a O,
}

pub(crate) fn to_box(theta: &Theta, bounds: &SearchBounds) -> Theta {
    let mut x = bounds.lower().clone();
    for ((xi, &t), &w) in x.iter_mut().zip(theta.iter()).zip(bounds.width().iter()) {
        *xi += w * safe_logistic(t);
    }
    x
}

pub(crate) fn from_box(x: &Theta, bounds: &SearchBounds) -> Theta {
    let unit = (x - bounds.lower()) / &bounds.width();
    unit.mapv(safe_logit)
}

impl<'a, O: BoxObjective> LogDensity for LogisticBox<'a, O> {
    type Data = SearchBounds;

    fn value(&self, theta: &Theta, bounds: &SearchBounds) -> OptResult<Cost> {
        self.objective.value(&to_box(theta, bounds))
    }

    fn check(&self, theta: &Theta, bounds: &SearchBounds) -> OptResult<()> {
        bounds.check_point(theta)
    }

    fn grad(&self, theta: &Theta, bounds: &SearchBounds) -> OptResult<Grad> {
        let mut g = self.objective.grad(&to_box(theta, bounds))?;
        for ((gi, &t), &w) in g.iter_mut().zip(theta.iter()).zip(bounds.width().iter()) {
            let s = safe_logistic(t);
            *gi *= w * s * (1.0 - s);
        }
        Ok(g)
    }
}

impl LocalRefine for LbfgsRefine {
    /// # Errors
    /// - `start` of the wrong length.
    /// - Solver failures (e.g. a line search that cannot make progress).
    fn refine<O: BoxObjective>(
        &self, objective: &O, bounds: &SearchBounds, start: &Theta, budget: usize,
    ) -> OptResult<SearchPoint> {
        bounds.check_point(start)?;
        let theta0 = from_box(&bounds.clamp(start), bounds);
        let opts = MapOptions::with_max_iter(budget, self.verbose)?;
        let outcome = maximize(&LogisticBox { objective }, theta0, bounds, &opts)?;
        let x = bounds.clamp(&to_box(&outcome.theta_hat, bounds));
        Ok(SearchPoint::new(x, outcome.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::two_phase::traits::FnObjective;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The box transform and its inverse agree in the interior.
    fn box_transform_round_trips_interior_points() {
        let bounds = SearchBounds::new(array![1e-8, -2.0], array![50.0, 3.0]).unwrap();
        let x = array![0.5, 1.25];

        let back = to_box(&from_box(&x, &bounds), &bounds);

        assert_abs_diff_eq!(back[0], 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(back[1], 1.25, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // An interior maximum is found from a distant start.
    //
    // Given
    // -----
    // - f(x) = -(x0 - 0.2)² - 4(x1 - 0.6)² with its analytic gradient.
    //
    // Expect
    // ------
    // - x̂ ≈ (0.2, 0.6).
    fn refine_finds_interior_maximum() {
        let objective = FnObjective::new(
            |x: &Theta| Ok(-(x[0] - 0.2).powi(2) - 4.0 * (x[1] - 0.6).powi(2)),
            |x: &Theta| Ok(array![-2.0 * (x[0] - 0.2), -8.0 * (x[1] - 0.6)]),
        );
        let bounds = SearchBounds::unit_cube(2).unwrap();

        let p = LbfgsRefine::default().refine(&objective, &bounds, &array![0.9, 0.1], 200).unwrap();

        assert_abs_diff_eq!(p.x[0], 0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(p.x[1], 0.6, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // A maximum outside the box is pushed against the nearest face and the
    // result never leaves the box.
    fn refine_respects_box_for_exterior_maximum() {
        let objective = FnObjective::new(|x: &Theta| Ok(x[0]), |_x: &Theta| Ok(array![1.0]));
        let bounds = SearchBounds::unit_cube(1).unwrap();

        let p = LbfgsRefine::default().refine(&objective, &bounds, &array![0.5], 100).unwrap();

        assert!(bounds.contains(&p.x));
        assert!(p.x[0] > 0.99);
    }
}
