//! Strategy interfaces for bounded two-phase maximization.
use crate::optimization::{
    errors::{OptError, OptResult},
    map_optimizer::{Grad, Theta},
    two_phase::bounds::{SearchBounds, SearchPoint},
};

/// An objective maximized over a [`SearchBounds`] box.
///
/// `grad` is optional; local refinement falls back to finite differences
/// when it returns [`OptError::GradientNotImplemented`].
pub trait BoxObjective {
    fn value(&self, x: &Theta) -> OptResult<f64>;

    fn grad(&self, _x: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Derivative-free search over the whole box.
///
/// `budget` counts objective evaluations.
pub trait GlobalSearch {
    fn search<O: BoxObjective>(
        &self, objective: &O, bounds: &SearchBounds, budget: usize,
    ) -> OptResult<SearchPoint>;
}

/// Gradient-based polishing of a single start point.
///
/// `budget` counts solver iterations. The returned point lies in the box.
pub trait LocalRefine {
    fn refine<O: BoxObjective>(
        &self, objective: &O, bounds: &SearchBounds, start: &Theta, budget: usize,
    ) -> OptResult<SearchPoint>;
}

/// Closure-backed [`BoxObjective`]: a value function and, optionally, its
/// gradient.
pub struct FnObjective<V, G> {
    value_fn: V,
    grad_fn: Option<G>,
}

impl<V> FnObjective<V, fn(&Theta) -> OptResult<Grad>>
where
    V: Fn(&Theta) -> OptResult<f64>,
{
    pub fn value_only(value_fn: V) -> Self {
        Self { value_fn, grad_fn: None }
    }
}

impl<V, G> FnObjective<V, G>
where
    V: Fn(&Theta) -> OptResult<f64>,
    G: Fn(&Theta) -> OptResult<Grad>,
{
    pub fn new(value_fn: V, grad_fn: G) -> Self {
        Self { value_fn, grad_fn: Some(grad_fn) }
    }
}

impl<V, G> BoxObjective for FnObjective<V, G>
where
    V: Fn(&Theta) -> OptResult<f64>,
    G: Fn(&Theta) -> OptResult<Grad>,
{
    fn value(&self, x: &Theta) -> OptResult<f64> {
        (self.value_fn)(x)
    }

    fn grad(&self, x: &Theta) -> OptResult<Grad> {
        match &self.grad_fn {
            Some(g) => g(x),
            None => Err(OptError::GradientNotImplemented),
        }
    }
}
