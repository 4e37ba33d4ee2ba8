//! Particle-swarm global search backed by argmin's `ParticleSwarm`.
use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::particleswarm::ParticleSwarm;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::optimization::{
    errors::OptResult,
    map_optimizer::{Theta, run::attach_terminal_observer},
    two_phase::{
        bounds::{SearchBounds, SearchPoint},
        options::SwarmOptions,
        traits::{BoxObjective, GlobalSearch},
    },
};

/// Cost reported for points where the objective fails or is not finite.
///
/// The swarm only compares costs, so a large finite value keeps such points
/// out of the incumbent without aborting the run.
const PENALTY_COST: f64 = 1e100;

/// Derivative-free global phase.
///
/// argmin's swarm evaluates every particle once at initialization and once
/// per iteration, so a budget `B` buys `B / num_particles - 1` iterations.
/// Budgets below two swarms' worth stop after the initial scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwarmSearch {
    pub options: SwarmOptions,
}

impl SwarmSearch {
    pub fn new(options: SwarmOptions) -> Self {
        Self { options }
    }

    fn plan(&self, budget: usize) -> (usize, u64) {
        let particles = self.options.num_particles.min(budget).max(2);
        let iterations = (budget / particles).saturating_sub(1);
        (particles, iterations as u64)
    }
}

struct SwarmCost<'a, O> {
    objective: &'a O,
    bounds: &'a SearchBounds,
}

impl<'a, O: BoxObjective> CostFunction for SwarmCost<'a, O> {
    type Param = Theta;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let x = self.bounds.clamp(x);
        Ok(match self.objective.value(&x) {
            Ok(v) if v.is_finite() => -v,
            _ => PENALTY_COST,
        })
    }
}

impl GlobalSearch for SwarmSearch {
    /// Run the swarm and return the best particle, projected into the box
    /// and re-evaluated so the reported value is the objective itself.
    ///
    /// # Errors
    /// - argmin errors from the swarm run.
    /// - The objective's error at the best particle (all particles failed).
    fn search<O: BoxObjective>(
        &self, objective: &O, bounds: &SearchBounds, budget: usize,
    ) -> OptResult<SearchPoint> {
        let (particles, iterations) = self.plan(budget);
        let solver = ParticleSwarm::new((bounds.lower().clone(), bounds.upper().clone()), particles)
            .with_rng_generator(Xoshiro256PlusPlus::seed_from_u64(self.options.seed));
        let problem = SwarmCost { objective, bounds };

        let executor =
            Executor::new(problem, solver).configure(|state| state.max_iters(iterations));
        let result = attach_terminal_observer(executor, self.options.verbose).run()?;

        let best = result
            .state()
            .get_best_param()
            .map(|particle| bounds.clamp(&particle.position))
            .unwrap_or_else(|| bounds.clamp(&(0.5 * (bounds.lower() + bounds.upper()))));
        let value = objective.value(&best)?;
        Ok(SearchPoint::new(best, value))
    }
}
