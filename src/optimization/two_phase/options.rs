//! Configuration for the global swarm and the two-phase driver.
use crate::optimization::errors::{OptError, OptResult};

/// Particle-swarm settings.
///
/// The seed makes the global phase reproducible: identical objective,
/// bounds, budget and seed give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwarmOptions {
    pub num_particles: usize,
    pub seed: u64,
    pub verbose: bool,
}

impl SwarmOptions {
    pub const DEFAULT_PARTICLES: usize = 20;

    pub fn new(num_particles: usize, seed: u64, verbose: bool) -> OptResult<Self> {
        if num_particles < 2 {
            return Err(OptError::InvalidParticleCount { count: num_particles });
        }
        Ok(Self { num_particles, seed, verbose })
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self { num_particles: Self::DEFAULT_PARTICLES, seed: 0, verbose: false }
    }
}

/// Budgets for one two-phase run.
///
/// - `global_budget`: objective evaluations for the derivative-free phase.
/// - `local_budget`: L-BFGS iterations for the refinement phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPhaseOptions {
    pub global_budget: usize,
    pub local_budget: usize,
    pub verbose: bool,
}

impl TwoPhaseOptions {
    pub fn new(global_budget: usize, local_budget: usize, verbose: bool) -> OptResult<Self> {
        if global_budget == 0 {
            return Err(OptError::InvalidBudget {
                budget: global_budget,
                reason: "Global search needs at least one evaluation.",
            });
        }
        if local_budget == 0 {
            return Err(OptError::InvalidBudget {
                budget: local_budget,
                reason: "Local refinement needs at least one iteration.",
            });
        }
        Ok(Self { global_budget, local_budget, verbose })
    }
}
