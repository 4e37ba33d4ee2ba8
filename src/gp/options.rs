//! Fit configuration for the GP and preference regressors.
use crate::optimization::errors::{OptError, OptResult};

/// Two-phase MAP fit of GP hyperparameters.
///
/// Defaults: 300 global evaluations, 1000 local iterations, seed 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpFitOptions {
    pub global_budget: usize,
    pub local_budget: usize,
    pub seed: u64,
    pub verbose: bool,
}

impl Default for GpFitOptions {
    fn default() -> Self {
        Self { global_budget: 300, local_budget: 1000, seed: 0, verbose: false }
    }
}

/// Latent-value and (optionally) hyperparameter MAP fit of the preference
/// regressor.
///
/// - `estimate_hyperparams`: when `false` only the latent values are fitted
///   and the kernel keeps the caller's defaults.
/// - `map_budget`: evaluation budget of the hyperparameter swarm and
///   iteration budget of the joint refinement.
/// - `latent_budget`: L-BFGS iterations for the latent-only stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceFitOptions {
    pub estimate_hyperparams: bool,
    pub map_budget: usize,
    pub latent_budget: usize,
    pub seed: u64,
    pub verbose: bool,
}

impl PreferenceFitOptions {
    pub const DEFAULT_MAP_BUDGET: usize = 100;
    pub const DEFAULT_LATENT_BUDGET: usize = 500;

    pub fn new(
        estimate_hyperparams: bool, map_budget: usize, latent_budget: usize, seed: u64,
        verbose: bool,
    ) -> OptResult<Self> {
        if map_budget == 0 {
            return Err(OptError::InvalidBudget {
                budget: 0,
                reason: "Hyperparameter MAP budget must be positive.",
            });
        }
        if latent_budget == 0 {
            return Err(OptError::InvalidBudget {
                budget: 0,
                reason: "Latent-value iteration budget must be positive.",
            });
        }
        Ok(Self { estimate_hyperparams, map_budget, latent_budget, seed, verbose })
    }
}

impl Default for PreferenceFitOptions {
    fn default() -> Self {
        Self {
            estimate_hyperparams: true,
            map_budget: Self::DEFAULT_MAP_BUDGET,
            latent_budget: Self::DEFAULT_LATENT_BUDGET,
            seed: 0,
            verbose: false,
        }
    }
}
