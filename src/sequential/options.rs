//! Budgets and settings of the sequential line-search optimizer.
use crate::gp::{hyperparams::PreferenceHyperparams, options::PreferenceFitOptions};
use crate::sequential::errors::{SlsError, SlsResult};

/// Per-round budgets.
///
/// - `map_hyperparams`: evaluations (swarm) and iterations (joint L-BFGS)
///   for the preference model's hyperparameter MAP estimate.
/// - `acquisition_global`: EI evaluations for the swarm phase.
/// - `acquisition_local`: L-BFGS iterations polishing the EI maximizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudgets {
    pub map_hyperparams: usize,
    pub acquisition_global: usize,
    pub acquisition_local: usize,
}

impl SearchBudgets {
    /// # Errors
    /// [`SlsError::InvalidBudget`] for any zero budget.
    pub fn new(
        map_hyperparams: usize, acquisition_global: usize, acquisition_local: usize,
    ) -> SlsResult<Self> {
        for (name, b) in [
            ("hyperparameter MAP", map_hyperparams),
            ("global acquisition", acquisition_global),
            ("local acquisition", acquisition_local),
        ] {
            if b == 0 {
                return Err(SlsError::InvalidBudget { name });
            }
        }
        Ok(Self { map_hyperparams, acquisition_global, acquisition_local })
    }

    /// Dimension-scaled defaults: `(100, 50·dim, 10·dim)`.
    pub fn for_dimension(dim: usize) -> Self {
        let dim = dim.max(1);
        Self {
            map_hyperparams: PreferenceFitOptions::DEFAULT_MAP_BUDGET,
            acquisition_global: 50 * dim,
            acquisition_local: 10 * dim,
        }
    }
}

/// Optimizer-wide settings.
///
/// - `use_slider_enlargement`: enlarge each new slider before interpolation.
/// - `use_map_hyperparameters`: estimate kernel hyperparameters every round
///   instead of keeping `hyperparams`.
/// - `seed`: base seed; round `k` uses `seed + k` (wrapping) for every
///   randomized phase, so identical inputs replay identically.
/// - `latent_budget`: L-BFGS iterations for the latent-value stage.
/// - `verbose`: forwarded to the optimizers (logs only with `obs_slog`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlsOptions {
    pub use_slider_enlargement: bool,
    pub use_map_hyperparameters: bool,
    pub hyperparams: PreferenceHyperparams,
    pub seed: u64,
    pub latent_budget: usize,
    pub verbose: bool,
}

impl SlsOptions {
    pub fn new(use_slider_enlargement: bool, use_map_hyperparameters: bool) -> Self {
        Self { use_slider_enlargement, use_map_hyperparameters, ..Self::default() }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Default for SlsOptions {
    fn default() -> Self {
        Self {
            use_slider_enlargement: true,
            use_map_hyperparameters: true,
            hyperparams: PreferenceHyperparams::default(),
            seed: 0,
            latent_budget: PreferenceFitOptions::DEFAULT_LATENT_BUDGET,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Dimension-scaled defaults and zero-budget rejection.
    fn budgets_scale_with_dimension() {
        assert_eq!(SearchBudgets::for_dimension(3), SearchBudgets::new(100, 150, 30).unwrap());
        assert_eq!(
            SearchBudgets::new(10, 0, 5).unwrap_err(),
            SlsError::InvalidBudget { name: "global acquisition" }
        );
    }
}
