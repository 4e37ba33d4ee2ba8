//! The sequential line-search loop.
//!
//! State
//! -----
//! - No data: no regressor; preference and EI queries return `0.0`.
//! - Active: a preference regressor fitted on all submissions so far.
//!
//! Each [`submit_line_search_result`](SequentialLineSearchOptimizer::submit_line_search_result)
//! records "the chosen slider point beats both current slider ends",
//! refits from scratch, and replaces the slider with
//! `(arg-max of latent values, EI maximizer)`. The call either completes
//! and advances the round, or fails and leaves every piece of state as it
//! was.
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};

use crate::acquisition::{calc_acquisition_value, find_next_point};
use crate::gp::{
    data::PreferenceData, hyperparams::PreferenceHyperparams, options::PreferenceFitOptions,
    posterior::Regressor, preference::PreferenceRegressor,
};
use crate::optimization::two_phase::TwoPhaseOptions;
use crate::sequential::{
    enlargement::{ScaledEnlargement, SliderEnlargement},
    errors::{SlsError, SlsResult},
    options::{SearchBudgets, SlsOptions},
    slider::Slider,
};

#[derive(Debug, Clone)]
pub struct SequentialLineSearchOptimizer<E = ScaledEnlargement> {
    dim: usize,
    options: SlsOptions,
    enlargement: E,
    data: PreferenceData,
    regressor: Option<PreferenceRegressor>,
    slider: Slider,
    round: u64,
}

impl SequentialLineSearchOptimizer<ScaledEnlargement> {
    /// Optimizer over `[0, 1]^dim` with the default enlargement.
    ///
    /// `generator` supplies the first slider's ends, e.g.
    /// [`uniform_random_pair`](crate::sequential::uniform_random_pair).
    ///
    /// # Errors
    /// - [`SlsError::ZeroDimension`].
    /// - [`SlsError::EndpointDimMismatch`] when the generator returns vectors
    ///   of the wrong length.
    pub fn new(
        dim: usize, options: SlsOptions,
        generator: impl FnOnce(usize) -> (Array1<f64>, Array1<f64>),
    ) -> SlsResult<Self> {
        Self::with_enlargement(dim, options, ScaledEnlargement::default(), generator)
    }
}

impl<E: SliderEnlargement> SequentialLineSearchOptimizer<E> {
    pub fn with_enlargement(
        dim: usize, options: SlsOptions, enlargement: E,
        generator: impl FnOnce(usize) -> (Array1<f64>, Array1<f64>),
    ) -> SlsResult<Self> {
        if dim == 0 {
            return Err(SlsError::ZeroDimension);
        }
        let (a, b) = generator(dim);
        for end in [&a, &b] {
            if end.len() != dim {
                return Err(SlsError::EndpointDimMismatch { expected: dim, found: end.len() });
            }
        }
        Ok(Self {
            dim,
            options,
            enlargement,
            data: PreferenceData::new(dim),
            regressor: None,
            slider: Slider::new(a, b),
            round: 0,
        })
    }

    /// Replace the kernel defaults (and prior centres) used from the next
    /// submission on.
    pub fn set_hyperparameters(
        &mut self, a: f64, r: f64, b: f64, variance: f64, btl_scale: f64,
    ) -> SlsResult<()> {
        self.options.hyperparams = PreferenceHyperparams::new(a, r, b, variance, btl_scale)?;
        Ok(())
    }

    /// Submit with [`SearchBudgets::for_dimension`] budgets.
    pub fn submit_line_search_result(&mut self, slider_position: f64) -> SlsResult<()> {
        self.submit_line_search_result_with_budgets(
            slider_position,
            SearchBudgets::for_dimension(self.dim),
        )
    }

    /// Record the user's choice at `slider_position` and advance one round.
    ///
    /// # Errors
    /// - [`SlsError::InvalidSliderPosition`].
    /// - Model or optimizer failures; the optimizer state is unchanged.
    pub fn submit_line_search_result_with_budgets(
        &mut self, slider_position: f64, budgets: SearchBudgets,
    ) -> SlsResult<()> {
        let chosen = self.slider.get_value(slider_position)?;
        let others = [self.slider.orig_0().clone(), self.slider.orig_1().clone()];
        let mut data = self.data.clone();
        data.add_new_points(chosen.view(), &others, true)?;

        let seed = self.options.seed.wrapping_add(self.round);
        let fit_opts = PreferenceFitOptions::new(
            self.options.use_map_hyperparameters,
            budgets.map_hyperparams,
            self.options.latent_budget,
            seed,
            self.options.verbose,
        )?;
        let regressor = PreferenceRegressor::fit(data, self.options.hyperparams, &fit_opts)?;

        let x_max = regressor.find_arg_max()?;
        let search = TwoPhaseOptions::new(
            budgets.acquisition_global,
            budgets.acquisition_local,
            self.options.verbose,
        )?;
        let x_ei = find_next_point(&regressor, &search, seed)?;

        let slider = if self.options.use_slider_enlargement {
            Slider::enlarged(x_max, x_ei, &self.enlargement)
        } else {
            Slider::new(x_max, x_ei)
        };

        self.data = regressor.data().clone();
        self.regressor = Some(regressor);
        self.slider = slider;
        self.round += 1;
        Ok(())
    }

    /// Interpolated ends of the current slider.
    pub fn get_slider_ends(&self) -> (&Array1<f64>, &Array1<f64>) {
        (self.slider.end_0(), self.slider.end_1())
    }

    pub fn get_parameters(&self, slider_position: f64) -> SlsResult<Array1<f64>> {
        self.slider.get_value(slider_position)
    }

    /// Best point found so far: the slider's (unenlarged) first end.
    pub fn get_maximizer(&self) -> &Array1<f64> {
        self.slider.orig_0()
    }

    /// Posterior mean of the latent preference at `x`; `0.0` before any
    /// submission.
    pub fn get_preference_value_mean(&self, x: ArrayView1<f64>) -> SlsResult<f64> {
        match &self.regressor {
            Some(r) => Ok(r.predict_mu(x)?),
            None => Ok(0.0),
        }
    }

    /// Posterior standard deviation at `x`; `0.0` before any submission.
    pub fn get_preference_value_stdev(&self, x: ArrayView1<f64>) -> SlsResult<f64> {
        match &self.regressor {
            Some(r) => Ok(r.predict_sigma(x)?),
            None => Ok(0.0),
        }
    }

    /// Expected improvement at `x`; `0.0` before any submission.
    pub fn get_expected_improvement_value(&self, x: ArrayView1<f64>) -> SlsResult<f64> {
        match &self.regressor {
            Some(r) => Ok(calc_acquisition_value(r, x)?),
            None => Ok(0.0),
        }
    }

    /// All points seen so far as a `d × N` matrix, in first-seen order.
    pub fn get_raw_data_points(&self) -> &Array2<f64> {
        self.data.x()
    }

    /// Write `X.csv` and `D.csv` into `dir`. Does nothing before the first
    /// submission.
    pub fn dump_data(&self, dir: impl AsRef<Path>) -> SlsResult<()> {
        match &self.regressor {
            Some(r) => Ok(r.dump_data(dir)?),
            None => Ok(()),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Completed submissions.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn options(&self) -> &SlsOptions {
        &self.options
    }

    pub fn regressor(&self) -> Option<&PreferenceRegressor> {
        self.regressor.as_ref()
    }

    pub fn data(&self) -> &PreferenceData {
        &self.data
    }
}
