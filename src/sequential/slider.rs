//! One-dimensional search subspace shown to the user.
use ndarray::Array1;

use crate::sequential::{
    enlargement::SliderEnlargement,
    errors::{SlsError, SlsResult},
};

/// Segment between two points. `orig_*` are the endpoints as proposed
/// (current maximizer, EI point); `end_*` are the endpoints actually
/// interpolated, equal to the originals unless the slider was enlarged.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    orig_0: Array1<f64>,
    orig_1: Array1<f64>,
    end_0: Array1<f64>,
    end_1: Array1<f64>,
}

impl Slider {
    pub fn new(orig_0: Array1<f64>, orig_1: Array1<f64>) -> Self {
        Self { end_0: orig_0.clone(), end_1: orig_1.clone(), orig_0, orig_1 }
    }

    /// Slider whose interpolated ends come from `enlargement`.
    pub fn enlarged(
        orig_0: Array1<f64>, orig_1: Array1<f64>, enlargement: &impl SliderEnlargement,
    ) -> Self {
        let (end_0, end_1) = enlargement.enlarge(&orig_0, &orig_1);
        Self { orig_0, orig_1, end_0, end_1 }
    }

    pub fn orig_0(&self) -> &Array1<f64> {
        &self.orig_0
    }

    pub fn orig_1(&self) -> &Array1<f64> {
        &self.orig_1
    }

    pub fn end_0(&self) -> &Array1<f64> {
        &self.end_0
    }

    pub fn end_1(&self) -> &Array1<f64> {
        &self.end_1
    }

    /// `(1 - t)·end_0 + t·end_1`.
    ///
    /// # Errors
    /// [`SlsError::InvalidSliderPosition`] unless `t` is finite and in
    /// `[0, 1]`.
    pub fn get_value(&self, t: f64) -> SlsResult<Array1<f64>> {
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(SlsError::InvalidSliderPosition { position: t });
        }
        Ok(&self.end_0 * (1.0 - t) + &self.end_1 * t)
    }
}
