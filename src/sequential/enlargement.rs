//! Slider enlargement: stretch a segment around its midpoint, then clip it
//! back into the unit hypercube along its own direction.
use ndarray::Array1;

use crate::optimization::numerical_stability::GENERAL_TOL;
use crate::sequential::errors::{SlsError, SlsResult};

/// `(end_0, end_1) -> (enlarged_end_0, enlarged_end_1)`.
pub trait SliderEnlargement {
    fn enlarge(&self, end_0: &Array1<f64>, end_1: &Array1<f64>) -> (Array1<f64>, Array1<f64>);
}

/// Scale the segment by `scale` (but to no less than `minimum_length`),
/// keep the midpoint, and clip each end at the cube boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledEnlargement {
    pub scale: f64,
    pub minimum_length: f64,
}

impl ScaledEnlargement {
    pub const DEFAULT_SCALE: f64 = 1.25;
    pub const DEFAULT_MINIMUM_LENGTH: f64 = 0.25;

    /// # Errors
    /// `scale < 1` or a negative / non-finite minimum length.
    pub fn new(scale: f64, minimum_length: f64) -> SlsResult<Self> {
        if !scale.is_finite() || scale < 1.0 {
            return Err(SlsError::InvalidSliderSetting { name: "enlargement scale", value: scale });
        }
        if !minimum_length.is_finite() || minimum_length < 0.0 {
            return Err(SlsError::InvalidSliderSetting {
                name: "minimum slider length",
                value: minimum_length,
            });
        }
        Ok(Self { scale, minimum_length })
    }
}

impl Default for ScaledEnlargement {
    fn default() -> Self {
        Self { scale: Self::DEFAULT_SCALE, minimum_length: Self::DEFAULT_MINIMUM_LENGTH }
    }
}

/// Largest `t ≤ t_max` with `c + t·u` inside `[0, 1]^n`. `c` is inside.
fn reach_in_cube(c: &Array1<f64>, u: &Array1<f64>, t_max: f64) -> f64 {
    c.iter().zip(u.iter()).fold(t_max, |t, (&ci, &ui)| {
        if ui > GENERAL_TOL {
            t.min((1.0 - ci) / ui)
        } else if ui < -GENERAL_TOL {
            t.min(-ci / ui)
        } else {
            t
        }
    })
}

impl SliderEnlargement for ScaledEnlargement {
    fn enlarge(&self, end_0: &Array1<f64>, end_1: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let clamp = |v: Array1<f64>| v.mapv(|x| x.clamp(0.0, 1.0));
        let diff = end_1 - end_0;
        let length = diff.dot(&diff).sqrt();
        if length < GENERAL_TOL {
            return (clamp(end_0.clone()), clamp(end_1.clone()));
        }

        let u = diff / length;
        let c = clamp((end_0 + end_1) * 0.5);
        let half = 0.5 * (self.scale * length).max(self.minimum_length);
        let t_1 = reach_in_cube(&c, &u, half).max(0.0);
        let t_0 = reach_in_cube(&c, &(-&u), half).max(0.0);
        (clamp(&c - &(&u * t_0)), clamp(&c + &(&u * t_1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // An interior segment grows by the scale around its midpoint.
    fn interior_segment_scales_about_midpoint() {
        let (a, b) = ScaledEnlargement::default().enlarge(&array![0.4, 0.5], &array![0.6, 0.5]);
        assert_abs_diff_eq!(a[0], 0.375, epsilon = 1e-12);
        assert_abs_diff_eq!(b[0], 0.625, epsilon = 1e-12);
        assert_abs_diff_eq!(a[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Short segments are stretched to the minimum length; ends that would
    // leave the cube are clipped along the segment, keeping direction.
    fn short_segments_grow_and_clip_to_cube() {
        let e = ScaledEnlargement::default();
        let (a, b) = e.enlarge(&array![0.5, 0.5], &array![0.51, 0.5]);
        assert_abs_diff_eq!(b[0] - a[0], 0.25, epsilon = 1e-12);

        let (a, b) = e.enlarge(&array![0.1, 0.9], &array![0.9, 0.1]);
        for v in a.iter().chain(b.iter()) {
            assert!((0.0..=1.0).contains(v));
        }
        assert_abs_diff_eq!(a[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn scale_below_one_is_rejected() {
        assert!(ScaledEnlargement::new(0.9, 0.1).is_err());
        assert!(ScaledEnlargement::new(1.5, -0.1).is_err());
    }
}
