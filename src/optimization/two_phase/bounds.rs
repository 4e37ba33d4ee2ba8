//! Finite search boxes and the points found inside them.
use ndarray::Array1;

use crate::optimization::{
    errors::{OptError, OptResult},
    map_optimizer::Theta,
};

/// An axis-aligned box `[lower_i, upper_i]` with `lower_i < upper_i`, all
/// finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBounds {
    lower: Theta,
    upper: Theta,
}

impl SearchBounds {
    /// Validated constructor.
    ///
    /// # Errors
    /// - [`OptError::BoundsDimMismatch`] when the vectors differ in length.
    /// - [`OptError::InvalidBounds`] for an empty box, a non-finite bound, or
    ///   `lower_i >= upper_i`.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::BoundsDimMismatch { lower: lower.len(), upper: upper.len() });
        }
        if lower.is_empty() {
            return Err(OptError::InvalidBounds {
                index: 0,
                lower: f64::NAN,
                upper: f64::NAN,
                reason: "Search box must have at least one dimension.",
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(OptError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                    reason: "Bounds must be finite.",
                });
            }
            if lo >= hi {
                return Err(OptError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                    reason: "Lower bound must be strictly below upper bound.",
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// The same interval `[lo, hi]` in every one of `dim` coordinates.
    pub fn uniform(dim: usize, lo: f64, hi: f64) -> OptResult<Self> {
        Self::new(Array1::from_elem(dim, lo), Array1::from_elem(dim, hi))
    }

    /// `[0, 1]^dim`.
    pub fn unit_cube(dim: usize) -> OptResult<Self> {
        Self::uniform(dim, 0.0, 1.0)
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    pub fn width(&self) -> Theta {
        &self.upper - &self.lower
    }

    pub fn contains(&self, x: &Theta) -> bool {
        x.len() == self.dim()
            && x.iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }

    /// Project `x` onto the box coordinate-wise. Non-finite coordinates are
    /// sent to the box midpoint.
    pub fn clamp(&self, x: &Theta) -> Theta {
        let mut out = x.clone();
        for ((v, &lo), &hi) in out.iter_mut().zip(self.lower.iter()).zip(self.upper.iter()) {
            *v = if v.is_finite() { v.clamp(lo, hi) } else { 0.5 * (lo + hi) };
        }
        out
    }

    pub(crate) fn check_point(&self, x: &Theta) -> OptResult<()> {
        if x.len() != self.dim() {
            return Err(OptError::PointDimMismatch { expected: self.dim(), found: x.len() });
        }
        Ok(())
    }
}

/// A candidate and its objective value (in maximization sense).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoint {
    pub x: Theta,
    pub value: f64,
}

impl SearchPoint {
    pub fn new(x: Theta, value: f64) -> Self {
        Self { x, value }
    }

    /// The better of two points; `self` wins ties.
    pub fn better(self, other: SearchPoint) -> SearchPoint {
        if other.value > self.value { other } else { self }
    }
}
