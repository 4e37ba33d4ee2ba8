//! Accumulated preference observations.
//!
//! `x` is a `d × N` design matrix whose columns are every point shown so
//! far, in the order they were first seen. Each [`Preference`] lists column
//! indices with the chosen point first. Columns are only ever appended.
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::gp::errors::{GpError, GpResult};

/// Squared-distance threshold `(1e-10)²` under which a new point is treated
/// as an existing column.
const MERGE_DIST_SQ: f64 = 1e-20;

/// One observed choice set: column indices, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference(Vec<usize>);

impl Preference {
    /// # Errors
    /// [`GpError::PreferenceTooShort`] for fewer than two entries.
    pub fn new(indices: Vec<usize>) -> GpResult<Self> {
        if indices.len() < 2 {
            return Err(GpError::PreferenceTooShort { len: indices.len() });
        }
        Ok(Self(indices))
    }

    pub fn winner(&self) -> usize {
        self.0[0]
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceData {
    x: Array2<f64>,
    d: Vec<Preference>,
}

impl PreferenceData {
    /// Empty data set for `dim`-dimensional points.
    pub fn new(dim: usize) -> Self {
        Self { x: Array2::zeros((dim, 0)), d: Vec::new() }
    }

    /// Build from an existing design and preference list.
    ///
    /// # Errors
    /// - [`GpError::NonFiniteInput`] for NaN/∞ coordinates.
    /// - [`GpError::PreferenceIndexOutOfRange`] for an index `>= N`.
    pub fn from_parts(x: Array2<f64>, d: Vec<Preference>) -> GpResult<Self> {
        if x.iter().any(|v| !v.is_finite()) {
            return Err(GpError::NonFiniteInput { what: "design matrix" });
        }
        let n = x.ncols();
        for p in &d {
            if let Some(&index) = p.indices().iter().find(|&&i| i >= n) {
                return Err(GpError::PreferenceIndexOutOfRange { index, num_points: n });
            }
        }
        Ok(Self { x, d })
    }

    pub fn dim(&self) -> usize {
        self.x.nrows()
    }

    pub fn num_points(&self) -> usize {
        self.x.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn preferences(&self) -> &[Preference] {
        &self.d
    }

    /// Record that `chosen` was preferred over every point in `others`.
    ///
    /// Each point is appended as a new column unless `merge` is set and an
    /// existing column lies within `1e-10` of it, in which case that column
    /// is reused. Returns the recorded preference.
    ///
    /// # Errors
    /// Dimension mismatches, non-finite coordinates, or an empty `others`.
    /// On error the data set is unchanged.
    pub fn add_new_points(
        &mut self, chosen: ArrayView1<f64>, others: &[Array1<f64>], merge: bool,
    ) -> GpResult<&Preference> {
        if others.is_empty() {
            return Err(GpError::PreferenceTooShort { len: 1 });
        }
        self.check_point(chosen)?;
        for o in others {
            self.check_point(o.view())?;
        }

        let mut indices = Vec::with_capacity(others.len() + 1);
        indices.push(self.index_for(chosen, merge)?);
        for o in others {
            indices.push(self.index_for(o.view(), merge)?);
        }
        self.d.push(Preference(indices));
        Ok(&self.d[self.d.len() - 1])
    }

    fn check_point(&self, p: ArrayView1<f64>) -> GpResult<()> {
        if p.len() != self.dim() {
            return Err(GpError::PointDimMismatch { expected: self.dim(), found: p.len() });
        }
        if p.iter().any(|v| !v.is_finite()) {
            return Err(GpError::NonFiniteInput { what: "preference point" });
        }
        Ok(())
    }

    /// Column holding `p`, appending it unless a merge target exists.
    fn index_for(&mut self, p: ArrayView1<f64>, merge: bool) -> GpResult<usize> {
        match if merge { self.find_close(p) } else { None } {
            Some(i) => Ok(i),
            None => self.push_column(p),
        }
    }

    fn find_close(&self, p: ArrayView1<f64>) -> Option<usize> {
        self.x.axis_iter(Axis(1)).position(|col| {
            col.iter().zip(p.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>() < MERGE_DIST_SQ
        })
    }

    fn push_column(&mut self, p: ArrayView1<f64>) -> GpResult<usize> {
        let index = self.x.ncols();
        self.x
            .push_column(p)
            .map_err(|_| GpError::PointDimMismatch { expected: self.x.nrows(), found: p.len() })?;
        Ok(index)
    }
}
