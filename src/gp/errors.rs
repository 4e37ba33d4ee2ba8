//! Error surface for the Gaussian-process layer.
//!
//! `GpError` covers invalid hyperparameters, shape mismatches between design
//! matrices, targets and query points, covariance factorization failures,
//! malformed preference data, and export I/O. Fitters report through
//! `OptResult` and reach these variants via `From<GpError> for OptError`.

#[derive(Debug, Clone, PartialEq)]
pub enum GpError {
    // ---- Hyperparameters ----
    /// Signal variance, length-scale, noise, prior variance or BTL scale is
    /// non-finite or not strictly positive.
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
    },

    /// Number of length-scales differs from the input dimension.
    LengthScaleDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Shapes ----
    /// Query point length differs from the input dimension.
    PointDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Target vector length differs from the number of design columns.
    TargetLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// Operation needs at least one observed point.
    EmptyDesignMatrix,

    /// Inputs must be finite.
    NonFiniteInput {
        what: &'static str,
    },

    // ---- Numerics ----
    /// Cholesky factorization of `K + bI` failed.
    CovarianceNotPositiveDefinite {
        size: usize,
    },

    // ---- Preference data ----
    /// A preference refers to a column that does not exist.
    PreferenceIndexOutOfRange {
        index: usize,
        num_points: usize,
    },

    /// A preference set needs a winner and at least one alternative.
    PreferenceTooShort {
        len: usize,
    },

    // ---- Export ----
    Io {
        path: String,
        text: String,
    },
}

pub type GpResult<T> = Result<T, GpError>;

impl std::error::Error for GpError {}

impl std::fmt::Display for GpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Hyperparameters ----
            GpError::InvalidHyperparameter { name, value } => {
                write!(f, "GP Error: hyperparameter {name} = {value} must be finite and > 0")
            }
            GpError::LengthScaleDimMismatch { expected, found } => {
                write!(f, "GP Error: expected {expected} length-scales, found {found}")
            }

            // ---- Shapes ----
            GpError::PointDimMismatch { expected, found } => {
                write!(f, "GP Error: point has dimension {found}, expected {expected}")
            }
            GpError::TargetLengthMismatch { expected, found } => {
                write!(f, "GP Error: {found} targets for {expected} design points")
            }
            GpError::EmptyDesignMatrix => {
                write!(f, "GP Error: design matrix is empty")
            }
            GpError::NonFiniteInput { what } => {
                write!(f, "GP Error: {what} contains non-finite values")
            }

            // ---- Numerics ----
            GpError::CovarianceNotPositiveDefinite { size } => {
                write!(f, "GP Error: covariance matrix ({size}x{size}) is not positive definite")
            }

            // ---- Preference data ----
            GpError::PreferenceIndexOutOfRange { index, num_points } => {
                write!(f, "GP Error: preference index {index} out of range for {num_points} points")
            }
            GpError::PreferenceTooShort { len } => {
                write!(f, "GP Error: preference set of length {len}, need at least 2")
            }

            // ---- Export ----
            GpError::Io { path, text } => {
                write!(f, "GP Error: I/O failure on {path}: {text}")
            }
        }
    }
}

/// Validate a strictly positive, finite hyperparameter.
pub fn check_positive(name: &'static str, value: f64) -> GpResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GpError::InvalidHyperparameter { name, value });
    }
    Ok(value)
}
