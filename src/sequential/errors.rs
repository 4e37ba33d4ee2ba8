//! Error surface of the sequential optimizer.
//!
//! Orchestrator-level mistakes (bad slider position, bad construction) have
//! their own variants; model and optimizer failures are wrapped unchanged.
use crate::gp::errors::GpError;
use crate::optimization::errors::OptError;

#[derive(Debug, Clone, PartialEq)]
pub enum SlsError {
    /// Slider positions must be finite and within `[0, 1]`.
    InvalidSliderPosition { position: f64 },

    /// The optimizer needs at least one parameter dimension.
    ZeroDimension,

    /// An endpoint (from a generator or a query) has the wrong length.
    EndpointDimMismatch { expected: usize, found: usize },

    /// A budget of zero evaluations or iterations.
    InvalidBudget { name: &'static str },

    /// Enlargement scale, minimum length, or generator length out of range.
    InvalidSliderSetting { name: &'static str, value: f64 },

    Gp(GpError),
    Opt(OptError),
}

pub type SlsResult<T> = Result<T, SlsError>;

impl std::error::Error for SlsError {}

impl std::fmt::Display for SlsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlsError::InvalidSliderPosition { position } => {
                write!(f, "Sequential Error: slider position {position} is not in [0, 1]")
            }
            SlsError::ZeroDimension => {
                write!(f, "Sequential Error: dimension must be at least 1")
            }
            SlsError::EndpointDimMismatch { expected, found } => {
                write!(f, "Sequential Error: endpoint has dimension {found}, expected {expected}")
            }
            SlsError::InvalidBudget { name } => {
                write!(f, "Sequential Error: {name} budget must be positive")
            }
            SlsError::InvalidSliderSetting { name, value } => {
                write!(f, "Sequential Error: invalid {name} = {value}")
            }
            SlsError::Gp(e) => write!(f, "{e}"),
            SlsError::Opt(e) => write!(f, "{e}"),
        }
    }
}

impl From<GpError> for SlsError {
    fn from(err: GpError) -> Self {
        SlsError::Gp(err)
    }
}

impl From<OptError> for SlsError {
    fn from(err: OptError) -> Self {
        SlsError::Opt(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Wrapped errors keep their own message; local variants name the value.
    fn display_wraps_and_names_values() {
        let wrapped: SlsError = GpError::EmptyDesignMatrix.into();
        assert_eq!(wrapped.to_string(), GpError::EmptyDesignMatrix.to_string());
        assert!(SlsError::InvalidSliderPosition { position: 1.5 }.to_string().contains("1.5"));
    }
}
