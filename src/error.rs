use crate::parameters::{BoundsError, ExpressionError, ParameterError, SerializationError};
use crate::scaling::ScalingError;
use crate::units::UnitError;
use thiserror::Error;

/// Error types for the scaled-params library.
#[derive(Error, Debug)]
pub enum ScaledParamsError {
    /// Error raised while defining, propagating or querying parameters.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Unknown or incompatible units.
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// Invalid dimension scaling.
    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalingError),

    /// Malformed or unevaluable expression.
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Value outside its bounds, or malformed bounds.
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Failure reading or writing a profile.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for scaled-params operations.
pub type Result<T> = std::result::Result<T, ScaledParamsError>;

/// Extensions for converting from other error types.
impl From<String> for ScaledParamsError {
    fn from(s: String) -> Self {
        ScaledParamsError::Other(s)
    }
}

impl From<&str> for ScaledParamsError {
    fn from(s: &str) -> Self {
        ScaledParamsError::Other(s.to_string())
    }
}
