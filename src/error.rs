//! Error types for climplot.
//!
//! Every fallible operation in the crate returns [`Result`]. Failures are
//! fatal to the single call that raised them; nothing is retried.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// The main error type for climplot operations.
#[derive(Error, Debug)]
pub enum ClimplotError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors (directory creation, file reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Array lengths or shapes that cannot be plotted together
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// Timestamps that cannot be decoded or represented
    #[error("Invalid time: {message}")]
    InvalidTime { message: String },

    /// Interpolation errors
    #[error("Interpolation error: {message}")]
    Interpolation { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ndarray shape construction errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenience type alias for Results with ClimplotError
pub type Result<T> = std::result::Result<T, ClimplotError>;

impl ClimplotError {
    /// Shorthand for an [`ClimplotError::InvalidParameter`]
    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        ClimplotError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ClimplotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ClimplotError::ImageGeneration {
            message: format!("Chart drawing failed: {}", e),
        }
    }
}
