//! Error types for filtering operations.
//!
//! Filters validate their parameters once at the public entry point;
//! the per-pixel kernels never return errors.

use thiserror::Error;

/// Errors that can occur during filtering operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Invalid parameter value (e.g. non-positive sigma).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Image has zero height or width.
    #[error("image is empty")]
    EmptyImage,

    /// Array rank or shape is not what the operation expects.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Two images that must share a shape do not.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Unrecognised mode or metric name.
    #[error("unknown mode: {0}")]
    UnknownMode(String),
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
