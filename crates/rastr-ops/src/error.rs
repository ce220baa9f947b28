//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Target width or height is non-finite, zero or negative.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A resize request value is outside its allowed range.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Building an output buffer or layer failed.
    #[error(transparent)]
    Core(#[from] rastr_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
