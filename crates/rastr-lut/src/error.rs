//! LUT error types.
//!
//! Building and applying curves never fails; these errors only come from
//! constructing a [`crate::Lut`] out of caller-supplied entries or from
//! parsing curve control points.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// An entry exceeds the table's domain maximum.
    #[error("LUT entry {index} = {value} exceeds domain max {max}")]
    OutOfDomain {
        /// Entry index
        index: usize,
        /// Entry value
        value: u8,
        /// Domain maximum
        max: u8,
    },

    /// Parse error for curve control points.
    #[error("parse error: {0}")]
    ParseError(String),
}
