//! Error types for rastr-core operations.
//!
//! Constructing a [`crate::LayerImage`] or [`crate::RgbaImage`] validates
//! dimensions and buffer lengths up front, so every later pixel loop can
//! index the flat buffers without re-checking. The failures that can occur
//! at those construction boundaries are collected here.
//!
//! # Usage
//!
//! ```rust
//! use rastr_core::{Error, LayerImage};
//!
//! let err = LayerImage::raster(2, 2, vec![0; 3]).unwrap_err();
//! assert!(matches!(err, Error::BufferLength { .. }));
//! ```
//!
//! # Used By
//!
//! - `rastr-io` - wraps it for decode/encode failures
//! - `rastr-ops` - wraps it when resampling produces new layers

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or editing layer values.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero.
    ///
    /// Every layer and RGBA buffer must be at least 1x1.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Pixel buffer length does not match `width * height * bytes_per_pixel`.
    #[error("buffer length {actual} does not match expected {expected} for {width}x{height}")]
    BufferLength {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },

    /// Color string could not be parsed.
    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    /// The layer stack already holds its configured maximum.
    #[error("layer stack is full ({max} layers)")]
    StackFull {
        /// Configured capacity
        max: usize,
    },

    /// A layer index does not exist in the stack.
    #[error("layer index {index} out of range (stack has {len} layers)")]
    LayerIndex {
        /// Requested index
        index: usize,
        /// Current number of layers
        len: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BufferLength`] error.
    #[inline]
    pub fn buffer_length(width: u32, height: u32, expected: usize, actual: usize) -> Self {
        Self::BufferLength {
            width,
            height,
            expected,
            actual,
        }
    }

    /// Returns `true` if this error came from dimension or length validation.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. } | Self::BufferLength { .. })
    }
}

/// Checks `width * height * bpp` against a buffer length.
///
/// Used by every constructor that accepts a flat pixel buffer.
pub(crate) fn check_buffer(width: u32, height: u32, bpp: usize, actual: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bpp))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
    if expected != actual {
        return Err(Error::buffer_length(width, height, expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_message() {
        let err = Error::buffer_length(4, 2, 32, 30);
        let msg = err.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains("32"));
        assert!(msg.contains("4x2"));
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_check_buffer() {
        assert!(check_buffer(2, 2, 4, 16).is_ok());
        assert!(check_buffer(2, 2, 1, 4).is_ok());
        assert!(matches!(
            check_buffer(0, 2, 4, 0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            check_buffer(2, 2, 4, 15),
            Err(Error::BufferLength { expected: 16, actual: 15, .. })
        ));
    }

    #[test]
    fn test_stack_errors_are_not_shape_errors() {
        assert!(!Error::StackFull { max: 2 }.is_shape_error());
        assert!(!Error::InvalidColor("nope".into()).is_shape_error());
    }
}
