//! Error types for I/O operations.
//!
//! [`FormatError`] covers structural problems of a GB7 stream; everything
//! else (filesystem, PNG codec, unknown formats) lives in [`IoError`].

use std::io;
use thiserror::Error;

/// Structural GB7 decode failure. Fatal for that decode call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Signature is not `0x4742371D`.
    #[error("bad GB7 signature 0x{0:08X}")]
    BadMagic(u32),

    /// Version byte is not 1.
    #[error("unsupported GB7 version {0}")]
    UnsupportedVersion(u8),

    /// Header or payload shorter than declared.
    #[error("truncated GB7 data: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Required byte count
        expected: usize,
        /// Available byte count
        actual: usize,
    },

    /// Header declares a zero width or height.
    #[error("GB7 header declares zero dimensions")]
    ZeroDimensions,
}

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed GB7 stream.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Layer construction failed.
    #[error(transparent)]
    Core(#[from] rastr_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
