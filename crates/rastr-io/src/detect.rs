//! Format detection utilities.
//!
//! Detects image formats from magic bytes, falling back to the file extension.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::IoResult;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// GB7 7-bit gray + mask.
    Gb7,
    /// PNG format.
    Png,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from file path.
    ///
    /// First checks magic bytes, falls back to extension.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();

        if let Ok(format) = Self::from_magic_bytes(path) {
            if format != Format::Unknown {
                return Ok(format);
            }
        }

        Ok(Self::from_extension(path))
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gb7") => Format::Gb7,
            Some("png") => Format::Png,
            _ => Format::Unknown,
        }
    }

    /// Detects format from file magic bytes.
    pub fn from_magic_bytes<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 8];
        let bytes_read = file.read(&mut header)?;
        Ok(Self::from_bytes(&header[..bytes_read]))
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() >= 4 && bytes[0..4] == crate::gb7::MAGIC.to_be_bytes() {
            return Format::Gb7;
        }
        if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Format::Png;
        }
        Format::Unknown
    }

    /// Canonical file extension.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Format::Gb7 => Some("gb7"),
            Format::Png => Some("png"),
            Format::Unknown => None,
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gb7" => Ok(Format::Gb7),
            "png" => Ok(Format::Png),
            other => Err(format!("unknown format '{other}' (gb7, png)")),
        }
    }
}
