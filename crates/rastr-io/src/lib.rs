//! # rastr-io
//!
//! Image import/export for the rastr pixel engine.
//!
//! - **GB7** - 7-bit grayscale plus 1-bit mask, the editor's native format
//! - **PNG** - 8-bit raster interchange with alpha
//!
//! # Architecture
//!
//! - [`ImageReader`] - Trait for format readers
//! - [`ImageWriter`] - Trait for format writers
//! - [`read`] / [`write`] - High-level functions with format auto-detection
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rastr_io::{WriteOptions, read, write};
//!
//! // Read any supported format (auto-detected)
//! let layer = read("scan.gb7")?;
//!
//! // Write to a different format
//! write("scan.png", &layer, &WriteOptions::default())?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | GB7 | Yes | Yes | lossy: 7-bit luma, alpha threshold 128 |
//! | PNG | Yes | Yes | reads gray/GA/RGB/RGBA/palette, writes RGBA |
//!
//! # Dependencies
//!
//! - [`rastr-core`] - Layer types and the RGBA normalizer
//! - [`byteorder`] - GB7 header fields
//! - [`png`] - PNG support
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod detect;
mod error;
pub mod gb7;
#[cfg(feature = "png")]
pub mod png;
mod traits;

pub use detect::Format;
pub use error::{FormatError, IoError, IoResult};
pub use traits::{ImageReader, ImageWriter};

use std::path::Path;

use rastr_core::{LayerImage, NormalizeMode, NormalizeOptions, to_rgba};
use tracing::debug;

/// Options for [`write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Output format; detected from the extension when `None`
    pub format: Option<Format>,
    /// Normalization applied before encoding (force opaque, alpha-only export)
    pub normalize: NormalizeOptions,
}

/// Reads an image file, auto-detecting the format.
///
/// # Example
///
/// ```rust,ignore
/// let layer = rastr_io::read("image.gb7")?;
/// println!("{}x{}", layer.width(), layer.height());
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<LayerImage> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "read");

    match format {
        Format::Gb7 => gb7::read(path),

        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(not(feature = "png"))]
        Format::Png => Err(IoError::UnsupportedFormat("png (feature disabled)".into())),

        Format::Unknown => Err(unknown_format(path)),
    }
}

/// Writes a layer, picking the format from options or the file extension.
///
/// # Example
///
/// ```rust,ignore
/// use rastr_io::{WriteOptions, write};
///
/// write("out.gb7", &layer, &WriteOptions::default())?;
/// ```
pub fn write<P: AsRef<Path>>(path: P, layer: &LayerImage, opts: &WriteOptions) -> IoResult<()> {
    let path = path.as_ref();
    let format = opts.format.unwrap_or_else(|| Format::from_extension(path));
    debug!(path = %path.display(), ?format, mode = ?opts.normalize.mode, "write");

    match format {
        Format::Gb7 => {
            let bytes = match opts.normalize.mode {
                NormalizeMode::Color => gb7::encode(
                    layer,
                    gb7::EncodeOptions {
                        force_opaque: opts.normalize.force_opaque,
                    },
                )?,
                NormalizeMode::AlphaOnly => gb7::encode_rgba(&to_rgba(layer, opts.normalize))?,
            };
            std::fs::write(path, bytes)?;
            Ok(())
        }

        #[cfg(feature = "png")]
        Format::Png => png::write(path, layer, opts.normalize),

        #[cfg(not(feature = "png"))]
        Format::Png => Err(IoError::UnsupportedFormat("png (feature disabled)".into())),

        Format::Unknown => Err(unknown_format(path)),
    }
}

fn unknown_format(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}
