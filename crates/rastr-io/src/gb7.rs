//! GB7 format support.
//!
//! GB7 stores 7-bit grayscale luma plus an optional 1-bit transparency mask,
//! one byte per pixel, behind a 12-byte big-endian header.
//!
//! # Layout
//!
//! ```text
//! offset  size  field
//!  0      4     magic 0x4742371D ("GB7" + 0x1D)
//!  4      1     version, must be 1
//!  5      1     flags, bit0 = has-alpha-mask
//!  6      2     width  (u16 BE)
//!  8      2     height (u16 BE)
//! 10      2     reserved, 0
//! 12      W*H   pixels: bit7 = mask, bits6..0 = luma
//! ```
//!
//! Encoding is lossy: luma is quantized to 7 bits and alpha to one bit
//! (threshold 128).
//!
//! # Example
//!
//! ```rust
//! use rastr_core::LayerImage;
//! use rastr_io::gb7::{EncodeOptions, decode, encode};
//!
//! let layer = LayerImage::gb7(2, 2, vec![0x00, 0x7F, 0x80, 0xFF], true).unwrap();
//! let bytes = encode(&layer, EncodeOptions::default()).unwrap();
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back.dimensions(), (2, 2));
//! assert!(back.has_alpha());
//! ```

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use rastr_core::pixel::{gb7_pack, gray8_to_7, luma709};
use rastr_core::{LayerData, LayerImage, NormalizeOptions, RgbaImage, to_rgba};
use tracing::{debug, trace, warn};

use crate::traits::{ImageReader, ImageWriter};
use crate::{FormatError, IoError, IoResult};

/// File signature.
pub const MAGIC: u32 = 0x4742_371D;

/// Only supported version.
pub const VERSION: u8 = 1;

/// Header size in bytes.
pub const HEADER_LEN: usize = 12;

/// Header flag: pixels carry a meaningful mask bit.
pub const FLAG_MASK: u8 = 0x01;

/// Parsed GB7 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gb7Header {
    /// Flag byte
    pub flags: u8,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Reserved field, 0 in valid files
    pub reserved: u16,
}

impl Gb7Header {
    /// Header for an image of the given size.
    pub fn new(width: u16, height: u16, has_mask: bool) -> Self {
        Self {
            flags: if has_mask { FLAG_MASK } else { 0 },
            width,
            height,
            reserved: 0,
        }
    }

    /// True when flag bit0 is set.
    #[inline]
    pub fn has_mask(&self) -> bool {
        self.flags & FLAG_MASK != 0
    }

    /// Declared pixel count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Parses and validates the first 12 bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let mut cur = Cursor::new(&bytes[..HEADER_LEN]);
        let truncated = |_| FormatError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        };

        let magic = cur.read_u32::<BigEndian>().map_err(truncated)?;
        if magic != MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        let version = cur.read_u8().map_err(truncated)?;
        if version != VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let flags = cur.read_u8().map_err(truncated)?;
        let width = cur.read_u16::<BigEndian>().map_err(truncated)?;
        let height = cur.read_u16::<BigEndian>().map_err(truncated)?;
        let reserved = cur.read_u16::<BigEndian>().map_err(truncated)?;

        Ok(Self {
            flags,
            width,
            height,
            reserved,
        })
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        let mut cur = Cursor::new(&mut out[..]);
        // writes into a fixed 12-byte buffer cannot fail
        let _ = cur.write_u32::<BigEndian>(MAGIC);
        let _ = cur.write_u8(VERSION);
        let _ = cur.write_u8(self.flags);
        let _ = cur.write_u16::<BigEndian>(self.width);
        let _ = cur.write_u16::<BigEndian>(self.height);
        let _ = cur.write_u16::<BigEndian>(self.reserved);
        out
    }
}

/// Options for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Treat every pixel as opaque before thresholding alpha
    pub force_opaque: bool,
}

/// Decodes a GB7 byte stream into a GB7 layer.
///
/// Fails on bad magic, a version other than 1, zero dimensions or a payload
/// shorter than `width * height`. Extra trailing bytes are ignored.
pub fn decode(bytes: &[u8]) -> IoResult<LayerImage> {
    let header = Gb7Header::parse(bytes)?;
    if header.width == 0 || header.height == 0 {
        return Err(FormatError::ZeroDimensions.into());
    }
    if header.reserved != 0 {
        warn!(reserved = header.reserved, "GB7 reserved header field is non-zero");
    }

    let count = header.pixel_count();
    let payload = &bytes[HEADER_LEN..];
    if payload.len() < count {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN + count,
            actual: bytes.len(),
        }
        .into());
    }
    if payload.len() > count {
        warn!(extra = payload.len() - count, "ignoring trailing bytes after GB7 payload");
    }

    debug!(
        width = header.width,
        height = header.height,
        has_mask = header.has_mask(),
        "decoded GB7"
    );
    let layer = LayerImage::gb7(
        header.width as u32,
        header.height as u32,
        payload[..count].to_vec(),
        header.has_mask(),
    )?;
    Ok(layer)
}

/// Encodes any layer as GB7.
///
/// The layer is normalized to RGBA (honoring `force_opaque` and its alpha
/// flags), converted to BT.709 luma and quantized to 7 bits. The mask bit is
/// set for alpha >= 128, and the header mask flag is set iff at least one
/// pixel ends up transparent.
pub fn encode(layer: &LayerImage, opts: EncodeOptions) -> IoResult<Vec<u8>> {
    let rgba = to_rgba(
        layer,
        NormalizeOptions {
            force_opaque: opts.force_opaque,
            ..NormalizeOptions::default()
        },
    );
    encode_rgba(&rgba)
}

/// Encodes an already-normalized RGBA image as GB7.
pub fn encode_rgba(rgba: &RgbaImage) -> IoResult<Vec<u8>> {
    let (width, height) = rgba.dimensions();
    let w = u16::try_from(width)
        .map_err(|_| IoError::EncodeError(format!("width {width} exceeds GB7 limit {}", u16::MAX)))?;
    let h = u16::try_from(height)
        .map_err(|_| IoError::EncodeError(format!("height {height} exceeds GB7 limit {}", u16::MAX)))?;
    trace!(width, height, "encode_rgba");

    let mut pixels = Vec::with_capacity(rgba.pixel_count());
    let mut has_transparent = false;
    for px in rgba.as_bytes().chunks_exact(4) {
        let y7 = gray8_to_7(luma709(px[0], px[1], px[2]));
        let opaque = px[3] >= 128;
        has_transparent |= !opaque;
        pixels.push(gb7_pack(opaque, y7));
    }

    let header = Gb7Header::new(w, h, has_transparent);
    let mut out = Vec::with_capacity(HEADER_LEN + pixels.len());
    out.write_all(&header.to_bytes())?;
    out.write_all(&pixels)?;
    debug!(width, height, has_mask = has_transparent, bytes = out.len(), "encoded GB7");
    Ok(out)
}

/// Reads a GB7 file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<LayerImage> {
    Gb7Reader.read(path)
}

/// Writes a layer as a GB7 file.
pub fn write<P: AsRef<Path>>(path: P, layer: &LayerImage, opts: EncodeOptions) -> IoResult<()> {
    Gb7Writer::new(opts).write(path, layer)
}

/// [`ImageReader`] for GB7.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gb7Reader;

impl ImageReader for Gb7Reader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<LayerImage> {
        let bytes = fs::read(path.as_ref())?;
        self.read_from_memory(&bytes)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<LayerImage> {
        decode(data)
    }
}

/// [`ImageWriter`] for GB7.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gb7Writer {
    opts: EncodeOptions,
}

impl Gb7Writer {
    /// Writer with the given options.
    pub fn new(opts: EncodeOptions) -> Self {
        Self { opts }
    }
}

impl ImageWriter for Gb7Writer {
    fn write<P: AsRef<Path>>(&self, path: P, layer: &LayerImage) -> IoResult<()> {
        let bytes = self.write_to_memory(layer)?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    fn write_to_memory(&self, layer: &LayerImage) -> IoResult<Vec<u8>> {
        encode(layer, self.opts)
    }
}

/// Returns the packed bytes of a GB7 layer without conversion, if it is one.
pub fn packed_pixels(layer: &LayerImage) -> Option<&[u8]> {
    match layer.data() {
        LayerData::Gb7 { packed } => Some(packed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(flags: u8, w: u16, h: u16, pixels: &[u8]) -> Vec<u8> {
        let mut header = Gb7Header::new(w, h, false);
        header.flags = flags;
        let mut out = header.to_bytes().to_vec();
        out.extend_from_slice(pixels);
        out
    }

    #[test]
    fn test_header_layout() {
        let bytes = Gb7Header::new(0x0102, 0x0304, true).to_bytes();
        assert_eq!(bytes, [0x47, 0x42, 0x37, 0x1D, 1, 1, 0x01, 0x02, 0x03, 0x04, 0, 0]);
        let parsed = Gb7Header::parse(&bytes).unwrap();
        assert_eq!(parsed.width, 0x0102);
        assert_eq!(parsed.height, 0x0304);
        assert!(parsed.has_mask());
    }

    #[test]
    fn test_decode_errors() {
        let mut bad_magic = file(1, 1, 1, &[0]);
        bad_magic[0] = 0x00;
        assert!(matches!(
            decode(&bad_magic),
            Err(IoError::Format(FormatError::BadMagic(_)))
        ));

        let mut bad_version = file(1, 1, 1, &[0]);
        bad_version[4] = 2;
        assert!(matches!(
            decode(&bad_version),
            Err(IoError::Format(FormatError::UnsupportedVersion(2)))
        ));

        assert!(matches!(
            decode(&file(0, 2, 2, &[0, 0, 0])),
            Err(IoError::Format(FormatError::Truncated { expected: 16, actual: 15 }))
        ));
        assert!(matches!(
            decode(&[0x47, 0x42]),
            Err(IoError::Format(FormatError::Truncated { .. }))
        ));
        assert!(matches!(
            decode(&file(0, 0, 5, &[])),
            Err(IoError::Format(FormatError::ZeroDimensions))
        ));
    }

    #[test]
    fn test_decode_tolerates_trailing_and_reserved() {
        let mut bytes = file(0, 1, 1, &[0x42, 0xAA, 0xBB]);
        bytes[11] = 7;
        let layer = decode(&bytes).unwrap();
        assert_eq!(packed_pixels(&layer), Some(&[0x42][..]));
        assert!(!layer.has_alpha());
    }

    #[test]
    fn test_encode_flat_is_opaque() {
        let layer = LayerImage::flat(3, 2, rastr_core::Rgb8::WHITE).unwrap();
        let bytes = encode(&layer, EncodeOptions::default()).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 6);
        assert_eq!(bytes[5], 0);
        assert!(bytes[HEADER_LEN..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_encode_alpha_threshold() {
        let rgba = vec![0, 0, 0, 127, 0, 0, 0, 128];
        let layer = LayerImage::raster(2, 1, rgba).unwrap();
        let bytes = encode(&layer, EncodeOptions::default()).unwrap();
        assert_eq!(bytes[5], FLAG_MASK);
        assert_eq!(&bytes[HEADER_LEN..], &[0x00, 0x80]);

        let forced = encode(&layer, EncodeOptions { force_opaque: true }).unwrap();
        assert_eq!(forced[5], 0);
        assert_eq!(&forced[HEADER_LEN..], &[0x80, 0x80]);
    }

    #[test]
    fn test_encode_rejects_oversized() {
        let layer = LayerImage::flat(70_000, 1, rastr_core::Rgb8::BLACK).unwrap();
        assert!(matches!(
            encode(&layer, EncodeOptions::default()),
            Err(IoError::EncodeError(_))
        ));
    }
}
