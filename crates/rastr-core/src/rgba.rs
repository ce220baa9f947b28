//! Canonical 8-bit RGBA buffers and the layer normalizer.
//!
//! Every pixel operation in rastr works on [`RgbaImage`]. [`to_rgba`] turns
//! any [`LayerImage`] variant into one, always allocating a fresh buffer and
//! never touching the source layer.
//!
//! # Alpha Rules
//!
//! | Variant | Color alpha                              | AlphaOnly gray            |
//! |---------|------------------------------------------|---------------------------|
//! | Flat    | 255                                      | 255                       |
//! | Gb7     | mask bit ? 255 : 0 (255 without a mask)  | same as color alpha       |
//! | Raster  | copied                                   | copied                    |
//!
//! In color mode `alpha_hidden`, `alpha_removed` or `force_opaque` force
//! alpha to 255. In alpha-only mode the source alpha is always reported and
//! the output alpha is 255.

use crate::error::check_buffer;
use crate::layer::{LayerData, LayerImage};
use crate::pixel::{gb7_luma, gb7_mask, gray7_to_8};
use crate::Result;

/// Owned 8-bit RGBA image, `width * height * 4` bytes, at least 1x1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaImage {
    /// Wraps an interleaved RGBA buffer after validating its shape.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_buffer(width, height, 4, data.len())?;
        Ok(Self { width, height, data })
    }

    /// Creates an image filled with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        check_buffer(width, height, 0, 0)?;
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Ok(Self { width, height, data })
    }

    /// Creates a fully transparent black image.
    pub fn transparent(width: u32, height: u32) -> Result<Self> {
        check_buffer(width, height, 0, 0)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes. The length cannot change through a slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image, returning its buffer.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// True when any pixel has alpha below 255.
    pub fn has_transparency(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] < 255)
    }

    /// Wraps the buffer into a raster layer with default attributes.
    pub fn into_layer(self) -> Result<LayerImage> {
        LayerImage::raster(self.width, self.height, self.data)
    }
}

/// What the normalizer extracts from a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalizeMode {
    /// Regular color picture.
    #[default]
    Color,
    /// Grayscale picture of the alpha channel, fully opaque.
    AlphaOnly,
}

/// Options for [`to_rgba`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeOptions {
    /// Color or alpha-only output
    pub mode: NormalizeMode,
    /// Force alpha = 255 in color mode
    pub force_opaque: bool,
}

impl NormalizeOptions {
    /// Color mode with alpha forced opaque.
    pub fn opaque() -> Self {
        Self {
            mode: NormalizeMode::Color,
            force_opaque: true,
        }
    }

    /// Alpha-only mode.
    pub fn alpha_only() -> Self {
        Self {
            mode: NormalizeMode::AlphaOnly,
            force_opaque: false,
        }
    }
}

/// Expands packed GB7 bytes into interleaved RGBA.
///
/// Without a mask every pixel is opaque.
pub fn unpack_gb7(packed: &[u8], has_mask: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed.len() * 4);
    for &byte in packed {
        let g = gray7_to_8(gb7_luma(byte));
        let a = if !has_mask || gb7_mask(byte) { 255 } else { 0 };
        out.extend_from_slice(&[g, g, g, a]);
    }
    out
}

/// Converts any layer into canonical RGBA.
///
/// # Example
///
/// ```rust
/// use rastr_core::{LayerImage, NormalizeOptions, to_rgba};
///
/// let layer = LayerImage::gb7(2, 1, vec![0x7F, 0x80], true).unwrap();
/// let rgba = to_rgba(&layer, NormalizeOptions::default());
/// assert_eq!(rgba.as_bytes(), &[255, 255, 255, 0, 0, 0, 0, 255]);
/// ```
pub fn to_rgba(layer: &LayerImage, opts: NormalizeOptions) -> RgbaImage {
    let (width, height) = layer.dimensions();
    let force = opts.force_opaque || layer.alpha_suppressed();
    let alpha_only = opts.mode == NormalizeMode::AlphaOnly;
    tracing::trace!(width, height, kind = layer.data().kind(), alpha_only, force, "to_rgba");

    let data = match layer.data() {
        LayerData::Flat { color } => {
            let px = if alpha_only {
                [255, 255, 255, 255]
            } else {
                [color.r, color.g, color.b, 255]
            };
            px.repeat(layer.pixel_count())
        }
        LayerData::Gb7 { packed } => {
            let has_mask = layer.has_alpha();
            let mut out = Vec::with_capacity(packed.len() * 4);
            for &byte in packed {
                let a = if !has_mask || gb7_mask(byte) { 255 } else { 0 };
                if alpha_only {
                    out.extend_from_slice(&[a, a, a, 255]);
                } else {
                    let g = gray7_to_8(gb7_luma(byte));
                    out.extend_from_slice(&[g, g, g, if force { 255 } else { a }]);
                }
            }
            out
        }
        LayerData::Raster { rgba } => {
            let mut out = rgba.clone();
            if alpha_only {
                for px in out.chunks_exact_mut(4) {
                    let a = px[3];
                    px.copy_from_slice(&[a, a, a, 255]);
                }
            } else if force {
                for px in out.chunks_exact_mut(4) {
                    px[3] = 255;
                }
            }
            out
        }
    };

    RgbaImage { width, height, data }
}
