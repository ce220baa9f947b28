//! Layer records: the unit the editor stacks, edits and composites.
//!
//! A [`LayerImage`] couples pixel storage ([`LayerData`]) with the display
//! attributes the compositor reads (opacity, visibility, blend mode, alpha
//! suppression flags).
//!
//! # Storage Variants
//!
//! ```text
//! Raster  [R G B A R G B A ...]   width * height * 4 bytes
//! Gb7     [M|YYYYYYY ...]         width * height bytes, bit7 = mask
//! Flat    Rgb8                    no buffer, procedurally filled
//! ```
//!
//! The buffer length invariant is enforced by the constructors; pixel data
//! is never mutated in place. Editing operations produce a new layer value
//! through [`LayerImage::with_raster`] / [`LayerImage::with_gb7`], which
//! carry over every display attribute.

use crate::error::check_buffer;
use crate::pixel::{GB7_LUMA_BITS, GB7_MASK_BIT, Rgb8};
use crate::Result;

/// Per-pixel compositing formula of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Darken by multiplication.
    Multiply,
    /// Lighten (inverse multiply).
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
}

impl BlendMode {
    /// All supported modes, in menu order.
    pub const ALL: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    /// Lowercase name as used in project files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "over" | "source-over" => Ok(BlendMode::Normal),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "overlay" => Ok(BlendMode::Overlay),
            other => Err(format!("unknown blend mode '{other}'")),
        }
    }
}

/// Pixel storage of a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerData {
    /// 8-bit RGBA, `width * height * 4` bytes.
    Raster {
        /// Interleaved RGBA bytes
        rgba: Vec<u8>,
    },
    /// Packed GB7, `width * height` bytes.
    Gb7 {
        /// One byte per pixel: bit7 mask, bits6..0 luma
        packed: Vec<u8>,
    },
    /// Solid color fill.
    Flat {
        /// Fill color
        color: Rgb8,
    },
}

impl LayerData {
    /// Stored bytes per pixel (0 for flat layers).
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            LayerData::Raster { .. } => 4,
            LayerData::Gb7 { .. } => 1,
            LayerData::Flat { .. } => 0,
        }
    }

    /// Short variant name for logs and `info` output.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerData::Raster { .. } => "raster",
            LayerData::Gb7 { .. } => "gb7",
            LayerData::Flat { .. } => "flat",
        }
    }
}

/// One layer of the editor stack.
///
/// # Example
///
/// ```rust
/// use rastr_core::{BlendMode, LayerImage, Rgb8};
///
/// let base = LayerImage::flat(64, 32, Rgb8::new(255, 0, 0)).unwrap();
/// let top = LayerImage::gb7(64, 32, vec![0xFF; 64 * 32], true)
///     .unwrap()
///     .with_opacity(0.5)
///     .with_blend_mode(BlendMode::Multiply);
///
/// assert_eq!(top.width(), 64);
/// assert_eq!(top.opacity(), 0.5);
/// assert!(base.is_drawable());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayerImage {
    width: u32,
    height: u32,
    data: LayerData,
    has_alpha: bool,
    alpha_hidden: bool,
    alpha_removed: bool,
    opacity: f32,
    visible: bool,
    deleted: bool,
    blend_mode: BlendMode,
}

impl LayerImage {
    fn with_data(width: u32, height: u32, data: LayerData, has_alpha: bool) -> Self {
        Self {
            width,
            height,
            data,
            has_alpha,
            alpha_hidden: false,
            alpha_removed: false,
            opacity: 1.0,
            visible: true,
            deleted: false,
            blend_mode: BlendMode::Normal,
        }
    }

    /// Creates a raster layer from interleaved RGBA bytes.
    ///
    /// `has_alpha` is derived from the buffer: true when any pixel has alpha < 255.
    pub fn raster(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        check_buffer(width, height, 4, rgba.len())?;
        let has_alpha = rgba.chunks_exact(4).any(|px| px[3] < 255);
        Ok(Self::with_data(width, height, LayerData::Raster { rgba }, has_alpha))
    }

    /// Creates a GB7 layer from packed bytes.
    ///
    /// `has_mask` mirrors the file header flag: when false the mask bits are
    /// ignored and every pixel is treated as opaque.
    pub fn gb7(width: u32, height: u32, packed: Vec<u8>, has_mask: bool) -> Result<Self> {
        check_buffer(width, height, 1, packed.len())?;
        Ok(Self::with_data(width, height, LayerData::Gb7 { packed }, has_mask))
    }

    /// Creates a solid-color layer.
    pub fn flat(width: u32, height: u32, color: Rgb8) -> Result<Self> {
        check_buffer(width, height, 0, 0)?;
        Ok(Self::with_data(width, height, LayerData::Flat { color }, false))
    }

    /// Returns a raster layer with new pixels and this layer's display attributes.
    pub fn with_raster(&self, width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let mut out = Self::raster(width, height, rgba)?;
        out.copy_attributes(self);
        Ok(out)
    }

    /// Returns a GB7 layer with new packed pixels and this layer's display attributes.
    ///
    /// Width, height and the mask flag are kept.
    pub fn with_gb7(&self, packed: Vec<u8>) -> Result<Self> {
        let mut out = Self::gb7(self.width, self.height, packed, self.has_alpha)?;
        out.copy_attributes(self);
        Ok(out)
    }

    /// Like [`with_gb7`](Self::with_gb7), for pixels whose mask bits were
    /// rewritten. The mask flag is set when any mask bit is clear, so a mask
    /// edit on an unmasked layer survives normalization and encoding.
    pub fn with_gb7_mask(&self, packed: Vec<u8>) -> Result<Self> {
        let has_mask = self.has_alpha || packed.iter().any(|&b| b & GB7_MASK_BIT == 0);
        let mut out = Self::gb7(self.width, self.height, packed, has_mask)?;
        out.copy_attributes(self);
        Ok(out)
    }

    /// Returns a flat layer of a new size with this layer's display attributes.
    pub fn with_flat(&self, width: u32, height: u32, color: Rgb8) -> Result<Self> {
        let mut out = Self::flat(width, height, color)?;
        out.copy_attributes(self);
        Ok(out)
    }

    fn copy_attributes(&mut self, from: &LayerImage) {
        self.alpha_hidden = from.alpha_hidden;
        self.alpha_removed = from.alpha_removed;
        self.opacity = from.opacity;
        self.visible = from.visible;
        self.deleted = from.deleted;
        self.blend_mode = from.blend_mode;
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

    /// Pixel storage.
    #[inline]
    pub fn data(&self) -> &LayerData {
        &self.data
    }

    /// Whether the layer carries transparency information.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Alpha is hidden for display but kept in the data.
    #[inline]
    pub fn alpha_hidden(&self) -> bool {
        self.alpha_hidden
    }

    /// Alpha is suppressed without deleting the data.
    #[inline]
    pub fn alpha_removed(&self) -> bool {
        self.alpha_removed
    }

    /// True when display must ignore the alpha channel.
    #[inline]
    pub fn alpha_suppressed(&self) -> bool {
        self.alpha_hidden || self.alpha_removed
    }

    /// Global opacity in [0, 1].
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Visibility toggle.
    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Soft-deleted layers stay in the stack but are never drawn.
    #[inline]
    pub fn deleted(&self) -> bool {
        self.deleted
    }

    /// Blend mode.
    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// True when the compositor should draw this layer.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.deleted
    }

    /// Color depth reported in the status bar.
    ///
    /// GB7: 8 with mask, 7 without. Raster: 32 with alpha, 24 without. Flat: 24.
    pub fn bit_depth(&self) -> u8 {
        match (&self.data, self.has_alpha) {
            (LayerData::Gb7 { .. }, true) => 8,
            (LayerData::Gb7 { .. }, false) => 7,
            (LayerData::Raster { .. }, true) => 32,
            (LayerData::Raster { .. }, false) => 24,
            (LayerData::Flat { .. }, _) => 24,
        }
    }

    /// Sets opacity, clamped to [0, 1]. NaN becomes 1.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Sets the blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets opacity in place, clamped to [0, 1]. NaN becomes 1.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    /// Sets the blend mode in place.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Sets visibility in place.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Marks the layer deleted (or restores it).
    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    /// Hides alpha for display without touching the data.
    pub fn set_alpha_hidden(&mut self, hidden: bool) {
        self.alpha_hidden = hidden;
    }

    /// Suppresses alpha without deleting the data.
    pub fn set_alpha_removed(&mut self, removed: bool) {
        self.alpha_removed = removed;
    }

    /// Destructively discards transparency.
    ///
    /// GB7 layers get every mask bit cleared and lose the mask flag, raster
    /// layers get alpha 255 everywhere. Flat layers only drop the flag.
    pub fn remove_alpha(&self) -> LayerImage {
        let mut out = self.clone();
        out.has_alpha = false;
        match &mut out.data {
            LayerData::Gb7 { packed } => {
                for byte in packed.iter_mut() {
                    *byte &= GB7_LUMA_BITS;
                }
            }
            LayerData::Raster { rgba } => {
                for px in rgba.chunks_exact_mut(4) {
                    px[3] = 255;
                }
            }
            LayerData::Flat { .. } => {}
        }
        tracing::debug!(kind = out.data.kind(), "alpha removed");
        out
    }

    /// Number of transparent pixels as the normalizer would see them
    /// (alpha flags ignored).
    pub fn transparent_pixel_count(&self) -> usize {
        match &self.data {
            LayerData::Gb7 { packed } if self.has_alpha => {
                packed.iter().filter(|&&b| b & GB7_MASK_BIT == 0).count()
            }
            LayerData::Raster { rgba } => rgba.chunks_exact(4).filter(|px| px[3] < 255).count(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_constructors_validate() {
        assert!(LayerImage::raster(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            LayerImage::raster(2, 2, vec![0; 12]),
            Err(Error::BufferLength { .. })
        ));
        assert!(matches!(
            LayerImage::gb7(0, 2, vec![], false),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(LayerImage::flat(1, 1, Rgb8::WHITE).is_ok());
        assert!(LayerImage::flat(1, 0, Rgb8::WHITE).is_err());
    }

    #[test]
    fn test_raster_alpha_detection() {
        let opaque = LayerImage::raster(1, 2, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        assert!(!opaque.has_alpha());
        assert_eq!(opaque.bit_depth(), 24);

        let clear = LayerImage::raster(1, 2, vec![1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        assert!(clear.has_alpha());
        assert_eq!(clear.bit_depth(), 32);
        assert_eq!(clear.transparent_pixel_count(), 1);
    }

    #[test]
    fn test_opacity_clamped() {
        let layer = LayerImage::flat(1, 1, Rgb8::BLACK).unwrap();
        assert_eq!(layer.clone().with_opacity(1.5).opacity(), 1.0);
        assert_eq!(layer.clone().with_opacity(-0.5).opacity(), 0.0);
        assert_eq!(layer.with_opacity(f32::NAN).opacity(), 1.0);
    }

    #[test]
    fn test_derived_layers_keep_attributes() {
        let mut src = LayerImage::gb7(2, 1, vec![0x80, 0x7F], true)
            .unwrap()
            .with_opacity(0.25)
            .with_blend_mode(BlendMode::Screen);
        src.set_alpha_hidden(true);

        let gb7 = src.with_gb7(vec![0x00, 0x00]).unwrap();
        assert_eq!(gb7.opacity(), 0.25);
        assert_eq!(gb7.blend_mode(), BlendMode::Screen);
        assert!(gb7.alpha_hidden());
        assert!(gb7.has_alpha());

        let raster = src.with_raster(1, 1, vec![9, 9, 9, 255]).unwrap();
        assert_eq!(raster.dimensions(), (1, 1));
        assert_eq!(raster.blend_mode(), BlendMode::Screen);
        assert!(src.with_gb7(vec![0]).is_err());
    }

    #[test]
    fn test_gb7_mask_edit_sets_flag() {
        let plain = LayerImage::gb7(2, 1, vec![0x40, 0x7F], false).unwrap();
        assert!(!plain.with_gb7(vec![0x40, 0x7F]).unwrap().has_alpha());

        let edited = plain.with_gb7_mask(vec![0x40, 0x7F]).unwrap();
        assert!(edited.has_alpha());
        assert_eq!(edited.transparent_pixel_count(), 2);

        // all mask bits set: still opaque
        let opaque = plain.with_gb7_mask(vec![0xC0, 0xFF]).unwrap();
        assert!(!opaque.has_alpha());
    }

    #[test]
    fn test_remove_alpha() {
        let gb7 = LayerImage::gb7(2, 1, vec![0xFF, 0x05], true).unwrap();
        let cleared = gb7.remove_alpha();
        assert!(!cleared.has_alpha());
        assert_eq!(cleared.data(), &LayerData::Gb7 { packed: vec![0x7F, 0x05] });
        assert_eq!(cleared.bit_depth(), 7);
        // source untouched
        assert_eq!(gb7.data(), &LayerData::Gb7 { packed: vec![0xFF, 0x05] });

        let raster = LayerImage::raster(1, 1, vec![10, 20, 30, 40]).unwrap();
        let cleared = raster.remove_alpha();
        assert_eq!(cleared.data(), &LayerData::Raster { rgba: vec![10, 20, 30, 255] });
        assert_eq!(cleared.transparent_pixel_count(), 0);
    }

    #[test]
    fn test_blend_mode_parse() {
        assert_eq!("Multiply".parse::<BlendMode>().unwrap(), BlendMode::Multiply);
        assert_eq!("source-over".parse::<BlendMode>().unwrap(), BlendMode::Normal);
        assert!("dodge".parse::<BlendMode>().is_err());
        for mode in BlendMode::ALL {
            assert_eq!(mode.name().parse::<BlendMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_drawable() {
        let mut layer = LayerImage::flat(1, 1, Rgb8::BLACK).unwrap();
        assert!(layer.is_drawable());
        layer.set_visible(false);
        assert!(!layer.is_drawable());
        layer.set_visible(true);
        layer.set_deleted(true);
        assert!(!layer.is_drawable());
    }
}
