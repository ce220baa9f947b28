//! Per-channel tone curves over RGBA buffers.

use rastr_core::RgbaImage;
use tracing::{trace, warn};

use crate::lut::{Lut, RGBA_MAX};

/// Optional LUT per RGBA channel. Channels without a LUT pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelLuts {
    /// Red curve
    pub r: Option<Lut>,
    /// Green curve
    pub g: Option<Lut>,
    /// Blue curve
    pub b: Option<Lut>,
    /// Alpha curve
    pub a: Option<Lut>,
}

impl ChannelLuts {
    /// Same curve on R, G and B, alpha untouched.
    pub fn rgb(lut: Lut) -> Self {
        Self {
            r: Some(lut.clone()),
            g: Some(lut.clone()),
            b: Some(lut),
            a: None,
        }
    }

    /// Curve on alpha only.
    pub fn alpha(lut: Lut) -> Self {
        Self {
            a: Some(lut),
            ..Self::default()
        }
    }

    /// True when no channel has a curve.
    pub fn is_empty(&self) -> bool {
        self.r.is_none() && self.g.is_none() && self.b.is_none() && self.a.is_none()
    }

    fn as_array(&self) -> [Option<&Lut>; 4] {
        [self.r.as_ref(), self.g.as_ref(), self.b.as_ref(), self.a.as_ref()]
    }
}

/// Applies per-channel curves, returning a new image.
///
/// # Example
///
/// ```rust
/// use rastr_core::RgbaImage;
/// use rastr_lut::{ChannelLuts, apply_curves, build_lut};
///
/// let img = RgbaImage::filled(2, 2, [64, 64, 64, 255]).unwrap();
/// let luts = ChannelLuts::rgb(build_lut(64.0, 128.0, 192.0, 192.0, 255));
/// let out = apply_curves(&img, &luts);
/// assert_eq!(out.pixel(0, 0), Some([128, 128, 128, 255]));
/// ```
pub fn apply_curves(src: &RgbaImage, luts: &ChannelLuts) -> RgbaImage {
    trace!(width = src.width(), height = src.height(), "apply_curves");
    let mut out = src.clone();
    apply_curves_in_place(out.as_bytes_mut(), luts);
    out
}

/// Applies per-channel curves to an interleaved RGBA slice.
pub fn apply_curves_in_place(rgba: &mut [u8], luts: &ChannelLuts) {
    let tables = luts.as_array();
    for lut in tables.iter().flatten() {
        if lut.domain_max() != RGBA_MAX {
            warn!(domain_max = lut.domain_max(), "RGBA curve LUT has a non-8-bit domain");
        }
    }

    for px in rgba.chunks_exact_mut(4) {
        for (c, lut) in tables.iter().enumerate() {
            if let Some(lut) = lut {
                px[c] = lut.lookup(px[c]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::build_lut;

    fn gradient() -> RgbaImage {
        let data: Vec<u8> = (0..=255u8).flat_map(|v| [v, 255 - v, v / 2, v]).collect();
        RgbaImage::from_raw(16, 16, data).unwrap()
    }

    #[test]
    fn test_no_luts_is_identity() {
        let img = gradient();
        assert_eq!(apply_curves(&img, &ChannelLuts::default()), img);
    }

    #[test]
    fn test_single_channel() {
        let img = gradient();
        let invert = Lut::from_entries((0..=255u8).rev().collect()).unwrap();
        let luts = ChannelLuts {
            g: Some(invert),
            ..Default::default()
        };
        let out = apply_curves(&img, &luts);
        for (a, b) in img.as_bytes().chunks_exact(4).zip(out.as_bytes().chunks_exact(4)) {
            assert_eq!(a[0], b[0]);
            assert_eq!(255 - a[1], b[1]);
            assert_eq!(a[2], b[2]);
            assert_eq!(a[3], b[3]);
        }
    }

    #[test]
    fn test_alpha_curve() {
        let img = RgbaImage::filled(1, 1, [10, 20, 30, 100]).unwrap();
        let out = apply_curves(&img, &ChannelLuts::alpha(build_lut(100.0, 0.0, 200.0, 255.0, 255)));
        assert_eq!(out.pixel(0, 0), Some([10, 20, 30, 0]));
        // source untouched
        assert_eq!(img.pixel(0, 0), Some([10, 20, 30, 100]));
    }
}
