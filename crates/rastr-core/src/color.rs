//! Eyedropper color information.
//!
//! Converts a picked sRGB pixel into CIE XYZ (D65, scaled to 0..100),
//! CIE L\*a\*b\* and its cylindrical LCh form, and computes WCAG contrast
//! between two colors.

use crate::pixel::{REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R, Rgb8};

/// D65 reference white, XYZ scaled to 0..100.
const D65_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// CIE XYZ tristimulus values (0..100 scale).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Xyz {
    /// X
    pub x: f64,
    /// Y (relative luminance * 100)
    pub y: f64,
    /// Z
    pub z: f64,
}

/// CIE L\*a\*b\*.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lab {
    /// Lightness, 0..100
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

/// Cylindrical Lab, with lightness and chroma divided by 100.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lch {
    /// Lightness, 0..1
    pub l: f64,
    /// Chroma / 100
    pub c: f64,
    /// Hue angle in degrees, [0, 360)
    pub h: f64,
}

/// Everything the color info panel shows for one picked pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorInfo {
    /// Picked color
    pub rgb: Rgb8,
    /// Picked alpha
    pub alpha: u8,
    /// CIE XYZ
    pub xyz: Xyz,
    /// CIE Lab
    pub lab: Lab,
    /// LCh(ab)
    pub lch: Lch,
}

impl ColorInfo {
    /// Builds color info from an RGBA pixel.
    pub fn from_rgba(px: [u8; 4]) -> Self {
        let rgb = Rgb8::new(px[0], px[1], px[2]);
        let xyz = rgb_to_xyz(rgb);
        let lab = xyz_to_lab(xyz);
        Self {
            rgb,
            alpha: px[3],
            xyz,
            lab,
            lch: lab_to_lch(lab),
        }
    }

    /// WCAG contrast against another picked color.
    pub fn contrast_with(&self, other: &ColorInfo) -> f64 {
        contrast_ratio(self.rgb, other.rgb)
    }
}

/// sRGB transfer decode for the XYZ conversion.
#[inline]
fn srgb_to_linear(v: u8) -> f64 {
    let c = v as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB (D65) to XYZ scaled to 0..100.
pub fn rgb_to_xyz(rgb: Rgb8) -> Xyz {
    let r = srgb_to_linear(rgb.r);
    let g = srgb_to_linear(rgb.g);
    let b = srgb_to_linear(rgb.b);
    Xyz {
        x: (r * 0.4124 + g * 0.3576 + b * 0.1805) * 100.0,
        y: (r * 0.2126 + g * 0.7152 + b * 0.0722) * 100.0,
        z: (r * 0.0193 + g * 0.1192 + b * 0.9505) * 100.0,
    }
}

/// XYZ (0..100) to CIE Lab against the D65 white point.
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let f = |t: f64| {
        if t > 0.008856 {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };
    let fx = f(xyz.x / D65_WHITE[0]);
    let fy = f(xyz.y / D65_WHITE[1]);
    let fz = f(xyz.z / D65_WHITE[2]);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Lab to LCh, lightness and chroma scaled by 1/100.
pub fn lab_to_lch(lab: Lab) -> Lch {
    let c = lab.a.hypot(lab.b);
    let h = lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0);
    Lch {
        l: lab.l / 100.0,
        c: c / 100.0,
        h,
    }
}

/// WCAG relative luminance of an sRGB color.
///
/// Uses the 0.03928 linearization threshold from WCAG 2.x.
pub fn relative_luminance(rgb: Rgb8) -> f64 {
    let lin = |v: u8| {
        let c = v as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    REC709_LUMA_R * lin(rgb.r) + REC709_LUMA_G * lin(rgb.g) + REC709_LUMA_B * lin(rgb.b)
}

/// WCAG contrast ratio between two colors, rounded to two decimals.
///
/// # Example
///
/// ```
/// use rastr_core::{Rgb8, contrast_ratio};
///
/// assert_eq!(contrast_ratio(Rgb8::BLACK, Rgb8::WHITE), 21.0);
/// assert_eq!(contrast_ratio(Rgb8::WHITE, Rgb8::WHITE), 1.0);
/// ```
pub fn contrast_ratio(a: Rgb8, b: Rgb8) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let ratio = (la.max(lb) + 0.05) / (la.min(lb) + 0.05);
    (ratio * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_white_point() {
        let info = ColorInfo::from_rgba([255, 255, 255, 255]);
        assert_abs_diff_eq!(info.xyz.x, 95.05, epsilon = 0.01);
        assert_abs_diff_eq!(info.xyz.y, 100.0, epsilon = 0.01);
        assert_abs_diff_eq!(info.xyz.z, 108.9, epsilon = 0.01);
        assert_abs_diff_eq!(info.lab.l, 100.0, epsilon = 0.01);
        assert_abs_diff_eq!(info.lab.a, 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(info.lab.b, 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(info.lch.l, 1.0, epsilon = 0.001);
    }

    #[test]
    fn test_black() {
        let info = ColorInfo::from_rgba([0, 0, 0, 0]);
        assert_eq!(info.alpha, 0);
        assert_abs_diff_eq!(info.lab.l, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(info.lch.c, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_red_hue() {
        let info = ColorInfo::from_rgba([255, 0, 0, 255]);
        assert_abs_diff_eq!(info.xyz.y, 21.26, epsilon = 0.01);
        assert!(info.lab.a > 70.0);
        assert!(info.lch.h > 0.0 && info.lch.h < 90.0);
    }

    #[test]
    fn test_hue_wraps_positive() {
        // blue sits at a negative atan2 angle
        let info = ColorInfo::from_rgba([0, 0, 255, 255]);
        assert!(info.lch.h >= 180.0 && info.lch.h < 360.0);
    }

    #[test]
    fn test_contrast() {
        let gray = Rgb8::new(119, 119, 119);
        let r = contrast_ratio(gray, Rgb8::WHITE);
        assert!(r > 4.4 && r < 4.6);
        assert_eq!(contrast_ratio(Rgb8::WHITE, Rgb8::BLACK), contrast_ratio(Rgb8::BLACK, Rgb8::WHITE));
        let a = ColorInfo::from_rgba([0, 0, 0, 255]);
        let b = ColorInfo::from_rgba([255, 255, 255, 255]);
        assert_eq!(a.contrast_with(&b), 21.0);
    }
}
