//! Curves and mask edits on packed GB7 pixels.
//!
//! Luma curves run in the native 7-bit domain (`Lut` with `domain_max = 127`).
//! The mask bit is rewritten according to an [`AlphaMode`].

use rastr_core::pixel::{GB7_LUMA_MAX, gb7_luma, gb7_mask, gb7_pack};
use tracing::{trace, warn};

use crate::lut::{GB7_MAX, Lut};

/// Default luma threshold for [`AlphaMode::Threshold`].
pub const DEFAULT_THRESHOLD: u8 = 64;

/// How a thresholded mask bit merges with the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// Threshold bit only.
    Replace,
    /// Existing AND threshold.
    #[default]
    And,
    /// Existing OR threshold.
    Or,
}

impl std::str::FromStr for Combine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Combine::Replace),
            "and" => Ok(Combine::And),
            "or" => Ok(Combine::Or),
            other => Err(format!("unknown combine mode '{other}' (replace, and, or)")),
        }
    }
}

/// Mask handling for [`apply_curves_gb7`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Keep the mask bit.
    #[default]
    Preserve,
    /// Set every mask bit.
    Opaque,
    /// Clear every mask bit.
    Transparent,
    /// Derive the mask from luma.
    Threshold {
        /// Luma threshold in 0..=127
        threshold: u8,
        /// Pass when luma is below the threshold instead of at/above
        invert: bool,
        /// Merge with the existing bit
        combine: Combine,
    },
}

impl AlphaMode {
    /// Threshold mode with `invert = false` and `combine = And`.
    pub fn threshold(threshold: u8) -> Self {
        AlphaMode::Threshold {
            threshold,
            invert: false,
            combine: Combine::And,
        }
    }

    /// True when the mode rewrites mask bits rather than passing them through.
    pub fn writes_mask(&self) -> bool {
        !matches!(self, AlphaMode::Preserve)
    }
}

/// Applies an optional 7-bit luma LUT and an alpha mode to packed GB7 bytes.
///
/// The threshold test uses the new luma when a LUT is given, else the
/// input luma. LUT outputs above 127 clamp to 127.
///
/// # Example
///
/// ```rust
/// use rastr_lut::{AlphaMode, apply_curves_gb7};
///
/// let px = [0x00, 0x7F, 0x80, 0xFF];
/// assert_eq!(apply_curves_gb7(&px, None, AlphaMode::Preserve), px.to_vec());
/// assert_eq!(apply_curves_gb7(&px, None, AlphaMode::Opaque), vec![0x80, 0xFF, 0x80, 0xFF]);
/// ```
pub fn apply_curves_gb7(pixels: &[u8], y_lut: Option<&Lut>, mode: AlphaMode) -> Vec<u8> {
    trace!(len = pixels.len(), has_lut = y_lut.is_some(), ?mode, "apply_curves_gb7");
    if let Some(lut) = y_lut {
        if lut.domain_max() != GB7_MAX {
            warn!(domain_max = lut.domain_max(), "GB7 luma LUT is not in the 0..127 domain");
        }
    }

    pixels
        .iter()
        .map(|&byte| {
            let y7 = gb7_luma(byte);
            let a_bit = gb7_mask(byte);
            let new_y = match y_lut {
                Some(lut) => lut.lookup(y7).min(GB7_LUMA_MAX),
                None => y7,
            };

            let new_a = match mode {
                AlphaMode::Preserve => a_bit,
                AlphaMode::Opaque => true,
                AlphaMode::Transparent => false,
                AlphaMode::Threshold {
                    threshold,
                    invert,
                    combine,
                } => {
                    let pass = if invert { new_y < threshold } else { new_y >= threshold };
                    match combine {
                        Combine::Replace => pass,
                        Combine::And => a_bit && pass,
                        Combine::Or => a_bit || pass,
                    }
                }
            };

            gb7_pack(new_a, new_y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::build_lut;

    const PX: [u8; 4] = [0x00, 0x7F, 0x80, 0xFF];

    #[test]
    fn test_preserve_without_lut_is_identity() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(apply_curves_gb7(&all, None, AlphaMode::Preserve), all);
    }

    #[test]
    fn test_opaque_transparent() {
        assert_eq!(apply_curves_gb7(&PX, None, AlphaMode::Opaque), vec![0x80, 0xFF, 0x80, 0xFF]);
        assert_eq!(apply_curves_gb7(&PX, None, AlphaMode::Transparent), vec![0x00, 0x7F, 0x00, 0x7F]);
    }

    #[test]
    fn test_threshold_combine() {
        let px = [0x10, 0x50, 0x90, 0xD0]; // luma 16, 80, 16, 80; masks 0, 0, 1, 1
        let replace = AlphaMode::Threshold {
            threshold: 64,
            invert: false,
            combine: Combine::Replace,
        };
        assert_eq!(apply_curves_gb7(&px, None, replace), vec![0x10, 0xD0, 0x10, 0xD0]);
        assert_eq!(apply_curves_gb7(&px, None, AlphaMode::threshold(64)), vec![0x10, 0x50, 0x10, 0xD0]);

        let or = AlphaMode::Threshold {
            threshold: 64,
            invert: false,
            combine: Combine::Or,
        };
        assert_eq!(apply_curves_gb7(&px, None, or), vec![0x10, 0xD0, 0x90, 0xD0]);

        let inverted = AlphaMode::Threshold {
            threshold: 64,
            invert: true,
            combine: Combine::Replace,
        };
        assert_eq!(apply_curves_gb7(&px, None, inverted), vec![0x90, 0x50, 0x90, 0x50]);
    }

    #[test]
    fn test_threshold_uses_new_luma() {
        // lift everything to full brightness, then threshold
        let lift = build_lut(1.0, 127.0, 2.0, 127.0, 127);
        let out = apply_curves_gb7(
            &[0x10],
            Some(&lift),
            AlphaMode::Threshold {
                threshold: 100,
                invert: false,
                combine: Combine::Replace,
            },
        );
        assert_eq!(out, vec![0xFF]);
    }

    #[test]
    fn test_lut_domain_is_7_bit() {
        let identity = Lut::identity(127);
        assert_eq!(apply_curves_gb7(&PX, Some(&identity), AlphaMode::Preserve), PX.to_vec());

        // an 8-bit table is clamped into 0..127 instead of shifted
        let wide = Lut::identity(255);
        let out = apply_curves_gb7(&[0x7F], Some(&wide), AlphaMode::Preserve);
        assert_eq!(out, vec![0x7F]);
    }

    #[test]
    fn test_writes_mask() {
        assert!(!AlphaMode::Preserve.writes_mask());
        assert!(AlphaMode::Opaque.writes_mask());
        assert!(AlphaMode::Transparent.writes_mask());
        assert!(AlphaMode::threshold(10).writes_mask());
    }

    #[test]
    fn test_combine_parse() {
        assert_eq!("OR".parse::<Combine>().unwrap(), Combine::Or);
        assert!("xor".parse::<Combine>().is_err());
        assert_eq!(Combine::default(), Combine::And);
    }
}
