//! Pixel-level primitives shared by every rastr crate.
//!
//! - [`Rgb8`] - an 8-bit RGB triple, the fill color of flat layers
//! - BT.709 luma coefficients and the 8-bit luma helper used by the GB7 encoder
//! - 7-bit <-> 8-bit gray conversions for GB7 luma
//! - GB7 byte layout constants (`bit7` = mask, `bits6..0` = luma)

use crate::{Error, Result};

/// Rec.709 luma coefficient for red.
pub const REC709_LUMA_R: f64 = 0.2126;

/// Rec.709 luma coefficient for green.
pub const REC709_LUMA_G: f64 = 0.7152;

/// Rec.709 luma coefficient for blue.
pub const REC709_LUMA_B: f64 = 0.0722;

/// Rec.709 luma coefficients as an array [R, G, B].
pub const REC709_LUMA: [f64; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Mask bit of a packed GB7 pixel.
pub const GB7_MASK_BIT: u8 = 0x80;

/// Luma bits of a packed GB7 pixel.
pub const GB7_LUMA_BITS: u8 = 0x7f;

/// Largest 7-bit luma value.
pub const GB7_LUMA_MAX: u8 = 127;

/// Computes 8-bit BT.709 luma: `round(0.2126R + 0.7152G + 0.0722B)`.
///
/// # Example
///
/// ```
/// use rastr_core::pixel::luma709;
///
/// assert_eq!(luma709(255, 255, 255), 255);
/// assert_eq!(luma709(0, 255, 0), 182);
/// ```
#[inline]
pub fn luma709(r: u8, g: u8, b: u8) -> u8 {
    let y = REC709_LUMA_R * r as f64 + REC709_LUMA_G * g as f64 + REC709_LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Expands 7-bit luma to 8 bits: `floor(l7 * 255 / 127)`.
#[inline]
pub fn gray7_to_8(l7: u8) -> u8 {
    let l7 = (l7 & GB7_LUMA_BITS) as u32;
    (l7 * 255 / 127) as u8
}

/// Quantizes 8-bit gray to 7 bits: `round(g8 * 127 / 255)` clamped to [0, 127].
#[inline]
pub fn gray8_to_7(g8: u8) -> u8 {
    let v = (g8 as f64 * 127.0 / 255.0).round();
    v.clamp(0.0, GB7_LUMA_MAX as f64) as u8
}

/// Returns the 7-bit luma of a packed GB7 pixel.
#[inline]
pub fn gb7_luma(byte: u8) -> u8 {
    byte & GB7_LUMA_BITS
}

/// Returns `true` when the mask bit of a packed GB7 pixel is set.
#[inline]
pub fn gb7_mask(byte: u8) -> bool {
    byte & GB7_MASK_BIT != 0
}

/// Packs a mask flag and a 7-bit luma into one GB7 byte.
#[inline]
pub fn gb7_pack(mask: bool, luma7: u8) -> u8 {
    (if mask { GB7_MASK_BIT } else { 0 }) | (luma7 & GB7_LUMA_BITS)
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional, hex digits are case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use rastr_core::Rgb8;
    ///
    /// assert_eq!(Rgb8::from_hex("#ff0000").unwrap(), Rgb8::new(255, 0, 0));
    /// assert_eq!(Rgb8::from_hex("0f0").unwrap(), Rgb8::new(0, 255, 0));
    /// assert!(Rgb8::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let digit = |c: u8| (c as char).to_digit(16).map(|d| d as u8).ok_or_else(invalid);
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = digit(bytes[0])?;
                let g = digit(bytes[1])?;
                let b = digit(bytes[2])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let pair = |i: usize| -> Result<u8> { Ok(digit(bytes[i])? << 4 | digit(bytes[i + 1])?) };
                Ok(Self::new(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// BT.709 luma of this color.
    #[inline]
    pub fn luma(self) -> u8 {
        luma709(self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights_sum_to_one() {
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            assert_eq!(luma709(v, v, v), v);
        }
    }

    #[test]
    fn test_luma_primaries() {
        assert_eq!(luma709(255, 0, 0), 54);
        assert_eq!(luma709(0, 255, 0), 182);
        assert_eq!(luma709(0, 0, 255), 18);
    }

    #[test]
    fn test_gray_7_8_roundtrip() {
        for l7 in 0..=GB7_LUMA_MAX {
            assert_eq!(gray8_to_7(gray7_to_8(l7)), l7);
        }
        assert_eq!(gray7_to_8(127), 255);
        assert_eq!(gray7_to_8(1), 2);
        assert_eq!(gray8_to_7(255), 127);
    }

    #[test]
    fn test_gb7_pack() {
        assert_eq!(gb7_pack(true, 127), 0xFF);
        assert_eq!(gb7_pack(false, 127), 0x7F);
        assert_eq!(gb7_pack(true, 0), 0x80);
        assert!(gb7_mask(0x80));
        assert!(!gb7_mask(0x7F));
        assert_eq!(gb7_luma(0xFF), 127);
    }

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgb8::from_hex("#FF8000").unwrap(), Rgb8::new(255, 128, 0));
        assert_eq!(Rgb8::from_hex("  #abc ").unwrap(), Rgb8::new(0xaa, 0xbb, 0xcc));
        assert!(Rgb8::from_hex("#gg0000").is_err());
        assert!(Rgb8::from_hex("").is_err());
        assert!(Rgb8::from_hex("#ффф").is_err());
        assert_eq!("#010203".parse::<Rgb8>().unwrap().to_hex(), "#010203");
    }
}
