//! Integer lookup tables for tone curves.
//!
//! A [`Lut`] maps every value of a channel domain `0..=max` to an output in
//! the same domain. 8-bit channels use `max = 255`, GB7 luma uses `max = 127`.

use crate::{LutError, LutResult};

/// Domain maximum for 8-bit RGBA channels.
pub const RGBA_MAX: u8 = 255;

/// Domain maximum for GB7 luma.
pub const GB7_MAX: u8 = rastr_core::pixel::GB7_LUMA_MAX;

/// Fixed-length lookup table, `domain_max + 1` entries each in `[0, domain_max]`.
///
/// # Example
///
/// ```rust
/// use rastr_lut::Lut;
///
/// let lut = Lut::build(64.0, 32.0, 192.0, 224.0, 255);
/// assert_eq!(lut.len(), 256);
/// assert_eq!(lut.lookup(64), 32);
/// assert_eq!(lut.lookup(255), 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    table: Vec<u8>,
}

impl Lut {
    /// Identity table over `0..=max`.
    pub fn identity(max: u8) -> Self {
        Self {
            table: (0..=max).collect(),
        }
    }

    /// Piecewise-linear curve through `(0,0) -> (x1,y1) -> (x2,y2) -> (max,max)`.
    ///
    /// Coordinates are rounded and clamped to `[0, max]`. If `x1 > x2` the two
    /// control points swap. A segment with zero x-span yields its right
    /// endpoint's y. NaN coordinates are treated as 0.
    pub fn build(x1: f64, y1: f64, x2: f64, y2: f64, max: u8) -> Self {
        let top = max as f64;
        let clamp = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.round().clamp(0.0, top)
            }
        };

        let (mut px1, mut py1, mut px2, mut py2) = (clamp(x1), clamp(y1), clamp(x2), clamp(y2));
        if px1 > px2 {
            std::mem::swap(&mut px1, &mut px2);
            std::mem::swap(&mut py1, &mut py2);
        }

        let seg = |x: f64, x0: f64, y0: f64, x1: f64, y1: f64| {
            if x1 == x0 {
                return y1;
            }
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        };

        let table = (0..=max)
            .map(|x| {
                let x = x as f64;
                let y = if x <= px1 {
                    seg(x, 0.0, 0.0, px1, py1)
                } else if x <= px2 {
                    seg(x, px1, py1, px2, py2)
                } else {
                    seg(x, px2, py2, top, top)
                };
                clamp(y) as u8
            })
            .collect();

        Self { table }
    }

    /// Wraps raw entries, validating length (`2..=256`) and domain.
    pub fn from_entries(entries: Vec<u8>) -> LutResult<Self> {
        if entries.len() < 2 || entries.len() > 256 {
            return Err(LutError::InvalidSize(format!(
                "expected 2..=256 entries, got {}",
                entries.len()
            )));
        }
        let max = (entries.len() - 1) as u8;
        if let Some((index, &value)) = entries.iter().enumerate().find(|&(_, &v)| v > max) {
            return Err(LutError::OutOfDomain { index, value, max });
        }
        Ok(Self { table: entries })
    }

    /// Largest input (and output) value.
    #[inline]
    pub fn domain_max(&self) -> u8 {
        (self.table.len() - 1) as u8
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false; a table has at least two entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Maps a value. Inputs above the domain clamp to the last entry.
    #[inline]
    pub fn lookup(&self, v: u8) -> u8 {
        let i = (v as usize).min(self.table.len() - 1);
        self.table[i]
    }

    /// True when every entry maps to itself.
    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(i, &v)| i == v as usize)
    }

    /// Table entries.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }
}

/// Builds a piecewise-linear curve LUT. See [`Lut::build`].
pub fn build_lut(x1: f64, y1: f64, x2: f64, y2: f64, max: u8) -> Lut {
    Lut::build(x1, y1, x2, y2, max)
}

/// Two curve control points, as edited in the curves panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoints {
    /// First point x
    pub x1: f64,
    /// First point y
    pub y1: f64,
    /// Second point x
    pub x2: f64,
    /// Second point y
    pub y2: f64,
}

impl CurvePoints {
    /// Creates control points.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Points that produce the identity curve for a domain.
    pub fn identity(max: u8) -> Self {
        let third = max as f64 / 3.0;
        Self::new(third, third, 2.0 * third, 2.0 * third)
    }

    /// Builds the LUT over `0..=max`.
    pub fn to_lut(&self, max: u8) -> Lut {
        Lut::build(self.x1, self.y1, self.x2, self.y2, max)
    }
}

impl std::str::FromStr for CurvePoints {
    type Err = LutError;

    /// Parses `"x1,y1,x2,y2"`.
    fn from_str(s: &str) -> LutResult<Self> {
        let values = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|e| LutError::ParseError(format!("'{p}': {e}")))
            })
            .collect::<LutResult<Vec<f64>>>()?;
        match values.as_slice() {
            &[x1, y1, x2, y2] => Ok(Self::new(x1, y1, x2, y2)),
            _ => Err(LutError::ParseError(format!(
                "expected x1,y1,x2,y2 but got {} values",
                values.len()
            ))),
        }
    }
}
