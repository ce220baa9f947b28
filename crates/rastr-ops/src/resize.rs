//! Image resampling and resize requests.
//!
//! Two interpolators, both operating on all four RGBA channels:
//!
//! - **Nearest** - `src = floor(dst * src_size / dst_size)`, pixels copied verbatim
//! - **Bilinear** - source position `dst * (src_size - 1) / dst_size`, 2x2 blend,
//!   rounded to the nearest integer
//!
//! Target sizes must be positive; [`target_dimensions`] validates fractional
//! sizes before any allocation.
//!
//! # Example
//!
//! ```rust
//! use rastr_core::RgbaImage;
//! use rastr_ops::resize::{Interpolation, resize};
//!
//! let src = RgbaImage::filled(4, 4, [10, 20, 30, 255]).unwrap();
//! let big = resize(&src, 8, 6, Interpolation::Nearest).unwrap();
//! assert_eq!(big.dimensions(), (8, 6));
//! ```

use rastr_core::{LayerData, LayerImage, RgbaImage, unpack_gb7};
use tracing::{debug, trace};

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    /// Nearest neighbor (pixel art, masks).
    Nearest,
    /// Bilinear (smooth).
    #[default]
    Bilinear,
}

impl Interpolation {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Interpolation {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "nn" => Ok(Interpolation::Nearest),
            "bilinear" | "linear" => Ok(Interpolation::Bilinear),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown interpolation '{other}' (nearest, bilinear)"
            ))),
        }
    }
}

/// Converts fractional target sizes into whole pixels.
///
/// Rejects non-finite and non-positive values. Positive values round to the
/// nearest integer with a floor of 1.
pub fn target_dimensions(width: f64, height: f64) -> OpsResult<(u32, u32)> {
    Ok((to_pixels(width, "width")?, to_pixels(height, "height")?))
}

fn to_pixels(v: f64, what: &str) -> OpsResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(OpsError::InvalidDimension(format!("{what} {v} must be finite and > 0")));
    }
    let r = v.round().max(1.0);
    if r > u32::MAX as f64 {
        return Err(OpsError::InvalidDimension(format!("{what} {v} is too large")));
    }
    Ok(r as u32)
}

fn check_target(dst_w: u32, dst_h: u32) -> OpsResult<()> {
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimension(format!(
            "target {dst_w}x{dst_h} must be > 0"
        )));
    }
    Ok(())
}

/// Nearest-neighbor resampling.
pub fn nearest_neighbor(src: &RgbaImage, dst_w: u32, dst_h: u32) -> OpsResult<RgbaImage> {
    check_target(dst_w, dst_h)?;
    let (sw, sh) = (src.width() as u64, src.height() as u64);
    trace!(sw, sh, dst_w, dst_h, "nearest_neighbor");

    let data = src.as_bytes();
    let (dw, dh) = (dst_w as u64, dst_h as u64);
    let mut out = RgbaImage::transparent(dst_w, dst_h)?;
    for_each_row(out.as_bytes_mut(), dst_w as usize * 4, |y, row| {
        let sy = (y as u64 * sh / dh) as usize;
        let src_row = sy * sw as usize;
        for x in 0..dst_w as usize {
            let sx = (x as u64 * sw / dw) as usize;
            let si = (src_row + sx) * 4;
            row[x * 4..x * 4 + 4].copy_from_slice(&data[si..si + 4]);
        }
    });
    Ok(out)
}

/// Bilinear resampling.
pub fn bilinear(src: &RgbaImage, dst_w: u32, dst_h: u32) -> OpsResult<RgbaImage> {
    check_target(dst_w, dst_h)?;
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    trace!(sw, sh, dst_w, dst_h, "bilinear");

    let x_ratio = (sw - 1) as f64 / dst_w as f64;
    let y_ratio = (sh - 1) as f64 / dst_h as f64;
    let data = src.as_bytes();
    let mut out = RgbaImage::transparent(dst_w, dst_h)?;
    for_each_row(out.as_bytes_mut(), dst_w as usize * 4, |y, row| {
        let gy = y as f64 * y_ratio;
        let y0 = (gy.floor() as usize).min(sh - 1);
        let y1 = (y0 + 1).min(sh - 1);
        let dy = gy - y0 as f64;

        for x in 0..dst_w as usize {
            let gx = x as f64 * x_ratio;
            let x0 = (gx.floor() as usize).min(sw - 1);
            let x1 = (x0 + 1).min(sw - 1);
            let dx = gx - x0 as f64;

            let i00 = (y0 * sw + x0) * 4;
            let i01 = (y0 * sw + x1) * 4;
            let i10 = (y1 * sw + x0) * 4;
            let i11 = (y1 * sw + x1) * 4;
            for c in 0..4 {
                let v = data[i00 + c] as f64 * (1.0 - dx) * (1.0 - dy)
                    + data[i01 + c] as f64 * dx * (1.0 - dy)
                    + data[i10 + c] as f64 * (1.0 - dx) * dy
                    + data[i11 + c] as f64 * dx * dy;
                row[x * 4 + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    Ok(out)
}

/// Resamples with the chosen interpolation.
pub fn resize(src: &RgbaImage, dst_w: u32, dst_h: u32, interpolation: Interpolation) -> OpsResult<RgbaImage> {
    match interpolation {
        Interpolation::Nearest => nearest_neighbor(src, dst_w, dst_h),
        Interpolation::Bilinear => bilinear(src, dst_w, dst_h),
    }
}

/// Resizes a layer, keeping its display attributes.
///
/// Flat layers only change size. GB7 layers are unpacked (mask honored) and
/// come back as raster layers.
pub fn resize_layer(
    layer: &LayerImage,
    dst_w: u32,
    dst_h: u32,
    interpolation: Interpolation,
) -> OpsResult<LayerImage> {
    check_target(dst_w, dst_h)?;
    let (w, h) = layer.dimensions();
    debug!(w, h, dst_w, dst_h, %interpolation, kind = layer.data().kind(), "resize_layer");

    let rgba = match layer.data() {
        LayerData::Flat { color } => return Ok(layer.with_flat(dst_w, dst_h, *color)?),
        LayerData::Raster { rgba } => RgbaImage::from_raw(w, h, rgba.clone())?,
        LayerData::Gb7 { packed } => RgbaImage::from_raw(w, h, unpack_gb7(packed, layer.has_alpha()))?,
    };
    let scaled = resize(&rgba, dst_w, dst_h, interpolation)?;
    Ok(layer.with_raster(dst_w, dst_h, scaled.into_raw())?)
}

/// Unit of a [`ResizeRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeUnit {
    /// Absolute pixels, 1..=10000.
    #[default]
    Pixels,
    /// Percent of the source size, 1..=200.
    Percent,
}

impl ResizeUnit {
    /// Allowed input range.
    pub const fn limits(self) -> (u32, u32) {
        match self {
            ResizeUnit::Pixels => (1, 10_000),
            ResizeUnit::Percent => (1, 200),
        }
    }
}

impl std::str::FromStr for ResizeUnit {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "px" | "pixels" => Ok(ResizeUnit::Pixels),
            "%" | "pct" | "percent" => Ok(ResizeUnit::Percent),
            other => Err(OpsError::InvalidParameter(format!("unknown resize unit '{other}'"))),
        }
    }
}

/// User-facing resize request, as entered in the resize dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Unit of `width` / `height`
    pub unit: ResizeUnit,
    /// Requested width
    pub width: u32,
    /// Requested height (ignored when `keep_ratio` is set)
    pub height: u32,
    /// Derive the height from the width and the source aspect ratio
    pub keep_ratio: bool,
}

impl Default for ResizeRequest {
    fn default() -> Self {
        Self {
            unit: ResizeUnit::Percent,
            width: 100,
            height: 100,
            keep_ratio: true,
        }
    }
}

impl ResizeRequest {
    /// Resolves the request into target pixels for a `src_w` x `src_h` source.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rastr_ops::resize::{ResizeRequest, ResizeUnit};
    ///
    /// let req = ResizeRequest { unit: ResizeUnit::Percent, width: 50, height: 0, keep_ratio: true };
    /// assert_eq!(req.resolve(640, 480).unwrap(), (320, 240));
    /// ```
    pub fn resolve(&self, src_w: u32, src_h: u32) -> OpsResult<(u32, u32)> {
        check_target(src_w, src_h)?;
        let (min, max) = self.unit.limits();

        let height = if self.keep_ratio {
            match self.unit {
                ResizeUnit::Pixels => {
                    (self.width as f64 * src_h as f64 / src_w as f64).round() as u32
                }
                ResizeUnit::Percent => self.width,
            }
        } else {
            self.height
        };

        for (what, v) in [("width", self.width), ("height", height)] {
            if v < min || v > max {
                return Err(OpsError::OutOfRange(format!(
                    "{what} {v} outside {min}..={max} for {:?}",
                    self.unit
                )));
            }
        }

        Ok(match self.unit {
            ResizeUnit::Pixels => (self.width, height),
            ResizeUnit::Percent => (percent_of(src_w, self.width), percent_of(src_h, height)),
        })
    }
}

fn percent_of(size: u32, pct: u32) -> u32 {
    ((size as f64 * pct as f64 / 100.0).round() as u32).max(1)
}

/// Scale that fits `width` x `height` into a viewport minus `padding` on each side.
pub fn fit_scale(width: u32, height: u32, viewport_w: u32, viewport_h: u32, padding: u32) -> OpsResult<f64> {
    check_target(width, height)?;
    let avail_w = viewport_w as f64 - 2.0 * padding as f64;
    let avail_h = viewport_h as f64 - 2.0 * padding as f64;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return Err(OpsError::InvalidDimension(format!(
            "viewport {viewport_w}x{viewport_h} leaves no room with padding {padding}"
        )));
    }
    Ok((avail_w / width as f64).min(avail_h / height as f64))
}

/// Dimensions scaled by `scale`, floored.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let f = |v: u32| (v as f64 * scale).floor().clamp(0.0, u32::MAX as f64) as u32;
    (f(width), f(height))
}
