//! 3x3 spatial filters.
//!
//! Convolution samples the 3x3 neighborhood with clamp-to-edge addressing,
//! divides by the kernel divisor, adds the bias and truncates into `0..=255`.
//! Filters never fail: every input produces a same-sized output.
//!
//! # Presets
//!
//! | Preset     | Coefficients                  | Divisor | Bias |
//! |------------|-------------------------------|---------|------|
//! | identity   | `0 0 0 / 0 1 0 / 0 0 0`       | sum     | 0    |
//! | sharpen    | `0 -1 0 / -1 5 -1 / 0 -1 0`   | sum     | 0    |
//! | gaussian   | `1 2 1 / 2 4 2 / 1 2 1`       | 16      | 0    |
//! | box        | `1 1 1 / 1 1 1 / 1 1 1`       | 9       | 0    |
//! | prewitt-x  | `-1 0 1 / -1 0 1 / -1 0 1`    | 1       | 128  |
//! | prewitt-y  | `-1 -1 -1 / 0 0 0 / 1 1 1`    | 1       | 128  |
//!
//! # Example
//!
//! ```rust
//! use rastr_core::RgbaImage;
//! use rastr_ops::filter::{Kernel3x3, convolve_rgb_3x3};
//!
//! let src = RgbaImage::filled(8, 8, [100, 150, 200, 255]).unwrap();
//! let out = convolve_rgb_3x3(&src, &Kernel3x3::gaussian());
//! assert_eq!(out, src);
//! ```

use rastr_core::RgbaImage;
use tracing::trace;

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// 3x3 convolution kernel, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3 {
    /// Coefficients, row-major
    pub m: [f32; 9],
    /// Explicit divisor; `None` means the coefficient sum (or 1 if it is 0)
    pub divisor: Option<f32>,
    /// Added after division
    pub bias: f32,
}

impl Kernel3x3 {
    /// Kernel with default divisor and no bias.
    pub const fn new(m: [f32; 9]) -> Self {
        Self {
            m,
            divisor: None,
            bias: 0.0,
        }
    }

    /// Sets an explicit divisor.
    pub const fn with_divisor(mut self, divisor: f32) -> Self {
        self.divisor = Some(divisor);
        self
    }

    /// Sets the bias.
    pub const fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Pass-through.
    pub const fn identity() -> Self {
        Self::new([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0])
    }

    /// 4-neighbor sharpen.
    pub const fn sharpen() -> Self {
        Self::new([0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0])
    }

    /// 3x3 Gaussian approximation.
    pub const fn gaussian() -> Self {
        Self::new([1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0]).with_divisor(16.0)
    }

    /// Box average.
    pub const fn box_blur() -> Self {
        Self::new([1.0; 9]).with_divisor(9.0)
    }

    /// Horizontal Prewitt edges, biased to mid-gray.
    pub const fn prewitt_x() -> Self {
        Self::new([-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0])
            .with_divisor(1.0)
            .with_bias(128.0)
    }

    /// Vertical Prewitt edges, biased to mid-gray.
    pub const fn prewitt_y() -> Self {
        Self::new([-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .with_divisor(1.0)
            .with_bias(128.0)
    }

    /// Divisor actually applied.
    ///
    /// An explicit divisor of 0 (or a non-finite one) is treated as 1.
    pub fn effective_divisor(&self) -> f32 {
        match self.divisor {
            Some(d) if d != 0.0 && d.is_finite() => d,
            Some(_) => 1.0,
            None => {
                let sum: f32 = self.m.iter().sum();
                if sum == 0.0 { 1.0 } else { sum }
            }
        }
    }
}

impl Default for Kernel3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::str::FromStr for Kernel3x3 {
    type Err = OpsError;

    /// Parses nine comma- or whitespace-separated coefficients.
    fn from_str(s: &str) -> OpsResult<Self> {
        let values = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<f32>()
                    .map_err(|e| OpsError::InvalidParameter(format!("kernel value '{p}': {e}")))
            })
            .collect::<OpsResult<Vec<f32>>>()?;
        let m: [f32; 9] = values.as_slice().try_into().map_err(|_| {
            OpsError::InvalidParameter(format!("kernel needs 9 values, got {}", values.len()))
        })?;
        Ok(Self::new(m))
    }
}

/// Named kernel presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelPreset {
    /// Pass-through
    Identity,
    /// Sharpen
    Sharpen,
    /// Gaussian blur
    Gaussian,
    /// Box blur
    BoxBlur,
    /// Prewitt horizontal edges
    PrewittX,
    /// Prewitt vertical edges
    PrewittY,
}

impl KernelPreset {
    /// All presets in menu order.
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Identity,
        KernelPreset::Sharpen,
        KernelPreset::Gaussian,
        KernelPreset::BoxBlur,
        KernelPreset::PrewittX,
        KernelPreset::PrewittY,
    ];

    /// The preset's kernel.
    pub const fn kernel(self) -> Kernel3x3 {
        match self {
            KernelPreset::Identity => Kernel3x3::identity(),
            KernelPreset::Sharpen => Kernel3x3::sharpen(),
            KernelPreset::Gaussian => Kernel3x3::gaussian(),
            KernelPreset::BoxBlur => Kernel3x3::box_blur(),
            KernelPreset::PrewittX => Kernel3x3::prewitt_x(),
            KernelPreset::PrewittY => Kernel3x3::prewitt_y(),
        }
    }

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            KernelPreset::Identity => "identity",
            KernelPreset::Sharpen => "sharpen",
            KernelPreset::Gaussian => "gaussian",
            KernelPreset::BoxBlur => "box",
            KernelPreset::PrewittX => "prewitt-x",
            KernelPreset::PrewittY => "prewitt-y",
        }
    }
}

impl std::str::FromStr for KernelPreset {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(KernelPreset::Identity),
            "sharpen" => Ok(KernelPreset::Sharpen),
            "gaussian" | "gauss" | "gauss3" => Ok(KernelPreset::Gaussian),
            "box" | "box-blur" => Ok(KernelPreset::BoxBlur),
            "prewitt-x" | "prewittx" => Ok(KernelPreset::PrewittX),
            "prewitt-y" | "prewitty" => Ok(KernelPreset::PrewittY),
            other => Err(OpsError::InvalidParameter(format!("unknown kernel preset '{other}'"))),
        }
    }
}

/// RGBA channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
    /// Alpha
    A,
}

impl Channel {
    /// Byte offset inside an RGBA pixel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3,
        }
    }
}

#[inline]
fn clamp8(v: f32) -> u8 {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

fn convolve_channels(src: &RgbaImage, channels: &[usize], kernel: &Kernel3x3) -> RgbaImage {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let divisor = kernel.effective_divisor();
    let bias = kernel.bias;
    let m = kernel.m;
    let data = src.as_bytes();
    trace!(width = w, height = h, ?channels, divisor, bias, "convolve");

    let mut out = src.clone();
    for_each_row(out.as_bytes_mut(), w * 4, |y, row| {
        let rows = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let cols = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            for &c in channels {
                let mut acc = 0.0f32;
                for (ky, &sy) in rows.iter().enumerate() {
                    for (kx, &sx) in cols.iter().enumerate() {
                        acc += data[(sy * w + sx) * 4 + c] as f32 * m[ky * 3 + kx];
                    }
                }
                row[x * 4 + c] = clamp8(acc / divisor + bias);
            }
        }
    });
    out
}

/// Convolves one channel; the other three are copied unchanged.
pub fn convolve_channel(src: &RgbaImage, channel: Channel, kernel: &Kernel3x3) -> RgbaImage {
    convolve_channels(src, &[channel.index()], kernel)
}

/// Convolves R, G and B; alpha is copied unchanged.
pub fn convolve_rgb_3x3(src: &RgbaImage, kernel: &Kernel3x3) -> RgbaImage {
    convolve_channels(src, &[0, 1, 2], kernel)
}

/// Convolves alpha only; RGB is copied unchanged.
pub fn convolve_alpha_3x3(src: &RgbaImage, kernel: &Kernel3x3) -> RgbaImage {
    convolve_channels(src, &[3], kernel)
}
