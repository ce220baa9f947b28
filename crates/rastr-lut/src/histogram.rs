//! Channel histograms for the curves panel.
//!
//! Every histogram sums to the pixel count of its input.

use rastr_core::pixel::{gb7_luma, gb7_mask};
use rastr_core::RgbaImage;

/// Options for [`calc_histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistogramOptions {
    /// Count the alpha channel only
    pub alpha_only: bool,
}

/// 256-bin histogram of an RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Histogram {
    /// Per-channel color counts.
    Rgb {
        /// Red bins
        r: Vec<u32>,
        /// Green bins
        g: Vec<u32>,
        /// Blue bins
        b: Vec<u32>,
    },
    /// Alpha counts.
    Alpha {
        /// Alpha bins
        a: Vec<u32>,
    },
}

impl Histogram {
    /// Largest bin across all channels, at least 1 (for graph scaling).
    pub fn peak(&self) -> u32 {
        match self {
            Histogram::Rgb { r, g, b } => peak_of(r).max(peak_of(g)).max(peak_of(b)),
            Histogram::Alpha { a } => peak_of(a),
        }
    }

    /// `(name, bins)` pairs in channel order.
    pub fn channels(&self) -> Vec<(&'static str, &[u32])> {
        match self {
            Histogram::Rgb { r, g, b } => vec![("r", r.as_slice()), ("g", g.as_slice()), ("b", b.as_slice())],
            Histogram::Alpha { a } => vec![("a", a.as_slice())],
        }
    }
}

/// Histogram of packed GB7 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gb7Histogram {
    /// 128 luma bins
    pub y: Vec<u32>,
    /// `[mask clear, mask set]`
    pub alpha: [u32; 2],
}

impl Gb7Histogram {
    /// Largest luma bin, at least 1.
    pub fn peak(&self) -> u32 {
        peak_of(&self.y)
    }

    /// Alpha counts spread over a 128-bin chart: `[0]` = clear, `[127]` = set.
    pub fn alpha_distribution(&self) -> Vec<u32> {
        let mut dist = vec![0; 128];
        dist[0] = self.alpha[0];
        dist[127] = self.alpha[1];
        dist
    }
}

fn peak_of(bins: &[u32]) -> u32 {
    bins.iter().copied().max().unwrap_or(0).max(1)
}

/// Counts 256-bin RGB or alpha frequencies.
///
/// # Example
///
/// ```rust
/// use rastr_core::RgbaImage;
/// use rastr_lut::{Histogram, HistogramOptions, calc_histogram};
///
/// let img = RgbaImage::filled(4, 4, [10, 20, 30, 255]).unwrap();
/// let Histogram::Rgb { r, .. } = calc_histogram(&img, HistogramOptions::default()) else {
///     unreachable!()
/// };
/// assert_eq!(r[10], 16);
/// ```
pub fn calc_histogram(img: &RgbaImage, opts: HistogramOptions) -> Histogram {
    let data = img.as_bytes();
    if opts.alpha_only {
        let mut a = vec![0u32; 256];
        for px in data.chunks_exact(4) {
            a[px[3] as usize] += 1;
        }
        return Histogram::Alpha { a };
    }

    let mut r = vec![0u32; 256];
    let mut g = vec![0u32; 256];
    let mut b = vec![0u32; 256];
    for px in data.chunks_exact(4) {
        r[px[0] as usize] += 1;
        g[px[1] as usize] += 1;
        b[px[2] as usize] += 1;
    }
    Histogram::Rgb { r, g, b }
}

/// Counts 7-bit luma and mask frequencies of packed GB7 bytes.
pub fn calc_histogram_gb7(pixels: &[u8]) -> Gb7Histogram {
    let mut y = vec![0u32; 128];
    let mut alpha = [0u32; 2];
    for &byte in pixels {
        y[gb7_luma(byte) as usize] += 1;
        alpha[gb7_mask(byte) as usize] += 1;
    }
    Gb7Histogram { y, alpha }
}
