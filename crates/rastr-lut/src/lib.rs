//! # rastr-lut
//!
//! Tone curves, lookup tables and histograms.
//!
//! # Curves
//!
//! A curve is a piecewise-linear function through `(0,0)`, two control
//! points and `(max,max)`, sampled into a [`Lut`]:
//!
//! - [`build_lut`] / [`Lut::build`] - Sample a curve over `0..=max`
//! - [`apply_curves`] - Per-channel LUTs over an RGBA image
//! - [`apply_curves_gb7`] - 7-bit luma LUT plus mask rewrite ([`AlphaMode`]) on GB7 bytes
//!
//! # Histograms
//!
//! - [`calc_histogram`] - 256-bin RGB or alpha counts
//! - [`calc_histogram_gb7`] - 128-bin luma plus mask counts
//!
//! # Usage
//!
//! ```rust
//! use rastr_lut::{AlphaMode, apply_curves_gb7, build_lut};
//!
//! // Darken GB7 shadows, then cut out everything darker than 32
//! let lut = build_lut(32.0, 16.0, 96.0, 112.0, 127);
//! let out = apply_curves_gb7(&[0xA0, 0xFF], Some(&lut), AlphaMode::threshold(32));
//! assert_eq!(out, vec![0x10, 0xFF]);
//! ```
//!
//! # Dependencies
//!
//! - [`rastr-core`] - RGBA buffers and GB7 bit helpers
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Diagnostics
//!
//! # Used By
//!
//! - `rastr-cli` - `curves` and `histogram` commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod curves;
mod error;
mod gb7;
mod histogram;
mod lut;

pub use curves::{ChannelLuts, apply_curves, apply_curves_in_place};
pub use error::{LutError, LutResult};
pub use gb7::{AlphaMode, Combine, DEFAULT_THRESHOLD, apply_curves_gb7};
pub use histogram::{Gb7Histogram, Histogram, HistogramOptions, calc_histogram, calc_histogram_gb7};
pub use lut::{CurvePoints, GB7_MAX, Lut, RGBA_MAX, build_lut};
