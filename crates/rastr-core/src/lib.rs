//! # rastr-core
//!
//! Core layer types for the rastr pixel engine.
//!
//! This crate provides the foundational types used throughout the rastr workspace:
//!
//! - [`LayerImage`], [`LayerData`] - Layer records over raster, GB7 and flat storage
//! - [`RgbaImage`] - Canonical 8-bit RGBA buffer every operation works on
//! - [`to_rgba`] - The normalizer turning any layer into [`RgbaImage`]
//! - [`LayerStack`] - Ordered, capacity-limited layer list
//! - [`ColorInfo`] - Eyedropper color conversions (XYZ, Lab, LCh, contrast)
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. Every other rastr crate builds on it:
//!
//! ```text
//! rastr-core (this crate)
//!    ^
//!    |
//!    +-- rastr-io  (GB7 codec, PNG)
//!    +-- rastr-lut (curves, histograms)
//!    +-- rastr-ops (convolution, resampling, compositing)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for value types (`Rgb8`, `BlendMode`, `ColorInfo`, ...)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod layer;
pub mod pixel;
pub mod rgba;
pub mod stack;

// Re-exports for convenience
pub use color::{ColorInfo, Lab, Lch, Xyz, contrast_ratio};
pub use error::{Error, Result};
pub use layer::{BlendMode, LayerData, LayerImage};
pub use pixel::{REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R, Rgb8, luma709};
pub use rgba::{NormalizeMode, NormalizeOptions, RgbaImage, to_rgba, unpack_gb7};
pub use stack::{LayerStack, StackConfig};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use rastr_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::layer::{BlendMode, LayerData, LayerImage};
    pub use crate::pixel::Rgb8;
    pub use crate::rgba::{NormalizeMode, NormalizeOptions, RgbaImage, to_rgba};
    pub use crate::stack::{LayerStack, StackConfig};
}
