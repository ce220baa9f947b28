//! # rastr-ops
//!
//! Pixel operations for the rastr editor: the parts that touch every pixel.
//!
//! # Modules
//!
//! - [`filter`] - 3x3 convolution with presets and custom kernels
//! - [`resize`] - Nearest/bilinear resampling and resize requests
//! - [`composite`] - Blend modes and source-over drawing
//! - [`render`] - Layer stack flattening with placement metadata
//!
//! # Example
//!
//! ```rust
//! use rastr_core::{LayerImage, Rgb8};
//! use rastr_ops::render::{RenderOptions, render};
//!
//! let layers = vec![LayerImage::flat(8, 8, Rgb8::WHITE).unwrap()];
//! let out = render(&layers, &RenderOptions::default()).unwrap().unwrap();
//! assert_eq!(out.width(), 8);
//! ```
//!
//! ## Convolution
//!
//! ```rust,ignore
//! use rastr_ops::filter::{KernelPreset, convolve_rgb_3x3};
//!
//! let sharp = convolve_rgb_3x3(&image, &KernelPreset::Sharpen.kernel());
//! ```
//!
//! ## Resize
//!
//! ```rust,ignore
//! use rastr_ops::resize::{Interpolation, resize};
//!
//! let scaled = resize(&image, 1920, 1080, Interpolation::Bilinear)?;
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - row and layer parallelism via rayon (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;
pub mod composite;
pub mod filter;
pub mod render;
pub mod resize;

pub use composite::BlendMode;
pub use error::{OpsError, OpsResult};
pub use filter::{Kernel3x3, KernelPreset};
pub use render::{RenderOptions, RenderOutput, render};
pub use resize::Interpolation;
