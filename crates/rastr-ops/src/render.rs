//! Layer stack rendering.
//!
//! [`render`] flattens an ordered list of layers (bottom first) into one RGBA
//! canvas:
//!
//! 1. The canvas takes the size of the first non-deleted layer times
//!    `base_scale * content_scale`, rounded.
//! 2. Deleted and hidden layers are skipped.
//! 3. Each remaining layer is normalized to RGBA, resampled to its own
//!    scaled size and centered on the canvas.
//! 4. Layers are blended in order with their blend mode and opacity.
//!
//! Placement metadata comes back in [`RenderOutput`] so eyedropper picks can
//! map view coordinates to canvas pixels.

use rastr_core::{ColorInfo, LayerImage, NormalizeOptions, RgbaImage, to_rgba};
use tracing::{debug, trace, warn};

use crate::composite::draw_image;
use crate::resize::{Interpolation, resize, target_dimensions};
use crate::{OpsError, OpsResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// User zoom factor.
    pub content_scale: f64,
    /// Fit-to-view factor of the base layer.
    pub base_scale: f64,
    /// Resampling filter for scaled layers.
    pub interpolation: Interpolation,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            content_scale: 1.0,
            base_scale: 1.0,
            interpolation: Interpolation::Bilinear,
        }
    }
}

impl RenderOptions {
    /// `base_scale * content_scale`
    pub fn effective_scale(&self) -> f64 {
        self.base_scale * self.content_scale
    }
}

/// Where a drawing landed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Left offset in canvas pixels
    pub dx: i64,
    /// Top offset in canvas pixels
    pub dy: i64,
    /// Drawn width
    pub draw_width: u32,
    /// Drawn height
    pub draw_height: u32,
}

impl Placement {
    /// Maps a position relative to this placement to canvas coordinates.
    ///
    /// Returns `None` outside the drawn area.
    pub fn to_canvas(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        if x < 0 || y < 0 || x >= self.draw_width as i64 || y >= self.draw_height as i64 {
            return None;
        }
        let (cx, cy) = (x + self.dx, y + self.dy);
        if cx < 0 || cy < 0 {
            return None;
        }
        Some((cx as u32, cy as u32))
    }
}

/// Placement of one drawn layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPlacement {
    /// Index into the input slice
    pub index: usize,
    /// Where the layer was drawn
    pub placement: Placement,
}

/// Result of [`render`].
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Composited pixels.
    pub canvas: RgbaImage,
    /// Placement of the whole drawing (the canvas itself).
    pub placement: Placement,
    /// Placement of every layer that was drawn, in drawing order.
    pub layers: Vec<LayerPlacement>,
}

impl RenderOutput {
    /// Canvas width.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Canvas height.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Eyedropper: canvas pixel at a position relative to [`Self::placement`].
    pub fn pick(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let (cx, cy) = self.placement.to_canvas(x, y)?;
        self.canvas.pixel(cx, cy)
    }

    /// [`Self::pick`] plus the color conversions shown in the eyedropper panel.
    pub fn pick_info(&self, x: i64, y: i64) -> Option<ColorInfo> {
        self.pick(x, y).map(ColorInfo::from_rgba)
    }
}

struct Prepared {
    index: usize,
    rgba: RgbaImage,
    placement: Placement,
}

fn prepare(index: usize, layer: &LayerImage, canvas: (u32, u32), opts: &RenderOptions) -> Option<Prepared> {
    if !layer.is_drawable() {
        trace!(index, deleted = layer.deleted(), visible = layer.visible(), "render: layer skipped");
        return None;
    }

    let scale = opts.effective_scale();
    let (w, h) = layer.dimensions();
    let (draw_w, draw_h) = match target_dimensions(w as f64 * scale, h as f64 * scale) {
        Ok(size) => size,
        Err(e) => {
            warn!(index, error = %e, "render: layer skipped");
            return None;
        }
    };

    let rgba = to_rgba(layer, NormalizeOptions::default());
    let rgba = if (draw_w, draw_h) == (w, h) {
        rgba
    } else {
        match resize(&rgba, draw_w, draw_h, opts.interpolation) {
            Ok(scaled) => scaled,
            Err(e) => {
                warn!(index, error = %e, "render: layer skipped");
                return None;
            }
        }
    };

    let placement = Placement {
        dx: (canvas.0 as i64 - draw_w as i64).div_euclid(2),
        dy: (canvas.1 as i64 - draw_h as i64).div_euclid(2),
        draw_width: draw_w,
        draw_height: draw_h,
    };
    Some(Prepared { index, rgba, placement })
}

/// Composites `layers` (bottom first) into a new canvas.
///
/// Returns `Ok(None)` when every layer is deleted. A scale that is not
/// finite and positive is an [`OpsError::InvalidDimension`]. Individual
/// layers that cannot be drawn are skipped with a warning.
///
/// # Example
///
/// ```rust
/// use rastr_core::{LayerImage, Rgb8};
/// use rastr_ops::render::{RenderOptions, render};
///
/// let layers = vec![LayerImage::flat(4, 2, Rgb8::new(1, 2, 3)).unwrap()];
/// let out = render(&layers, &RenderOptions::default()).unwrap().unwrap();
/// assert_eq!((out.width(), out.height()), (4, 2));
/// assert_eq!(out.pick(0, 0), Some([1, 2, 3, 255]));
/// ```
pub fn render(layers: &[LayerImage], opts: &RenderOptions) -> OpsResult<Option<RenderOutput>> {
    let scale = opts.effective_scale();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(OpsError::InvalidDimension(format!(
            "render scale {} x {} must be finite and > 0",
            opts.base_scale, opts.content_scale
        )));
    }

    let Some(base) = layers.iter().find(|l| !l.deleted()) else {
        debug!(layers = layers.len(), "render: no base layer");
        return Ok(None);
    };
    let (cw, ch) = target_dimensions(base.width() as f64 * scale, base.height() as f64 * scale)?;
    debug!(layers = layers.len(), cw, ch, scale, interpolation = %opts.interpolation, "render");

    #[cfg(feature = "parallel")]
    let prepared: Vec<Prepared> = layers
        .par_iter()
        .enumerate()
        .filter_map(|(i, layer)| prepare(i, layer, (cw, ch), opts))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let prepared: Vec<Prepared> = layers
        .iter()
        .enumerate()
        .filter_map(|(i, layer)| prepare(i, layer, (cw, ch), opts))
        .collect();

    let mut canvas = RgbaImage::transparent(cw, ch)?;
    let mut placed = Vec::with_capacity(prepared.len());
    for p in prepared {
        let layer = &layers[p.index];
        draw_image(
            &mut canvas,
            &p.rgba,
            p.placement.dx,
            p.placement.dy,
            layer.blend_mode(),
            layer.opacity(),
        );
        placed.push(LayerPlacement {
            index: p.index,
            placement: p.placement,
        });
    }

    Ok(Some(RenderOutput {
        canvas,
        placement: Placement {
            dx: 0,
            dy: 0,
            draw_width: cw,
            draw_height: ch,
        },
        layers: placed,
    }))
}
