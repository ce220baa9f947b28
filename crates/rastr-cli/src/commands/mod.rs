//! CLI command implementations

pub mod convert;
pub mod curves;
pub mod filter;
pub mod histogram;
pub mod info;
pub mod pick;
pub mod render;
pub mod resize;

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::{debug, info};

use rastr_core::{LayerImage, LayerStack, NormalizeOptions, RgbaImage, StackConfig};
use rastr_io::WriteOptions;
use rastr_ops::render::{RenderOptions, RenderOutput, render};
use rastr_ops::resize::fit_scale;

use crate::StackArgs;

/// Load a layer from path
pub fn load_layer(path: &Path) -> Result<LayerImage> {
    rastr_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save a layer to path, format from the extension
pub fn save_layer(path: &Path, layer: &LayerImage) -> Result<()> {
    rastr_io::write(path, layer, &WriteOptions::default())
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Save an RGBA buffer as a raster layer
pub fn save_rgba(path: &Path, rgba: RgbaImage, template: &LayerImage) -> Result<()> {
    let (w, h) = rgba.dimensions();
    let layer = template.with_raster(w, h, rgba.into_raw())?;
    save_layer(path, &layer)
}

/// Normalized RGBA view of a layer
pub fn layer_rgba(layer: &LayerImage) -> RgbaImage {
    rastr_core::to_rgba(layer, NormalizeOptions::default())
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Loads the layer files of a stack and applies per-layer flags.
pub fn load_stack(args: &StackArgs) -> Result<LayerStack> {
    let mut stack = LayerStack::new(StackConfig {
        max_layers: args.max_layers,
    });

    for (i, path) in args.layers.iter().enumerate() {
        let mut layer = load_layer(path)?;
        if let Some(&opacity) = args.opacity.get(i) {
            layer.set_opacity(opacity);
        }
        if let Some(&mode) = args.blend.get(i) {
            layer.set_blend_mode(mode);
        }
        layer.set_visible(!args.hide.contains(&i));
        layer.set_alpha_hidden(args.hide_alpha.contains(&i));
        stack
            .push(layer)
            .with_context(|| format!("Cannot add layer {}", path.display()))?;
    }

    for &i in args.hide.iter().chain(&args.hide_alpha) {
        if i >= stack.len() {
            bail!("Layer index {} out of range (have {})", i, stack.len());
        }
    }

    debug!(layers = stack.len(), max = args.max_layers, "stack loaded");
    Ok(stack)
}

/// Renders a loaded stack with the scale options in `args`.
pub fn render_stack(stack: &LayerStack, args: &StackArgs) -> Result<RenderOutput> {
    let Some(base) = stack.base() else {
        bail!("No base layer to render");
    };

    let base_scale = match args.fit {
        Some((vw, vh)) => fit_scale(base.width(), base.height(), vw, vh, args.padding)?,
        None => 1.0,
    };
    let opts = RenderOptions {
        content_scale: args.scale,
        base_scale,
        interpolation: args.interpolation,
    };
    info!(base_scale, content_scale = args.scale, interpolation = %args.interpolation, "rendering");

    render(stack.layers(), &opts)?.context("Nothing to render")
}
