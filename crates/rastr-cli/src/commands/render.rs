//! Render command
//!
//! Flattens a layer stack the way the editor canvas shows it.

use anyhow::Result;
use tracing::debug;

use crate::RenderArgs;

/// Runs the render command.
pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    let stack = super::load_stack(&args.stack)?;
    let out = super::render_stack(&stack, &args.stack)?;

    for lp in &out.layers {
        debug!(index = lp.index, dx = lp.placement.dx, dy = lp.placement.dy,
            w = lp.placement.draw_width, h = lp.placement.draw_height, "layer placed");
    }

    let (w, h) = (out.width(), out.height());
    let drawn = out.layers.len();
    let layer = out.canvas.into_layer()?;
    super::save_layer(&args.output, &layer)?;

    if verbose > 0 {
        println!(
            "Rendered {} of {} layer(s) -> {} ({}x{})",
            drawn,
            stack.len(),
            args.output.display(),
            w,
            h
        );
    }
    Ok(())
}
