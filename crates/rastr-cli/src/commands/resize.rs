//! Resize command
//!
//! Scales a layer by pixels or percent; omitting the height keeps the aspect ratio.

use anyhow::Result;
use tracing::info;

use rastr_ops::resize::{ResizeRequest, resize_layer};

use crate::ResizeArgs;

/// Runs the resize command.
pub fn run(args: ResizeArgs, verbose: u8) -> Result<()> {
    let layer = super::load_layer(&args.input)?;
    let (src_w, src_h) = layer.dimensions();

    let request = ResizeRequest {
        unit: args.unit,
        width: args.width,
        height: args.height.unwrap_or(args.width),
        keep_ratio: args.height.is_none(),
    };
    let (dst_w, dst_h) = request.resolve(src_w, src_h)?;
    info!(src_w, src_h, dst_w, dst_h, interpolation = %args.interpolation, "resize");

    if verbose > 0 {
        println!("Resizing {}x{} -> {}x{}", src_w, src_h, dst_w, dst_h);
    }

    let out = resize_layer(&layer, dst_w, dst_h, args.interpolation)?;
    super::save_layer(&args.output, &out)?;

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}
