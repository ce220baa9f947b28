//! Eyedropper command.
//!
//! Renders the stack, samples one pixel and reports RGB, XYZ, Lab and LCh.

use anyhow::{Result, bail};
use serde_json::json;

use rastr_core::contrast_ratio;

use crate::PickArgs;

/// Runs the pick command.
pub fn run(args: PickArgs, verbose: u8) -> Result<()> {
    let stack = super::load_stack(&args.stack)?;
    let out = super::render_stack(&stack, &args.stack)?;

    let Some(info) = out.pick_info(args.x, args.y) else {
        bail!(
            "({}, {}) is outside the {}x{} drawing",
            args.x,
            args.y,
            out.placement.draw_width,
            out.placement.draw_height
        );
    };
    let contrast = args.contrast.map(|c| contrast_ratio(info.rgb, c));

    if args.json {
        let report = json!({
            "x": args.x,
            "y": args.y,
            "hex": info.rgb.to_hex(),
            "color": info,
            "contrast": contrast,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("({}, {})", args.x, args.y);
    println!("  RGB:   {} {} {}  {}", info.rgb.r, info.rgb.g, info.rgb.b, info.rgb.to_hex());
    println!("  Alpha: {}", info.alpha);
    println!("  XYZ:   {:.2} {:.2} {:.2}", info.xyz.x, info.xyz.y, info.xyz.z);
    println!("  Lab:   {:.2} {:.2} {:.2}", info.lab.l, info.lab.a, info.lab.b);
    println!("  LCh:   {:.3} {:.3} {:.1}", info.lch.l, info.lch.c, info.lch.h);
    if let (Some(ratio), Some(other)) = (contrast, args.contrast) {
        println!("  Contrast vs {}: {:.2}:1", other.to_hex(), ratio);
    }
    if verbose > 0 {
        println!("  Canvas: {}x{}", out.width(), out.height());
    }
    Ok(())
}
