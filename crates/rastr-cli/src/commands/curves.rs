//! Curves command.
//!
//! RGB and alpha curves for raster input; luma curve and mask edits for GB7.

use anyhow::{Result, bail};
use tracing::debug;

use rastr_core::LayerData;
use rastr_lut::{AlphaMode, ChannelLuts, GB7_MAX, RGBA_MAX, apply_curves, apply_curves_gb7};

use crate::CurvesArgs;

fn parse_alpha_mode(args: &CurvesArgs) -> Result<AlphaMode> {
    Ok(match args.alpha_mode.trim().to_ascii_lowercase().as_str() {
        "preserve" | "keep" => AlphaMode::Preserve,
        "opaque" => AlphaMode::Opaque,
        "transparent" | "clear" => AlphaMode::Transparent,
        "threshold" => {
            if args.threshold > GB7_MAX {
                bail!("Threshold {} is outside 0..={}", args.threshold, GB7_MAX);
            }
            AlphaMode::Threshold {
                threshold: args.threshold,
                invert: args.invert,
                combine: args.combine,
            }
        }
        other => bail!("Unknown alpha mode '{}' (preserve, opaque, transparent, threshold)", other),
    })
}

/// Runs the curves command.
pub fn run(args: CurvesArgs, verbose: u8) -> Result<()> {
    let layer = super::load_layer(&args.input)?;

    if let LayerData::Gb7 { packed } = layer.data() {
        if args.rgb.is_some() || args.alpha.is_some() {
            bail!("GB7 input takes --luma and --alpha-mode, not --rgb/--alpha");
        }
        let mode = parse_alpha_mode(&args)?;
        let lut = args.luma.map(|p| p.to_lut(GB7_MAX));
        debug!(?mode, luma = lut.is_some(), "gb7 curves");

        let edited = apply_curves_gb7(packed, lut.as_ref(), mode);
        let out = if mode.writes_mask() {
            layer.with_gb7_mask(edited)?
        } else {
            layer.with_gb7(edited)?
        };
        super::save_layer(&args.output, &out)?;
    } else {
        if args.luma.is_some() {
            bail!("--luma applies to GB7 input only; use --rgb");
        }
        let luts = ChannelLuts {
            r: args.rgb.map(|p| p.to_lut(RGBA_MAX)),
            g: args.rgb.map(|p| p.to_lut(RGBA_MAX)),
            b: args.rgb.map(|p| p.to_lut(RGBA_MAX)),
            a: args.alpha.map(|p| p.to_lut(RGBA_MAX)),
        };
        if luts.is_empty() {
            bail!("Nothing to do: pass --rgb and/or --alpha");
        }
        debug!(rgb = luts.r.is_some(), alpha = luts.a.is_some(), "rgba curves");

        let out = apply_curves(&super::layer_rgba(&layer), &luts);
        super::save_rgba(&args.output, out, &layer)?;
    }

    if verbose > 0 {
        println!("Curves applied: {} -> {}", args.input.display(), args.output.display());
    }
    Ok(())
}
