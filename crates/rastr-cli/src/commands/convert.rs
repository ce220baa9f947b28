//! Format conversion command.
//!
//! GB7 <-> PNG, with optional opaque or alpha-only export.

use anyhow::{Context, Result};
use tracing::info;

use rastr_core::{NormalizeMode, NormalizeOptions};
use rastr_io::WriteOptions;

use crate::ConvertArgs;

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: u8) -> Result<()> {
    let layer = super::load_layer(&args.input)?;

    let opts = WriteOptions {
        format: args.format,
        normalize: NormalizeOptions {
            mode: if args.alpha_only {
                NormalizeMode::AlphaOnly
            } else {
                NormalizeMode::Color
            },
            force_opaque: args.force_opaque,
        },
    };
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        format = ?opts.format,
        mode = ?opts.normalize.mode,
        "convert"
    );

    rastr_io::write(&args.output, &layer, &opts)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose > 0 {
        println!(
            "Converted {} -> {} ({}x{})",
            args.input.display(),
            args.output.display(),
            layer.width(),
            layer.height()
        );
    }
    Ok(())
}
