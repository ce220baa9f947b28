//! 3x3 convolution command.

use anyhow::Result;
use tracing::debug;

use rastr_ops::filter::{convolve_alpha_3x3, convolve_rgb_3x3};

use crate::FilterArgs;

/// Runs the filter command.
pub fn run(args: FilterArgs, verbose: u8) -> Result<()> {
    let layer = super::load_layer(&args.input)?;

    let mut kernel = args.kernel.unwrap_or_else(|| args.preset.kernel());
    if let Some(d) = args.divisor {
        kernel = kernel.with_divisor(d);
    }
    if args.bias != 0.0 {
        kernel = kernel.with_bias(args.bias);
    }
    debug!(?kernel, alpha = args.alpha, "filter");

    let src = super::layer_rgba(&layer);
    let out = if args.alpha {
        convolve_alpha_3x3(&src, &kernel)
    } else {
        convolve_rgb_3x3(&src, &kernel)
    };
    super::save_rgba(&args.output, out, &layer)?;

    if verbose > 0 {
        let name = if args.kernel.is_some() { "custom" } else { args.preset.name() };
        println!(
            "Filtered {} ({}, divisor {}) -> {}",
            args.input.display(),
            name,
            kernel.effective_divisor(),
            args.output.display()
        );
    }
    Ok(())
}
