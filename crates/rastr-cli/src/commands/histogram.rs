//! Histogram command.
//!
//! GB7 input reports 128 luma bins plus the mask split; everything else
//! reports 256-bin RGB (or alpha) counts.

use anyhow::Result;
use serde_json::json;

use rastr_core::LayerData;
use rastr_lut::{HistogramOptions, calc_histogram, calc_histogram_gb7};

use crate::HistogramArgs;

struct Summary {
    count: u64,
    mean: f64,
    min: usize,
    max: usize,
    mode: usize,
}

fn summarize(bins: &[u32]) -> Summary {
    let count: u64 = bins.iter().map(|&n| n as u64).sum();
    let weighted: u64 = bins.iter().enumerate().map(|(v, &n)| v as u64 * n as u64).sum();
    let min = bins.iter().position(|&n| n > 0).unwrap_or(0);
    let max = bins.iter().rposition(|&n| n > 0).unwrap_or(0);
    let mode = bins
        .iter()
        .enumerate()
        .max_by_key(|&(v, &n)| (n, std::cmp::Reverse(v)))
        .map_or(0, |(v, _)| v);
    Summary {
        count,
        mean: if count == 0 { 0.0 } else { weighted as f64 / count as f64 },
        min,
        max,
        mode,
    }
}

fn print_channel(name: &str, bins: &[u32]) {
    let s = summarize(bins);
    println!(
        "  {:<6} count {:>8}  min {:>3}  max {:>3}  mean {:>7.2}  mode {:>3}",
        name, s.count, s.min, s.max, s.mean, s.mode
    );
}

/// Runs the histogram command.
pub fn run(args: HistogramArgs, verbose: u8) -> Result<()> {
    let layer = super::load_layer(&args.input)?;

    // --alpha on GB7 input goes through the RGBA view
    if let (LayerData::Gb7 { packed }, false) = (layer.data(), args.alpha) {
        let hist = calc_histogram_gb7(packed);
        if args.json {
            let report = json!({
                "path": args.input.display().to_string(),
                "kind": "gb7",
                "peak": hist.peak(),
                "y": hist.y,
                "alpha": hist.alpha,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{} ({}x{}, gb7)", args.input.display(), layer.width(), layer.height());
            print_channel("y", &hist.y);
            println!("  mask   clear {:>8}  set {:>8}", hist.alpha[0], hist.alpha[1]);
            if verbose > 0 {
                println!("  peak   {}", hist.peak());
            }
        }
        return Ok(());
    }

    let hist = calc_histogram(&super::layer_rgba(&layer), HistogramOptions { alpha_only: args.alpha });
    if args.json {
        let mut channels = serde_json::Map::new();
        for (name, bins) in hist.channels() {
            channels.insert(name.to_string(), json!(bins));
        }
        let report = json!({
            "path": args.input.display().to_string(),
            "kind": layer.data().kind(),
            "peak": hist.peak(),
            "channels": channels,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} ({}x{}, {})", args.input.display(), layer.width(), layer.height(), layer.data().kind());
        for (name, bins) in hist.channels() {
            print_channel(name, bins);
        }
        if verbose > 0 {
            println!("  peak   {}", hist.peak());
        }
    }
    Ok(())
}
