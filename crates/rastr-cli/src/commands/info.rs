//! Image info command.
//!
//! Displays dimensions, storage kind, bit depth and alpha state.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use rastr_core::{LayerData, LayerImage};
use rastr_io::Format;

use crate::InfoArgs;

#[derive(Serialize)]
struct InfoReport<'a> {
    path: String,
    format: &'a str,
    kind: &'a str,
    width: u32,
    height: u32,
    bit_depth: u8,
    has_alpha: bool,
    transparent_pixels: usize,
    file_size: u64,
}

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let mut reports = Vec::with_capacity(args.input.len());

    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let format = Format::detect(path).unwrap_or(Format::Unknown);
        let layer = super::load_layer(path)?;

        let report = InfoReport {
            path: path.display().to_string(),
            format: format.extension().unwrap_or("unknown"),
            kind: layer.data().kind(),
            width: layer.width(),
            height: layer.height(),
            bit_depth: layer.bit_depth(),
            has_alpha: layer.has_alpha(),
            transparent_pixels: layer.transparent_pixel_count(),
            file_size,
        };

        if args.json {
            reports.push(report);
        } else {
            print_text(path, &layer, &report, verbose);
            if args.input.len() > 1 {
                println!();
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn print_text(path: &Path, layer: &LayerImage, report: &InfoReport<'_>, verbose: u8) {
    println!("{}", path.display());
    println!("  Resolution: {}x{}", report.width, report.height);
    println!("  Format:     {}", report.format);
    println!("  Bit depth:  {}", report.bit_depth);
    println!("  Alpha:      {}", if report.has_alpha { "yes" } else { "no" });
    println!("  File size:  {}", super::format_size(report.file_size));

    if verbose > 0 {
        println!("  Storage:    {}", report.kind);
        println!("  Pixels:     {}", layer.pixel_count());
        println!("  Clear:      {}", report.transparent_pixels);
        if let LayerData::Flat { color } = layer.data() {
            println!("  Color:      {}", color.to_hex());
        }
    }
}
