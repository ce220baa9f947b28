//! rastr - GB7 and RGBA layer editing from the command line
//!
//! Thin shell over rastr-io, rastr-lut and rastr-ops.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use rastr_core::{BlendMode, Rgb8};
use rastr_io::Format;
use rastr_lut::{Combine, CurvePoints, DEFAULT_THRESHOLD};
use rastr_ops::resize::ResizeUnit;
use rastr_ops::{Interpolation, Kernel3x3, KernelPreset};

mod commands;

#[derive(Parser)]
#[command(name = "rastr")]
#[command(author, version, about = "GB7 / RGBA layer editing tool")]
#[command(long_about = "
Edits 7-bit grayscale GB7 images and 8-bit RGBA rasters.

Examples:
  rastr info scan.gb7                        # Show image info
  rastr convert scan.gb7 scan.png            # GB7 -> PNG
  rastr convert photo.png photo.gb7 --force-opaque
  rastr curves photo.png -o out.png --rgb 0,30,255,225
  rastr curves scan.gb7 -o out.gb7 --luma 0,0,100,127 --alpha-mode threshold
  rastr filter photo.png -o sharp.png -p sharpen
  rastr resize photo.png -o half.png -u percent -w 50
  rastr histogram photo.png --json
  rastr render base.png top.gb7 -o flat.png --blend normal --blend multiply
  rastr pick base.png top.gb7 -x 10 -y 20
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert between GB7 and PNG
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Apply two-point curves (RGB/alpha, or GB7 luma + mask)
    Curves(CurvesArgs),

    /// Apply a 3x3 convolution
    Filter(FilterArgs),

    /// Resize by pixels or percent
    #[command(visible_alias = "r")]
    Resize(ResizeArgs),

    /// Print channel histograms
    #[command(visible_alias = "hist")]
    Histogram(HistogramArgs),

    /// Flatten a layer stack into one image
    Render(RenderArgs),

    /// Eyedropper: sample a rendered layer stack
    Pick(PickArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    output: PathBuf,

    /// Output format: gb7, png (default: from extension)
    #[arg(short, long)]
    format: Option<Format>,

    /// Drop transparency (GB7: clear the mask flag)
    #[arg(long)]
    force_opaque: bool,

    /// Export the alpha channel as a grayscale picture
    #[arg(long, conflicts_with = "force_opaque")]
    alpha_only: bool,
}

#[derive(Args)]
struct CurvesArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// RGB curve points x1,y1,x2,y2 (0-255)
    #[arg(long)]
    rgb: Option<CurvePoints>,

    /// Alpha curve points x1,y1,x2,y2 (0-255)
    #[arg(long)]
    alpha: Option<CurvePoints>,

    /// GB7 luma curve points x1,y1,x2,y2 (0-127)
    #[arg(long)]
    luma: Option<CurvePoints>,

    /// GB7 mask handling: preserve, opaque, transparent, threshold
    #[arg(long, default_value = "preserve")]
    alpha_mode: String,

    /// Luma threshold for --alpha-mode threshold (0-127)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Pass pixels below the threshold instead of at/above it
    #[arg(long)]
    invert: bool,

    /// Merge with the existing mask: replace, and, or
    #[arg(long, default_value = "and")]
    combine: Combine,
}

#[derive(Args)]
struct FilterArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Preset: identity, sharpen, gaussian, box, prewitt-x, prewitt-y
    #[arg(short, long, default_value = "identity", conflicts_with = "kernel")]
    preset: KernelPreset,

    /// Custom kernel: 9 comma-separated weights, row-major
    #[arg(short, long, allow_hyphen_values = true)]
    kernel: Option<Kernel3x3>,

    /// Divisor override (0 = 1)
    #[arg(long)]
    divisor: Option<f32>,

    /// Bias added after division
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    bias: f32,

    /// Filter the alpha channel instead of RGB
    #[arg(long)]
    alpha: bool,
}

#[derive(Args)]
struct ResizeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Unit: px, percent
    #[arg(short, long, default_value = "px")]
    unit: ResizeUnit,

    /// Target width
    #[arg(short, long)]
    width: u32,

    /// Target height (omit to keep the aspect ratio)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Interpolation: nearest, bilinear
    #[arg(short, long, default_value = "bilinear")]
    interpolation: Interpolation,
}

#[derive(Args)]
struct HistogramArgs {
    /// Input image
    input: PathBuf,

    /// Count alpha only
    #[arg(long)]
    alpha: bool,

    /// Machine-readable output (JSON, full bins)
    #[arg(long)]
    json: bool,
}

/// Layer stack options shared by `render` and `pick`.
#[derive(Args)]
struct StackArgs {
    /// Layer images, bottom first
    #[arg(required = true)]
    layers: Vec<PathBuf>,

    /// Opacity per layer, in layer order (0-1)
    #[arg(long)]
    opacity: Vec<f32>,

    /// Blend mode per layer: normal, multiply, screen, overlay
    #[arg(long)]
    blend: Vec<BlendMode>,

    /// Hide layer by index (repeatable)
    #[arg(long)]
    hide: Vec<usize>,

    /// Render alpha as opaque for layer by index (repeatable)
    #[arg(long)]
    hide_alpha: Vec<usize>,

    /// Zoom factor
    #[arg(short, long, default_value = "1.0")]
    scale: f64,

    /// Fit the base layer into a WIDTHxHEIGHT view
    #[arg(long, value_parser = parse_size)]
    fit: Option<(u32, u32)>,

    /// Padding around the view for --fit
    #[arg(long, default_value = "0")]
    padding: u32,

    /// Interpolation: nearest, bilinear
    #[arg(short, long, default_value = "bilinear")]
    interpolation: Interpolation,

    /// Maximum number of layers in the stack
    #[arg(long, default_value = "2")]
    max_layers: usize,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    stack: StackArgs,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct PickArgs {
    #[command(flatten)]
    stack: StackArgs,

    /// X relative to the drawing
    #[arg(short = 'x', long, allow_hyphen_values = true)]
    x: i64,

    /// Y relative to the drawing
    #[arg(short = 'y', long, allow_hyphen_values = true)]
    y: i64,

    /// Also report WCAG contrast against this color (#rrggbb)
    #[arg(long)]
    contrast: Option<Rgb8>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok((w, h))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Curves(args) => commands::curves::run(args, cli.verbose),
        Commands::Filter(args) => commands::filter::run(args, cli.verbose),
        Commands::Resize(args) => commands::resize::run(args, cli.verbose),
        Commands::Histogram(args) => commands::histogram::run(args, cli.verbose),
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Pick(args) => commands::pick::run(args, cli.verbose),
    }
}
