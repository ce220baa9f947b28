//! PNG format support.
//!
//! Imports any 8-bit PNG (grayscale, gray+alpha, RGB, RGBA; palette and
//! 16-bit inputs are expanded/stripped to 8 bits) as a raster layer, and
//! exports any layer as 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use rastr_io::png::{read, write};
//! use rastr_core::NormalizeOptions;
//!
//! let layer = read("input.png")?;
//! write("output.png", &layer, NormalizeOptions::default())?;
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;

use rastr_core::{LayerImage, NormalizeOptions, to_rgba};
use tracing::debug;

use crate::traits::{ImageReader, ImageWriter};
use crate::{IoError, IoResult};

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<LayerImage> {
    PngReader.read(path)
}

/// Writes a layer to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, layer: &LayerImage, opts: NormalizeOptions) -> IoResult<()> {
    PngWriter::new(opts).write(path, layer)
}

/// [`ImageReader`] for PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngReader;

impl PngReader {
    fn decode<R: BufRead + Seek>(&self, reader: R) -> IoResult<LayerImage> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = vec![0u8; buf_size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
        let data = &buf[..info.buffer_size()];

        let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
            (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
            (png::ColorType::Rgb, png::BitDepth::Eight) => data
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[1], c[2], 255])
                .collect(),
            (png::ColorType::Grayscale, png::BitDepth::Eight) => {
                data.iter().flat_map(|&g| [g, g, g, 255]).collect()
            }
            (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            (color_type, bit_depth) => {
                return Err(IoError::DecodeError(format!(
                    "unsupported PNG layout {color_type:?} {bit_depth:?}"
                )));
            }
        };

        debug!(width = info.width, height = info.height, color = ?info.color_type, "decoded PNG");
        Ok(LayerImage::raster(info.width, info.height, rgba)?)
    }
}

impl ImageReader for PngReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<LayerImage> {
        let file = File::open(path.as_ref())?;
        self.decode(BufReader::new(file))
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<LayerImage> {
        self.decode(Cursor::new(data))
    }
}

/// [`ImageWriter`] for PNG. Output is always 8-bit RGBA.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter {
    opts: NormalizeOptions,
}

impl PngWriter {
    /// Writer normalizing layers with the given options.
    pub fn new(opts: NormalizeOptions) -> Self {
        Self { opts }
    }

    fn encode<W: Write>(&self, out: W, layer: &LayerImage) -> IoResult<()> {
        let rgba = to_rgba(layer, self.opts);
        let mut encoder = png::Encoder::new(out, rgba.width(), rgba.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut png_writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .write_image_data(rgba.as_bytes())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        debug!(width = rgba.width(), height = rgba.height(), mode = ?self.opts.mode, "encoded PNG");
        Ok(())
    }
}

impl ImageWriter for PngWriter {
    fn write<P: AsRef<Path>>(&self, path: P, layer: &LayerImage) -> IoResult<()> {
        let file = File::create(path.as_ref())?;
        self.encode(BufWriter::new(file), layer)
    }

    fn write_to_memory(&self, layer: &LayerImage) -> IoResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf, layer)?;
        Ok(buf)
    }
}
