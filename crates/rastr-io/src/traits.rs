//! I/O traits for image readers and writers.
//!
//! Each format module provides a reader/writer pair over [`LayerImage`].

use rastr_core::LayerImage;
use std::path::Path;

use crate::IoResult;

/// Trait for image format readers.
pub trait ImageReader {
    /// Reads a layer from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<LayerImage>;

    /// Reads a layer from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<LayerImage>;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes a layer to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, layer: &LayerImage) -> IoResult<()>;

    /// Writes a layer to memory.
    fn write_to_memory(&self, layer: &LayerImage) -> IoResult<Vec<u8>>;
}
