//! Ordered layer list.
//!
//! Index 0 is the bottom layer. "Up" in the editor's layer panel moves a
//! layer toward index 0, matching how the panel lists layers.

use crate::layer::LayerImage;
use crate::{Error, Result};

/// Default layer capacity.
pub const DEFAULT_MAX_LAYERS: usize = 2;

/// Layer stack configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackConfig {
    /// Maximum number of layers, deleted ones included
    pub max_layers: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_layers: DEFAULT_MAX_LAYERS,
        }
    }
}

/// Ordered, capacity-limited list of layers (bottom to top).
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    config: StackConfig,
    layers: Vec<LayerImage>,
}

impl LayerStack {
    /// Creates an empty stack.
    pub fn new(config: StackConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
        }
    }

    /// Stack configuration.
    pub fn config(&self) -> StackConfig {
        self.config
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the stack holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// True when no more layers can be pushed.
    pub fn is_full(&self) -> bool {
        self.layers.len() >= self.config.max_layers
    }

    /// Appends a layer on top. Returns its index.
    pub fn push(&mut self, layer: LayerImage) -> Result<usize> {
        if self.is_full() {
            return Err(Error::StackFull {
                max: self.config.max_layers,
            });
        }
        self.layers.push(layer);
        tracing::debug!(len = self.layers.len(), "layer pushed");
        Ok(self.layers.len() - 1)
    }

    /// Removes and returns the layer at `index`.
    pub fn remove(&mut self, index: usize) -> Result<LayerImage> {
        self.check(index)?;
        Ok(self.layers.remove(index))
    }

    /// Moves a layer one slot toward index 0. Returns its new index.
    ///
    /// A layer already at index 0 stays put.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index == 0 {
            return Ok(0);
        }
        self.layers.swap(index, index - 1);
        Ok(index - 1)
    }

    /// Moves a layer one slot away from index 0. Returns its new index.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index + 1 >= self.layers.len() {
            return Ok(index);
        }
        self.layers.swap(index, index + 1);
        Ok(index + 1)
    }

    /// Layer at `index`.
    pub fn get(&self, index: usize) -> Option<&LayerImage> {
        self.layers.get(index)
    }

    /// Mutable layer at `index`, for attribute edits.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LayerImage> {
        self.layers.get_mut(index)
    }

    /// Replaces the layer at `index` with an edited value.
    pub fn replace(&mut self, index: usize, layer: LayerImage) -> Result<LayerImage> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.layers[index], layer))
    }

    /// All layers, bottom to top.
    pub fn layers(&self) -> &[LayerImage] {
        &self.layers
    }

    /// First non-deleted layer; it defines the canvas size.
    pub fn base(&self) -> Option<&LayerImage> {
        self.layers.iter().find(|l| !l.deleted())
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(Error::LayerIndex {
                index,
                len: self.layers.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgb8;

    fn flat(w: u32) -> LayerImage {
        LayerImage::flat(w, 1, Rgb8::BLACK).unwrap()
    }

    #[test]
    fn test_capacity() {
        let mut stack = LayerStack::default();
        assert_eq!(stack.push(flat(1)).unwrap(), 0);
        assert_eq!(stack.push(flat(2)).unwrap(), 1);
        assert!(stack.is_full());
        assert!(matches!(stack.push(flat(3)), Err(Error::StackFull { max: 2 })));

        let mut big = LayerStack::new(StackConfig { max_layers: 3 });
        for w in 1..=3 {
            big.push(flat(w)).unwrap();
        }
        assert_eq!(big.len(), 3);
    }

    #[test]
    fn test_reorder() {
        let mut stack = LayerStack::new(StackConfig { max_layers: 3 });
        for w in 1..=3 {
            stack.push(flat(w)).unwrap();
        }
        assert_eq!(stack.move_up(2).unwrap(), 1);
        let widths: Vec<u32> = stack.layers().iter().map(|l| l.width()).collect();
        assert_eq!(widths, vec![1, 3, 2]);

        assert_eq!(stack.move_up(0).unwrap(), 0);
        assert_eq!(stack.move_down(2).unwrap(), 2);
        assert_eq!(stack.move_down(0).unwrap(), 1);
        assert_eq!(stack.get(0).unwrap().width(), 3);
        assert!(matches!(stack.move_up(5), Err(Error::LayerIndex { index: 5, len: 3 })));
    }

    #[test]
    fn test_base_skips_deleted() {
        let mut stack = LayerStack::default();
        stack.push(flat(1)).unwrap();
        stack.push(flat(2)).unwrap();
        stack.get_mut(0).unwrap().set_deleted(true);
        assert_eq!(stack.base().unwrap().width(), 2);

        let removed = stack.remove(0).unwrap();
        assert!(removed.deleted());
        assert_eq!(stack.len(), 1);
        assert!(stack.remove(1).is_err());
    }

    #[test]
    fn test_replace() {
        let mut stack = LayerStack::default();
        stack.push(flat(1)).unwrap();
        let old = stack.replace(0, flat(5)).unwrap();
        assert_eq!(old.width(), 1);
        assert_eq!(stack.get(0).unwrap().width(), 5);
    }
}
