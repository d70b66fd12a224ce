use std::path::Path;

use image::{ColorType, DynamicImage, GrayImage};
use crate::error::Result;

/// Channel model of a decoded raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Single-channel intensity
    L,
    /// Intensity plus alpha
    La,
    Rgb,
    Rgba,
    /// Anything the decoder produced that is not one of the above
    Other,
}

impl ChannelMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 | ColorType::L16 => Self::L,
            ColorType::La8 | ColorType::La16 => Self::La,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Self::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Self::Rgba,
            _ => Self::Other,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::La | Self::Rgba)
    }

    /// Whether the base colour model is intensity only (alpha aside)
    pub fn is_single_channel(self) -> bool {
        matches!(self, Self::L | Self::La)
    }
}

/// One sampled band of the centerline trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSample {
    /// Sampled row
    pub row: u32,
    /// First boundary pixel scanning left to right
    pub left: Option<u32>,
    /// First boundary pixel scanning right to left
    pub right: Option<u32>,
    /// Horizontal midpoint, missing boundaries count as column 0
    pub midpoint: i32,
}

impl TraceSample {
    pub fn new(row: u32, left: Option<u32>, right: Option<u32>) -> Self {
        let l = f64::from(left.unwrap_or(0));
        let r = f64::from(right.unwrap_or(0));
        Self {
            row,
            left,
            right,
            midpoint: ((r - l) / 2.0 + l).trunc() as i32,
        }
    }

    /// Both boundaries were found on this row
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Everything a pipeline run produces for one radiograph
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Grayscale input, before any stage ran
    pub original: GrayImage,
    /// Output of the last stage
    pub traced: GrayImage,
    /// `original` and `traced` side by side
    pub composite: GrayImage,
}

impl PipelineOutput {
    /// Write the side-by-side composite, format picked from the extension
    pub fn save_composite<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.composite.save(path)?;
        Ok(())
    }
}
