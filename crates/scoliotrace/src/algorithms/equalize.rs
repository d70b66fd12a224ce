use image::GrayImage;
use tracing::debug;
use crate::{error::Result, traits::Stage};

/// Per-intensity pixel counts
pub type Histogram = [u64; 256];

pub fn histogram(image: &GrayImage) -> Histogram {
    let mut counts = [0u64; 256];
    for &value in image.as_raw() {
        counts[usize::from(value)] += 1;
    }
    counts
}

/// Running sum of a histogram
pub fn cumulative(histogram: &Histogram) -> Histogram {
    let mut cdf = [0u64; 256];
    let mut running = 0;
    for (slot, &count) in cdf.iter_mut().zip(histogram) {
        running += count;
        *slot = running;
    }
    cdf
}

/// Remapping table, or `None` when the histogram is degenerate (fewer than
/// two pixels or a single distinct intensity).
fn lookup_table(image: &GrayImage) -> Option<[u8; 256]> {
    let total = image.as_raw().len() as u64;
    let hist = histogram(image);
    if total < 2 || hist.iter().filter(|&&count| count > 0).count() < 2 {
        return None;
    }

    let cdf = cumulative(&hist);
    // min over the whole table, empty leading bins included
    let cdf_min = cdf.iter().copied().min().unwrap_or(0);
    let denominator = (total - 1) as f64;

    let mut table = [0u8; 256];
    for (slot, &c) in table.iter_mut().zip(&cdf) {
        let level = (c - cdf_min) as f64 / denominator * 255.0;
        *slot = level.round().min(255.0) as u8;
    }
    Some(table)
}

/// Histogram-equalize in place
pub fn equalize_mut(image: &mut GrayImage) {
    match lookup_table(image) {
        Some(table) => {
            for value in image.iter_mut() {
                *value = table[usize::from(*value)];
            }
        }
        None => debug!(
            width = image.width(),
            height = image.height(),
            "degenerate histogram, leaving image unchanged"
        ),
    }
}

/// Global contrast normalisation through the cumulative distribution
pub fn equalize(image: &GrayImage) -> GrayImage {
    let mut equalized = image.clone();
    equalize_mut(&mut equalized);
    equalized
}

/// Histogram equalization stage
#[derive(Debug, Clone, Default)]
pub struct Equalize;

impl Stage for Equalize {
    fn name(&self) -> &'static str {
        "equalize"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(equalize(image))
    }
}
