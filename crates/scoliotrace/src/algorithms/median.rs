use image::{GrayImage, Luma};
use crate::{algorithms::stats::row_median, error::Result, traits::Stage};

/// Push every in-bounds pixel of the square window around `(x, y)`.
/// Offsets falling outside the image are skipped, not padded.
fn collect_window(image: &GrayImage, x: u32, y: u32, radius: u32, window: &mut Vec<u8>) {
    let (width, height) = image.dimensions();
    let x_end = x.saturating_add(radius).min(width - 1);
    let y_end = y.saturating_add(radius).min(height - 1);
    for yy in y.saturating_sub(radius)..=y_end {
        for xx in x.saturating_sub(radius)..=x_end {
            window.push(image.get_pixel(xx, yy)[0]);
        }
    }
}

/// Largest number of pixels a clipped window of `radius` can hold
fn window_capacity(image: &GrayImage, radius: u32) -> usize {
    let side = u64::from(radius) * 2 + 1;
    let cols = side.min(u64::from(image.width()));
    let rows = side.min(u64::from(image.height()));
    (cols * rows) as usize
}

/// Pixels of the window around `(x, y)`, clipped at the image border.
///
/// `(x, y)` must lie inside the image.
pub fn neighbors_within_bounds(image: &GrayImage, x: u32, y: u32, radius: u32) -> Vec<u8> {
    let mut window = Vec::with_capacity(window_capacity(image, radius));
    collect_window(image, x, y, radius, &mut window);
    window
}

fn truncated_median(values: &[u8]) -> u8 {
    row_median(values).map_or(0, |median| median as u8)
}

/// Median of the clipped window; an even count averages the two middle
/// values, truncating.
pub fn window_median(image: &GrayImage, x: u32, y: u32, radius: u32) -> u8 {
    truncated_median(&neighbors_within_bounds(image, x, y, radius))
}

/// Median smoothing. `size` is a diameter, halved into the window radius.
pub fn median_filter(image: &GrayImage, size: u32) -> GrayImage {
    let radius = size / 2;
    if radius == 0 {
        return image.clone();
    }

    let mut window = Vec::with_capacity(window_capacity(image, radius));
    let mut filtered = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in filtered.enumerate_pixels_mut() {
        window.clear();
        collect_window(image, x, y, radius, &mut window);
        *pixel = Luma([truncated_median(&window)]);
    }
    filtered
}

/// Median filter stage
#[derive(Debug, Clone)]
pub struct MedianFilter {
    pub size: u32,
}

impl Default for MedianFilter {
    fn default() -> Self {
        Self { size: 2 }
    }
}

impl Stage for MedianFilter {
    fn name(&self) -> &'static str {
        "median_filter"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(median_filter(image, self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speckled() -> GrayImage {
        let mut img = GrayImage::from_pixel(4, 4, Luma([100]));
        img.put_pixel(2, 2, Luma([200]));
        img
    }

    #[test]
    fn removes_isolated_speck() {
        assert_eq!(window_median(&speckled(), 2, 2, 1), 100);
        let out = median_filter(&speckled(), 2);
        assert!(out.pixels().all(|p| p[0] == 100));
    }

    #[test]
    fn small_sizes_are_identity() {
        let img = speckled();
        assert_eq!(median_filter(&img, 0), img);
        assert_eq!(median_filter(&img, 1), img);
    }

    #[test]
    fn corner_window_is_clipped() {
        let img = GrayImage::from_fn(3, 3, |x, y| Luma([(y * 3 + x) as u8 * 10]));
        let corner = neighbors_within_bounds(&img, 0, 0, 1);
        assert_eq!(corner, vec![0, 10, 30, 40]);
        // even count: (10 + 30) / 2
        assert_eq!(window_median(&img, 0, 0, 1), 20);
        assert_eq!(neighbors_within_bounds(&img, 1, 1, 1).len(), 9);
    }

    #[test]
    fn even_median_truncates() {
        let img = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 3 } else { 6 }]));
        assert_eq!(window_median(&img, 0, 0, 1), 4);
    }

    #[test]
    fn oversized_window_covers_whole_image() {
        let img = GrayImage::from_fn(4, 4, |x, y| Luma([(y * 4 + x) as u8]));
        assert_eq!(window_capacity(&img, u32::MAX / 2), 16);
        assert_eq!(neighbors_within_bounds(&img, 1, 2, u32::MAX / 2).len(), 16);
        // 16 values 0..=15: (7 + 8) / 2 truncated
        let out = median_filter(&img, u32::MAX);
        assert!(out.pixels().all(|p| p[0] == 7));
    }
}
