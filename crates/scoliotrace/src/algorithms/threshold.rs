use image::GrayImage;
use crate::{algorithms::stats::mean_intensity, error::Result, traits::Stage};

/// Two-level output around the global mean: `<= mean` goes black, the
/// rest white.
///
/// Intensities are integers, so `v <= mean` is `v <= floor(mean)`.
pub fn binarize(image: &GrayImage) -> GrayImage {
    let level = mean_intensity(image).floor().clamp(0.0, 255.0) as u8;
    imageproc::contrast::threshold(image, level)
}

/// Global-mean binarization stage
#[derive(Debug, Clone, Default)]
pub struct Binarize;

impl Stage for Binarize {
    fn name(&self) -> &'static str {
        "binarize"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(binarize(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn output_is_two_level() {
        let img = GrayImage::from_fn(8, 8, |x, y| Luma([(x * 31 + y * 7) as u8]));
        let out = binarize(&img);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(out.pixels().any(|p| p[0] == 0));
        assert!(out.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn all_zero_stays_black() {
        let img = GrayImage::new(2, 2);
        assert!(binarize(&img).pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn value_equal_to_mean_is_black() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([x as u8 * 10]));
        let out = binarize(&img);
        assert_eq!(out.as_raw(), &vec![0, 0, 255]);
    }

    #[test]
    fn fractional_mean_splits_between_neighbours() {
        // mean 10.5: 10 is below it, 11 above
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([[10, 11, 10, 11][x as usize]]));
        assert_eq!(binarize(&img).as_raw(), &vec![0, 255, 0, 255]);
    }

    #[test]
    fn uniform_white_stays_black() {
        let img = GrayImage::from_pixel(3, 3, Luma([255]));
        assert!(binarize(&img).pixels().all(|p| p[0] == 0));
    }
}
