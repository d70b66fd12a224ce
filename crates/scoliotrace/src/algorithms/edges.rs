use image::{GrayImage, Luma};
use crate::{error::Result, traits::Stage};

/// Horizontal Sobel response at an interior pixel
pub fn horizontal_gradient(image: &GrayImage, x: u32, y: u32) -> i32 {
    let px = |x: u32, y: u32| i32::from(image.get_pixel(x, y)[0]);
    (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
        - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1))
}

/// Horizontal edge magnitude, `round(|g| / 4)`.
///
/// Only interior pixels are computed; the outermost one-pixel frame is
/// copied from the input.
pub fn sobel_x(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut edges = image.clone();
    if width < 3 || height < 3 {
        return edges;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let magnitude = (horizontal_gradient(image, x, y).abs() as f32 / 4.0).round();
            edges.put_pixel(x, y, Luma([magnitude as u8]));
        }
    }
    edges
}

/// Horizontal Sobel stage
#[derive(Debug, Clone, Default)]
pub struct SobelX;

impl Stage for SobelX {
    fn name(&self) -> &'static str {
        "sobel_x"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(sobel_x(image))
    }
}
