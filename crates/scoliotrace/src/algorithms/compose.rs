use image::{ImageBuffer, Pixel, imageops};

/// Place `left` and `right` next to each other on a zero-filled canvas.
///
/// The canvas is as wide as both inputs together and as tall as the taller
/// one; whatever neither input covers stays black.
pub fn merge_side_by_side<P>(
    left: &ImageBuffer<P, Vec<P::Subpixel>>,
    right: &ImageBuffer<P, Vec<P::Subpixel>>,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut merged = ImageBuffer::new(width, height);
    imageops::replace(&mut merged, left, 0, 0);
    imageops::replace(&mut merged, right, i64::from(left.width()), 0);
    merged
}
