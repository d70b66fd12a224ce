use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba};
use crate::types::ChannelMode;

/// Default matte used when flattening transparency
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composite an image carrying alpha over an opaque background.
///
/// Images without alpha come back unchanged. The decoder already expands
/// palettes with a transparency key into RGBA, so they take the blended path.
pub fn flatten_alpha(image: &DynamicImage, background: Rgb<u8>) -> DynamicImage {
    if !ChannelMode::of(image).has_alpha() {
        return image.clone();
    }

    let rgba = image.to_rgba8();
    let Rgb([bg_r, bg_g, bg_b]) = background;
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([blend(r, bg_r, a), blend(g, bg_g, a), blend(b, bg_b, a)])
    });
    DynamicImage::ImageRgb8(flat)
}

fn blend(src: u8, background: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(background) * (255 - a) + 127) / 255) as u8
}

/// BT.709 luminance of an RGB pixel
pub fn luminance(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    let l = 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
    l.round().min(255.0) as u8
}

/// Reduce to a single intensity channel.
///
/// Intensity images keep their values; colour images go through
/// [`luminance`], alpha ignored.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        _ if ChannelMode::of(image).is_single_channel() => image.to_luma8(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                Luma([luminance(*rgb.get_pixel(x, y))])
            })
        }
    }
}

/// Flatten transparency then reduce to grayscale
pub fn reduce(image: &DynamicImage, background: Rgb<u8>) -> GrayImage {
    to_grayscale(&flatten_alpha(image, background))
}
