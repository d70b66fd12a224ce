use image::GrayImage;

/// Mean intensity over every pixel, `0.0` for an empty image
pub fn mean_intensity(image: &GrayImage) -> f64 {
    let pixels = image.as_raw();
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / pixels.len() as f64
}

/// Median of a row of samples; the two middle values are averaged for an
/// even count. `None` for an empty slice.
pub fn row_median(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 1 {
        f64::from(sorted[mid])
    } else {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    };
    Some(median)
}
