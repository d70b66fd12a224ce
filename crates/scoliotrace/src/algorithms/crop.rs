use image::{GrayImage, imageops};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use crate::{
    error::{Result, ScolioError},
    traits::Stage,
};

/// What survives a crop
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CropMode {
    /// Smallest rectangle covering every occupied row and column
    #[default]
    BoundingBox,
    /// Only the occupied rows and columns, empty ones inside the
    /// rectangle are dropped as well
    Compact,
}

/// Which rows and which columns hold at least one pixel above `tolerance`
fn occupancy(image: &GrayImage, tolerance: u8) -> (Vec<u32>, Vec<u32>) {
    let mut rows = vec![false; image.height() as usize];
    let mut cols = vec![false; image.width() as usize];
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[0] > tolerance {
            rows[y as usize] = true;
            cols[x as usize] = true;
        }
    }
    let keep = |mask: Vec<bool>| {
        mask.into_iter()
            .enumerate()
            .filter_map(|(i, set)| set.then_some(i as u32))
            .collect::<Vec<u32>>()
    };
    (keep(rows), keep(cols))
}

/// Crop to the bounding box of the pixels above `tolerance`
pub fn crop_nonempty(image: &GrayImage, tolerance: u8) -> Result<GrayImage> {
    crop_with_mode(image, tolerance, CropMode::BoundingBox)
}

pub fn crop_with_mode(image: &GrayImage, tolerance: u8, mode: CropMode) -> Result<GrayImage> {
    let (rows, cols) = occupancy(image, tolerance);
    let (Some(&top), Some(&bottom), Some(&left), Some(&right)) =
        (rows.first(), rows.last(), cols.first(), cols.last())
    else {
        return Err(ScolioError::EmptyRegion { tolerance });
    };

    let cropped = match mode {
        CropMode::BoundingBox => {
            imageops::crop_imm(image, left, top, right - left + 1, bottom - top + 1).to_image()
        }
        CropMode::Compact => GrayImage::from_fn(cols.len() as u32, rows.len() as u32, |x, y| {
            *image.get_pixel(cols[x as usize], rows[y as usize])
        }),
    };
    Ok(cropped)
}

/// Crop stage
#[derive(Debug, Clone, Default)]
pub struct CropNonEmpty {
    pub tolerance: u8,
    pub mode: CropMode,
}

impl Stage for CropNonEmpty {
    fn name(&self) -> &'static str {
        "crop_non_empty"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        crop_with_mode(image, self.tolerance, self.mode)
    }
}
