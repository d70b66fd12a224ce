//! Heuristics that suppress image regions unlikely to hold the spine.
//!
//! [`isolate_column`] works on whole columns against a global cut point,
//! [`suppress_off_column`] works row by row against the row median.

use image::{GrayImage, Luma};
use crate::{
    algorithms::stats::{mean_intensity, row_median},
    error::Result,
    traits::Stage,
};

/// Gain applied to a pixel before comparing it with the global cut point
pub const COLUMN_BRIGHTNESS_GAIN: f64 = 1.6;
/// A column is blank when at most this share of its rows is bright
pub const BLANK_ROW_RATIO: f64 = 0.6;
/// Blank columns closer than this share of the width are merged
pub const MERGE_GAP_RATIO: f64 = 0.2;
/// Gain applied to a pixel before comparing it with its row median
pub const ROW_SUPPRESSION_GAIN: f64 = 0.9;

/// Number of rows in column `x` whose boosted value beats `cut_point`
pub fn column_brightness_count(image: &GrayImage, x: u32, cut_point: f64) -> u32 {
    (0..image.height())
        .filter(|&y| f64::from(image.get_pixel(x, y)[0]) * COLUMN_BRIGHTNESS_GAIN > cut_point)
        .count() as u32
}

/// Indices of the columns judged blank, in increasing order
pub fn blank_columns(image: &GrayImage) -> Vec<u32> {
    let cut_point = mean_intensity(image);
    let limit = f64::from(image.height()) * BLANK_ROW_RATIO;
    (0..image.width())
        .filter(|&x| f64::from(column_brightness_count(image, x, cut_point)) <= limit)
        .collect()
}

/// Zero the strips between nearby blank columns.
///
/// Each pair of consecutive blank indices `(a, b)` with `b - a` within the
/// merge gap blanks columns `a..b` over every row; `b` itself is only
/// zeroed when it opens the next strip.
pub fn isolate_column(image: &GrayImage) -> GrayImage {
    let mut isolated = image.clone();
    let max_gap = f64::from(image.width()) * MERGE_GAP_RATIO;

    for pair in blank_columns(image).windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if f64::from(end - start) > max_gap {
            continue;
        }
        for x in start..end {
            for y in 0..image.height() {
                isolated.put_pixel(x, y, Luma([0]));
            }
        }
    }
    isolated
}

fn suppress_row(row: &mut [u8]) {
    let Some(median) = row_median(row) else {
        return;
    };
    for value in row.iter_mut().rev() {
        if f64::from(*value) * ROW_SUPPRESSION_GAIN <= median {
            *value = 0;
        }
    }
}

/// Row-median suppression, in place.
///
/// A forward pass visits every row top to bottom. The backward pass then
/// runs bottom to top over the already suppressed buffer, skipping row 0 and
/// column 0, with each row median recomputed over the pixels it visits.
pub fn suppress_off_column_mut(image: &mut GrayImage) {
    let width = image.width() as usize;
    if width == 0 || image.height() == 0 {
        return;
    }

    for row in image.chunks_exact_mut(width) {
        suppress_row(row);
    }
    for row in image.chunks_exact_mut(width).skip(1).rev() {
        suppress_row(&mut row[1..]);
    }
}

/// Copying form of [`suppress_off_column_mut`]
pub fn suppress_off_column(image: &GrayImage) -> GrayImage {
    let mut suppressed = image.clone();
    suppress_off_column_mut(&mut suppressed);
    suppressed
}

/// Column isolation stage
#[derive(Debug, Clone, Default)]
pub struct IsolateColumn;

impl Stage for IsolateColumn {
    fn name(&self) -> &'static str {
        "isolate_column"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(isolate_column(image))
    }
}

/// Row-band suppression stage
#[derive(Debug, Clone, Default)]
pub struct SuppressOffColumn;

impl Stage for SuppressOffColumn {
    fn name(&self) -> &'static str {
        "suppress_off_column"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(suppress_off_column(image))
    }
}
