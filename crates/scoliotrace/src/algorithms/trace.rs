//! Centerline tracing on a binarized silhouette.
//!
//! Rows are sampled every tenth of the image height. On each sampled row
//! the outermost bright pixels bound the column, and consecutive midpoints
//! are joined with a thick gray stroke.

use image::{GrayImage, Luma};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut},
    point::Point,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};
use crate::{
    error::{Result, ScolioError},
    traits::Stage,
    types::TraceSample,
};

/// Lowest intensity counted as part of the silhouette
pub const BOUNDARY_LEVEL: u8 = 250;
/// Sample spacing as a share of the image height
pub const SAMPLE_FRACTION: f64 = 0.1;

/// What to do with a sampled row that has no boundary pixel
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MissingBoundary {
    /// Fail with [`ScolioError::MalformedTrace`]
    Reject,
    /// Drop the sample and keep tracing
    #[default]
    Skip,
    /// Count the missing boundary as column 0
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TraceOptions {
    /// Stroke width in pixels
    #[schemars(range(min = 1, max = 100))]
    pub stroke_width: u32,
    /// Gray level of the stroke
    pub stroke_level: u8,
    /// Leave the last sample unconnected
    pub drop_last_segment: bool,
    pub missing: MissingBoundary,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            stroke_width: 10,
            stroke_level: 128,
            drop_last_segment: true,
            missing: MissingBoundary::default(),
        }
    }
}

/// Vertical distance between sampled rows, `floor(0.1 * height)`
pub fn sample_step(height: u32) -> u32 {
    (f64::from(height) * SAMPLE_FRACTION) as u32
}

/// Rows `step, 2*step, ...` below `height`; none when the step is zero
pub fn sample_rows(height: u32) -> Vec<u32> {
    let step = sample_step(height);
    if step == 0 {
        return Vec::new();
    }
    (step..height).step_by(step as usize).collect()
}

/// First boundary pixel scanning left to right
pub fn left_boundary(image: &GrayImage, row: u32) -> Option<u32> {
    (0..image.width()).find(|&x| image.get_pixel(x, row)[0] >= BOUNDARY_LEVEL)
}

/// First boundary pixel scanning right to left. Column 0 is never visited.
pub fn right_boundary(image: &GrayImage, row: u32) -> Option<u32> {
    (1..image.width())
        .rev()
        .find(|&x| image.get_pixel(x, row)[0] >= BOUNDARY_LEVEL)
}

/// Sample the silhouette boundaries on every sampled row
pub fn sample_trace(image: &GrayImage, missing: MissingBoundary) -> Result<Vec<TraceSample>> {
    let mut samples = Vec::new();
    for row in sample_rows(image.height()) {
        let sample = TraceSample::new(row, left_boundary(image, row), right_boundary(image, row));
        if !sample.is_complete() {
            match missing {
                MissingBoundary::Reject => return Err(ScolioError::MalformedTrace { row }),
                MissingBoundary::Skip => {
                    warn!(row, "no boundary pixel on sampled row, skipping sample");
                    continue;
                }
                MissingBoundary::Inherit => {
                    warn!(row, midpoint = sample.midpoint, "no boundary pixel on sampled row, defaulting to column 0");
                }
            }
        }
        samples.push(sample);
    }
    Ok(samples)
}

/// Draw a straight stroke of the given width
fn draw_stroke(canvas: &mut GrayImage, from: (f32, f32), to: (f32, f32), width: u32, color: Luma<u8>) {
    if width <= 1 {
        draw_line_segment_mut(canvas, from, to, color);
        return;
    }

    let half = width as f32 / 2.0;
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length < f32::EPSILON {
        let center = (from.0.round() as i32, from.1.round() as i32);
        draw_filled_circle_mut(canvas, center, half.round() as i32, color);
        return;
    }

    let (nx, ny) = (-dy / length * half, dx / length * half);
    let corner = |(x, y): (f32, f32), sign: f32| {
        Point::new((x + sign * nx).round() as i32, (y + sign * ny).round() as i32)
    };
    let outline = [corner(from, 1.0), corner(to, 1.0), corner(to, -1.0), corner(from, -1.0)];
    if outline[0] == outline[3] {
        draw_line_segment_mut(canvas, from, to, color);
    } else {
        draw_polygon_mut(canvas, &outline, color);
    }
}

/// Number of segments joining `samples` points
fn segment_count(samples: usize, drop_last_segment: bool) -> usize {
    if drop_last_segment {
        samples.saturating_sub(2)
    } else {
        samples.saturating_sub(1)
    }
}

/// Draw the estimated centerline on a copy of a binarized image
pub fn trace_centerline(image: &GrayImage, options: &TraceOptions) -> Result<GrayImage> {
    if options.stroke_width == 0 {
        return Err(ScolioError::InvalidParameter(
            "stroke_width must be at least 1".to_string(),
        ));
    }

    let samples = sample_trace(image, options.missing)?;
    let segments = segment_count(samples.len(), options.drop_last_segment);
    debug!(samples = samples.len(), segments, "tracing centerline");

    let mut canvas = image.clone();
    let color = Luma([options.stroke_level]);
    for pair in samples.windows(2).take(segments) {
        let from = (pair[0].midpoint as f32, pair[0].row as f32);
        let to = (pair[1].midpoint as f32, pair[1].row as f32);
        draw_stroke(&mut canvas, from, to, options.stroke_width, color);
    }
    Ok(canvas)
}

/// Centerline tracing stage
#[derive(Debug, Clone, Default)]
pub struct TraceCenterline {
    pub options: TraceOptions,
}

impl Stage for TraceCenterline {
    fn name(&self) -> &'static str {
        "trace_centerline"
    }

    fn apply(&self, image: &GrayImage) -> Result<GrayImage> {
        trace_centerline(image, &self.options)
    }
}
