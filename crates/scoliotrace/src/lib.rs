//! # Spine Centerline Tracing Library
//!
//! Turns a radiograph of a spine into a binary silhouette of the vertebral
//! column and draws its estimated centerline, as a visual aid for judging
//! scoliosis.
//!
//! ## Core Features
//!
//! - **Pure stages**: every transform reads one buffer and returns a new one
//! - **Pipeline System**: compose stages with a builder or from a TOML/JSON config
//! - **Named statistics**: window median, row median, column brightness are
//!   exposed on their own
//! - **Explicit degeneracy**: empty crops and rows without a boundary surface
//!   as errors or logged decisions instead of garbage pixels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scoliotrace::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::build_reference();
//!
//! let radiograph = image::open("spine.png")?;
//! let output = pipeline.process(&radiograph)?;
//! output.save_composite("spine_traced.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use scoliotrace::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .with_equalization()
//!     .with_median(4)
//!     .with_binarization()
//!     .with_trace(TraceOptions { drop_last_segment: false, ..Default::default() })
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod config;

// Re-exports for convenience
pub use error::{ScolioError, Result};
pub use types::{ChannelMode, PipelineOutput, TraceSample};
pub use traits::Stage;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use config::{PipelineConfig, StageConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    /// Dark frame with a brighter, slightly tilted vertical band
    fn synthetic_radiograph() -> GrayImage {
        GrayImage::from_fn(120, 160, |x, y| {
            let center = 50 + y / 16;
            let level = if x + 12 >= center && x <= center + 12 {
                200 + ((x + y) % 30) as u8
            } else {
                20 + ((x * 7 + y * 3) % 25) as u8
            };
            Luma([level])
        })
    }

    #[test]
    fn test_reference_pipeline_runs() {
        let pipeline = PipelineBuilder::build_reference();
        let input = DynamicImage::ImageLuma8(synthetic_radiograph());

        let output = pipeline.process(&input).expect("Should process successfully");
        assert_eq!(output.original.dimensions(), (120, 160));
        assert_eq!(
            output.composite.width(),
            output.original.width() + output.traced.width()
        );
        assert_eq!(
            output.composite.height(),
            output.original.height().max(output.traced.height())
        );
        assert!(output
            .traced
            .pixels()
            .all(|p| p[0] == 0 || p[0] == 255 || p[0] == 128));
    }

    #[test]
    fn test_composite_holds_original_on_the_left() {
        let pipeline = Pipeline::builder().with_binarization().build();
        let gray = synthetic_radiograph();
        let output = pipeline
            .process(&DynamicImage::ImageLuma8(gray.clone()))
            .expect("Should process successfully");

        assert_eq!(output.original, gray);
        assert_eq!(output.composite.get_pixel(3, 7), gray.get_pixel(3, 7));
        assert_eq!(
            output.composite.get_pixel(120 + 3, 7),
            output.traced.get_pixel(3, 7)
        );
    }

    #[test]
    fn test_transparent_input_is_flattened() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let pipeline = Pipeline::builder().build();
        let output = pipeline
            .process(&DynamicImage::ImageRgba8(rgba))
            .expect("Should process successfully");
        assert!(output.original.pixels().all(|p| p[0] == 255));
        assert_eq!(output.traced, output.original);
    }

    #[test]
    fn test_stage_errors_propagate() {
        let pipeline = Pipeline::builder().with_crop(0, CropMode::BoundingBox).build();
        let black = DynamicImage::ImageLuma8(GrayImage::new(8, 8));
        assert!(matches!(
            pipeline.process(&black),
            Err(ScolioError::EmptyRegion { tolerance: 0 })
        ));
    }

    #[test]
    fn test_pipeline_info() {
        let pipeline = Pipeline::builder()
            .with_median(2)
            .with_sobel()
            .build();
        assert_eq!(pipeline.info(), "Pipeline: 2 stages (median_filter -> sobel_x)");
    }

    #[test]
    fn test_stages_do_not_mutate_input() {
        let gray = synthetic_radiograph();
        let before = gray.clone();
        let pipeline = PipelineBuilder::build_reference();
        let _ = pipeline.run_stages(&gray);
        assert_eq!(gray, before);
    }
}
