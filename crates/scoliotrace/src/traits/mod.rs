use image::GrayImage;
use crate::error::Result;

/// One step of the tracing pipeline.
///
/// Stages are pure: they read the input buffer and hand back a freshly
/// allocated one, so a pipeline can be replayed on the same image.
pub trait Stage: Send + Sync {
    /// Short snake_case name, used in logs and configs
    fn name(&self) -> &'static str;

    /// Transform a single-channel image
    fn apply(&self, image: &GrayImage) -> Result<GrayImage>;
}
