pub mod builder;

use std::time::Instant;

use image::{DynamicImage, GrayImage, Rgb};
use tracing::{debug, debug_span};
use crate::{
    algorithms::{merge_side_by_side, reduce},
    error::Result,
    traits::Stage,
    types::PipelineOutput,
};

/// Ordered chain of stages run on the grayscale form of a radiograph
pub struct Pipeline {
    background: Rgb<u8>,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(background: Rgb<u8>, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { background, stages }
    }

    /// Matte used when flattening transparent input
    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    /// Flatten transparency and reduce to one intensity channel
    pub fn reduce(&self, image: &DynamicImage) -> GrayImage {
        reduce(image, self.background)
    }

    /// Run every stage in order on an already reduced image
    pub fn run_stages(&self, image: &GrayImage) -> Result<GrayImage> {
        let mut current = image.clone();
        for stage in &self.stages {
            let span = debug_span!("stage", stage = stage.name());
            let _guard = span.enter();
            let started = Instant::now();
            current = stage.apply(&current)?;
            debug!(
                width = current.width(),
                height = current.height(),
                elapsed = ?started.elapsed(),
                "stage finished"
            );
        }
        Ok(current)
    }

    /// Process a decoded radiograph through the entire pipeline
    pub fn process(&self, image: &DynamicImage) -> Result<PipelineOutput> {
        let original = self.reduce(image);
        let traced = self.run_stages(&original)?;
        let composite = merge_side_by_side(&original, &traced);
        Ok(PipelineOutput {
            original,
            traced,
            composite,
        })
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} stages ({})",
            self.stages.len(),
            self.stage_names().join(" -> ")
        )
    }
}
