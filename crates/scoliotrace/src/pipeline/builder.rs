use image::Rgb;
use crate::{
    algorithms::{
        Binarize, CropMode, CropNonEmpty, Equalize, IsolateColumn, MedianFilter, SobelX,
        SuppressOffColumn, TraceCenterline, TraceOptions, WHITE,
    },
    config::StageConfig,
    pipeline::Pipeline,
    traits::Stage,
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    background: Rgb<u8>,
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    /// Create a new, empty pipeline builder
    pub fn new() -> Self {
        Self {
            background: WHITE,
            stages: Vec::new(),
        }
    }

    /// Builder preloaded with the stock scoliosis sequence
    pub fn reference(trace: TraceOptions) -> Self {
        StageConfig::reference_sequence(trace)
            .iter()
            .fold(Self::new(), |builder, stage| builder.add_boxed(stage.to_stage()))
    }

    /// Matte colour for transparent input
    pub fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }

    /// Append a stage to the pipeline
    pub fn add_stage<S>(mut self, stage: S) -> Self
    where
        S: Stage + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append an already boxed stage
    pub fn add_boxed(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_column_isolation(self) -> Self {
        self.add_stage(IsolateColumn)
    }

    pub fn with_crop(self, tolerance: u8, mode: CropMode) -> Self {
        self.add_stage(CropNonEmpty { tolerance, mode })
    }

    pub fn with_equalization(self) -> Self {
        self.add_stage(Equalize)
    }

    pub fn with_row_suppression(self) -> Self {
        self.add_stage(SuppressOffColumn)
    }

    pub fn with_median(self, size: u32) -> Self {
        self.add_stage(MedianFilter { size })
    }

    pub fn with_sobel(self) -> Self {
        self.add_stage(SobelX)
    }

    pub fn with_binarization(self) -> Self {
        self.add_stage(Binarize)
    }

    pub fn with_trace(self, options: TraceOptions) -> Self {
        self.add_stage(TraceCenterline { options })
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline::new(self.background, self.stages)
    }

    /// Build the stock scoliosis pipeline with default trace options
    pub fn build_reference() -> Pipeline {
        Self::reference(TraceOptions::default()).build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
