use std::{fs, path::Path};

use image::Rgb;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};
use crate::{
    algorithms::{
        Binarize, CropMode, CropNonEmpty, Equalize, IsolateColumn, MedianFilter, SobelX,
        SuppressOffColumn, TraceCenterline, TraceOptions,
    },
    error::{Result, ScolioError},
    pipeline::{Pipeline, builder::PipelineBuilder},
    traits::Stage,
};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StageConfig {
    /// Zero strips of columns that are unlikely to hold the spine
    IsolateColumn,

    /// Crop to the pixels above a tolerance
    CropNonEmpty {
        #[serde(default)]
        tolerance: u8,
        #[serde(default)]
        mode: CropMode,
    },

    /// Histogram equalization
    Equalize,

    /// Row-median suppression, forward then backward
    SuppressOffColumn,

    /// Median smoothing with the given window diameter
    MedianFilter {
        #[schemars(range(min = 0, max = 64))]
        size: u32,
    },

    /// Horizontal Sobel edge magnitude
    SobelX,

    /// Global-mean binarization
    Binarize,

    /// Draw the sampled centerline
    TraceCenterline(TraceOptions),
}

impl StageConfig {
    /// The stock scoliosis sequence
    pub fn reference_sequence(trace: TraceOptions) -> Vec<Self> {
        vec![
            Self::IsolateColumn,
            Self::CropNonEmpty {
                tolerance: 0,
                mode: CropMode::default(),
            },
            Self::Equalize,
            Self::SuppressOffColumn,
            Self::MedianFilter { size: 2 },
            Self::Equalize,
            Self::MedianFilter { size: 4 },
            Self::SobelX,
            Self::MedianFilter { size: 8 },
            Self::SuppressOffColumn,
            Self::Binarize,
            Self::TraceCenterline(trace),
        ]
    }

    /// Get a list of all available stage names
    pub fn stage_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the stage
    pub fn description(&self) -> &'static str {
        match self {
            Self::IsolateColumn => "Zero strips between nearby columns judged blank against the global mean",
            Self::CropNonEmpty { .. } => "Crop to the rows and columns holding pixels above the tolerance",
            Self::Equalize => "Spread intensities through the cumulative histogram",
            Self::SuppressOffColumn => "Zero pixels at or below their row median, forward then backward",
            Self::MedianFilter { .. } => "Replace each pixel with the median of its clipped window",
            Self::SobelX => "Horizontal gradient magnitude, border copied",
            Self::Binarize => "Black at or below the global mean, white above",
            Self::TraceCenterline(_) => "Join the silhouette midpoints of sampled rows with a gray stroke",
        }
    }

    /// Instantiate the stage this entry describes
    pub fn to_stage(&self) -> Box<dyn Stage> {
        match self {
            Self::IsolateColumn => Box::new(IsolateColumn),
            Self::CropNonEmpty { tolerance, mode } => Box::new(CropNonEmpty {
                tolerance: *tolerance,
                mode: *mode,
            }),
            Self::Equalize => Box::new(Equalize),
            Self::SuppressOffColumn => Box::new(SuppressOffColumn),
            Self::MedianFilter { size } => Box::new(MedianFilter { size: *size }),
            Self::SobelX => Box::new(SobelX),
            Self::Binarize => Box::new(Binarize),
            Self::TraceCenterline(options) => Box::new(TraceCenterline {
                options: options.clone(),
            }),
        }
    }
}

/// Serializable description of a whole pipeline
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PipelineConfig {
    /// Matte colour (RGB) for transparent input
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    pub stages: Vec<StageConfig>,
}

fn default_background() -> [u8; 3] {
    [255, 255, 255]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            stages: StageConfig::reference_sequence(TraceOptions::default()),
        }
    }
}

impl PipelineConfig {
    /// Get the JSON schema of the config file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PipelineConfig)
    }

    /// Turn the config into a runnable pipeline
    pub fn build(&self) -> Pipeline {
        self.stages
            .iter()
            .fold(
                PipelineBuilder::new().with_background(Rgb(self.background)),
                |builder, stage| builder.add_boxed(stage.to_stage()),
            )
            .build()
    }

    /// Options of the last trace stage, if the config has one
    pub fn trace_options_mut(&mut self) -> Option<&mut TraceOptions> {
        self.stages.iter_mut().rev().find_map(|stage| match stage {
            StageConfig::TraceCenterline(options) => Some(options),
            _ => None,
        })
    }

    /// Load a config from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a config from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a config from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path_ref),
            Some("json") => Self::from_json_file(path_ref),
            other => Err(ScolioError::UnsupportedFileFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Save the config, format picked from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            other => {
                return Err(ScolioError::UnsupportedFileFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        fs::write(path_ref, content)?;
        Ok(())
    }

    /// Convert to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::MissingBoundary;
    use strum::IntoEnumIterator;

    #[test]
    fn default_config_matches_reference_pipeline() {
        let pipeline = PipelineConfig::default().build();
        assert_eq!(
            pipeline.stage_names(),
            PipelineBuilder::build_reference().stage_names()
        );
        assert_eq!(pipeline.stage_names().len(), 12);
        assert_eq!(pipeline.stage_names()[0], "isolate_column");
        assert_eq!(pipeline.stage_names()[11], "trace_centerline");
    }

    #[test]
    fn json_round_trip() {
        let config = PipelineConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"type\": \"median_filter\""));
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn toml_round_trip() {
        let config = PipelineConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let config = PipelineConfig::from_json(
            r#"{
                "stages": [
                    { "type": "crop_non_empty", "params": {} },
                    { "type": "median_filter", "params": { "size": 4 } },
                    { "type": "trace_centerline", "params": { "missing": "reject" } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.background, [255, 255, 255]);
        assert_eq!(
            config.stages[0],
            StageConfig::CropNonEmpty {
                tolerance: 0,
                mode: CropMode::BoundingBox
            }
        );
        let StageConfig::TraceCenterline(options) = &config.stages[2] else {
            panic!("expected a trace stage");
        };
        assert_eq!(options.missing, MissingBoundary::Reject);
        assert_eq!(options.stroke_width, 10);
        assert!(options.drop_last_segment);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            PipelineConfig::from_file("pipeline.yaml"),
            Err(ScolioError::UnsupportedFileFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn every_stage_has_a_name_and_description() {
        let names = StageConfig::stage_names();
        for (stage, name) in StageConfig::iter().zip(names) {
            assert_eq!(stage.to_string(), *name);
            assert_eq!(stage.to_stage().name(), *name);
            assert!(!stage.description().is_empty());
        }
    }

    #[test]
    fn background_reaches_the_pipeline() {
        let config = PipelineConfig {
            background: [0, 0, 0],
            stages: vec![StageConfig::Binarize],
        };
        assert_eq!(config.build().background(), Rgb([0, 0, 0]));
        assert_eq!(PipelineConfig::default().build().background(), Rgb([255, 255, 255]));
    }

    #[test]
    fn schema_describes_tagged_stages() {
        let schema = serde_json::to_value(PipelineConfig::schema()).unwrap();
        assert!(schema["properties"]["stages"].is_object());
        let text = schema.to_string();
        for name in StageConfig::stage_names() {
            assert!(text.contains(name), "schema is missing {name}");
        }
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.trace_options_mut().unwrap().missing = MissingBoundary::Inherit;

        for file in ["pipeline.toml", "pipeline.json"] {
            let path = dir.path().join(file);
            config.to_file(&path).unwrap();
            assert_eq!(PipelineConfig::from_file(&path).unwrap(), config);
        }

        assert!(matches!(
            config.to_file(dir.path().join("pipeline.yaml")),
            Err(ScolioError::UnsupportedFileFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn trace_options_can_be_overridden() {
        let mut config = PipelineConfig::default();
        config.trace_options_mut().unwrap().drop_last_segment = false;
        let StageConfig::TraceCenterline(options) = config.stages.last().unwrap() else {
            panic!("expected a trace stage");
        };
        assert!(!options.drop_last_segment);
    }
}
