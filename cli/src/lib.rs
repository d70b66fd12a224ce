use std::path::{Path, PathBuf};

use scoliotrace::{MissingBoundary, Pipeline, PipelineConfig, ScolioError};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] ScolioError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Input path has no file name: {0}")]
    MissingFileName(PathBuf),
    #[error("Invalid background colour '{0}', expected R,G,B")]
    InvalidBackground(String),
    #[error("{failed} of {total} files failed")]
    BatchFailed { failed: usize, total: usize },
}

/// Command-line overrides applied on top of the pipeline config
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub config: Option<PathBuf>,
    pub background: Option<[u8; 3]>,
    pub keep_last_segment: bool,
    pub missing: Option<MissingBoundary>,
}

/// Parse an `R,G,B` triple
pub fn parse_background(value: &str) -> Result<[u8; 3], CliError> {
    let channels: Vec<u8> = value
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| CliError::InvalidBackground(value.to_string()))?;
    <[u8; 3]>::try_from(channels).map_err(|_| CliError::InvalidBackground(value.to_string()))
}

/// Load the config file (or the default one) and apply the overrides
pub fn load_config(options: &ProcessOptions) -> Result<PipelineConfig, CliError> {
    let mut config = match &options.config {
        Some(path) => {
            info!("Loading pipeline config from {}", path.display());
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(background) = options.background {
        config.background = background;
    }
    if let Some(trace) = config.trace_options_mut() {
        if options.keep_last_segment {
            trace.drop_last_segment = false;
        }
        if let Some(missing) = options.missing {
            trace.missing = missing;
        }
    }
    Ok(config)
}

/// Where the composite for `input` is written: same file name, inside `output_dir`
pub fn output_path(output_dir: &Path, input: &Path) -> Result<PathBuf, CliError> {
    let name = input
        .file_name()
        .ok_or_else(|| CliError::MissingFileName(input.to_path_buf()))?;
    Ok(output_dir.join(name))
}

/// Decode one radiograph, trace it and save the side-by-side composite
pub fn process_file(pipeline: &Pipeline, input: &Path, output_dir: &Path) -> Result<PathBuf, CliError> {
    let target = output_path(output_dir, input)?;
    let radiograph = image::open(input)?;
    let output = pipeline.process(&radiograph)?;
    output.save_composite(&target)?;
    Ok(target)
}

/// Process every input in turn; failures are logged and reported together
pub fn process_files(
    pipeline: &Pipeline,
    inputs: &[PathBuf],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, CliError> {
    let mut written = Vec::with_capacity(inputs.len());
    let mut failed = 0;

    for input in inputs {
        match process_file(pipeline, input, output_dir) {
            Ok(target) => {
                info!("Traced {} -> {}", input.display(), target.display());
                written.push(target);
            }
            Err(e) => {
                error!("Failed to process {}: {}", input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: inputs.len(),
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn parses_background_triples() {
        assert_eq!(parse_background("0, 128,255").unwrap(), [0, 128, 255]);
        assert!(matches!(
            parse_background("1,2"),
            Err(CliError::InvalidBackground(_))
        ));
        assert!(matches!(
            parse_background("1,2,300"),
            Err(CliError::InvalidBackground(_))
        ));
    }

    #[test]
    fn output_keeps_the_file_name() {
        let target = output_path(Path::new("results"), Path::new("scans/patient_01.png")).unwrap();
        assert_eq!(target, PathBuf::from("results/patient_01.png"));
        assert!(output_path(Path::new("results"), Path::new("..")).is_err());
    }

    #[test]
    fn overrides_reach_the_trace_stage() {
        let options = ProcessOptions {
            background: Some([0, 0, 0]),
            keep_last_segment: true,
            missing: Some(MissingBoundary::Inherit),
            ..ProcessOptions::default()
        };
        let mut config = load_config(&options).unwrap();
        assert_eq!(config.background, [0, 0, 0]);
        let trace = config.trace_options_mut().unwrap();
        assert!(!trace.drop_last_segment);
        assert_eq!(trace.missing, MissingBoundary::Inherit);
    }

    #[test]
    fn batch_writes_composites_and_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.png");
        GrayImage::from_fn(30, 40, |x, _| Luma([if (10..20).contains(&x) { 220 } else { 15 }]))
            .save(&input)
            .unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        let pipeline = Pipeline::builder().with_binarization().build();
        let written = process_files(&pipeline, &[input.clone()], &out_dir).unwrap();
        assert_eq!(written, vec![out_dir.join("scan.png")]);
        let composite = image::open(&written[0]).unwrap();
        assert_eq!((composite.width(), composite.height()), (60, 40));

        let missing = dir.path().join("missing.png");
        assert!(matches!(
            process_files(&pipeline, &[input, missing], &out_dir),
            Err(CliError::BatchFailed { failed: 1, total: 2 })
        ));
    }
}
