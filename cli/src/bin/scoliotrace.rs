use clap::{Parser, Subcommand};
use scoliotrace_cli::{ProcessOptions, load_config, parse_background, process_files};
use color_eyre::eyre::Result;
use scoliotrace::{MissingBoundary, PipelineConfig, StageConfig};
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Trace the vertebral column on spine radiographs", long_about = None)]
struct Cli {
    /// Log every stage at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace one or more radiographs and save before/after composites
    Process {
        /// Radiograph files to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory receiving the composites
        #[arg(short, long, default_value = "results")]
        output_dir: PathBuf,
        /// Pipeline config (.toml or .json), the stock pipeline otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Matte colour for transparent input, as R,G,B
        #[arg(long, value_parser = parse_background)]
        background: Option<[u8; 3]>,
        /// Also draw the segment to the last sampled row
        #[arg(long)]
        keep_last_segment: bool,
        /// Handling of sampled rows without a boundary: reject, skip or inherit
        #[arg(long)]
        missing: Option<MissingBoundary>,
    },
    /// Write the stock pipeline config to a .toml or .json file
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
    /// Print the JSON schema of the pipeline config
    Schema,
    /// List the available stages
    Stages,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level))
        )
        .init();

    match cli.command {
        Commands::Process {
            inputs,
            output_dir,
            config,
            background,
            keep_last_segment,
            missing,
        } => {
            let options = ProcessOptions {
                config,
                background,
                keep_last_segment,
                missing,
            };
            let pipeline = load_config(&options)?.build();
            info!("{}", pipeline.info());

            // Create output directory if it doesn't exist
            std::fs::create_dir_all(&output_dir)?;

            let written = process_files(&pipeline, &inputs, &output_dir)?;
            info!("✅ Traced {} radiograph(s) into {}", written.len(), output_dir.display());
        }
        Commands::InitConfig { path } => {
            PipelineConfig::default().to_file(&path)?;
            info!("Wrote stock pipeline config to {}", path.display());
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&PipelineConfig::schema())?);
        }
        Commands::Stages => {
            for stage in StageConfig::iter() {
                println!("{:<20} {}", stage.to_string(), stage.description());
            }
        }
    }

    Ok(())
}
