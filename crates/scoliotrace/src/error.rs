use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScolioError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Unsupported config format '{0}', use .toml or .json")]
    UnsupportedFileFormat(String),

    #[error("No pixel above tolerance {tolerance}, nothing to crop to")]
    EmptyRegion { tolerance: u8 },

    #[error("Sampled row {row} has no boundary pixel")]
    MalformedTrace { row: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ScolioError>;
