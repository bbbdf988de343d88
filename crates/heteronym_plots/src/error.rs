use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeteronymError>;

#[derive(Debug, Error)]
pub enum HeteronymError {
    #[error("No CSV files matching {pattern} found in {}", dir.display())]
    NoInput { dir: PathBuf, pattern: String },

    #[error("Missing required columns in {}: {}", dir.display(), missing.join(", "))]
    MissingColumns { dir: PathBuf, missing: Vec<String> },

    #[error("Failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV parse error in {}: {source}", path.display())]
    CsvFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No usable system font found (tried: {0})")]
    FontNotFound(String),

    #[error("Figure of {width}x{height} px exceeds the canvas limit")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl From<toml::de::Error> for HeteronymError {
    fn from(err: toml::de::Error) -> Self {
        HeteronymError::Config(format!("TOML parse error: {}", err))
    }
}
