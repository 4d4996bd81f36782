use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("table operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("failed to load structure {path}: {details}")]
    Structure { path: PathBuf, details: String },

    #[error("column '{0}' not found in the model table")]
    MissingColumn(String),

    #[error("invalid identifier pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
