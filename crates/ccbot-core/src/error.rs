use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the chunk, index and query stages
#[derive(Debug, Error)]
pub enum Error {
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("embedding service failed: {0}")]
    EmbeddingService(String),

    #[error("generation service failed: {0}")]
    GenerationService(String),

    #[error("index and metadata are out of alignment: {0}")]
    IndexAlignment(String),

    #[error("query vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("chunk at position {position} has empty text")]
    EmptyChunkText { position: usize },

    #[error("query is empty")]
    EmptyQuery,

    #[error("failed to encode index: {0}")]
    Encode(String),

    #[error(transparent)]
    Config(#[from] ccbot_config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Map an IO error on `path`, turning NotFound into [`Error::InputNotFound`]
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound { path: path.into() }
        } else {
            Error::Io(err)
        }
    }
}
