use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KdError {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("statistics requested over an empty point set")]
    EmptyInput,

    #[error("too many points to average exactly: {0}")]
    TooManyPoints(usize),

    #[error("points must have at least one coordinate")]
    ZeroDimension,

    #[error("axis {axis} is out of range for dimension {dimension}")]
    InvalidAxis { axis: usize, dimension: usize },

    #[error("cannot query an empty index")]
    EmptyIndex,

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("cannot load tree from {}: {reason}", .path.display())]
    MissingPersistedTree { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KdError>;
