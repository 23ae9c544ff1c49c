//! Export error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing the output file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// File system operation failed.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite statement failed.
    #[error("failed to {operation}: {source}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Feature geometry could not be decoded or encoded.
    #[error("invalid geometry in feature {feature}: {message}")]
    Geometry { feature: String, message: String },

    /// Layer name cannot be used as a table name.
    #[error("invalid layer name '{name}'")]
    InvalidLayerName { name: String },

    /// The completed temp file could not be moved over the destination.
    #[error("failed to replace {target_path} with {temp_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Attach an operation label to a SQLite error.
pub(crate) fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> OutputError {
    move |source| OutputError::Sqlite { operation, source }
}
