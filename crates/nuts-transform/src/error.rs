//! Error types for selection, filtering and the join.

use thiserror::Error;

/// Errors raised while reconciling regions with observations.
#[derive(Debug, Error)]
pub enum TransformError {
    // === Empty Results ===
    /// No boundary feature carries the requested country code.
    #[error("no regions found for country {country} in NUTS {schema_year}")]
    NoRegions { country: String, schema_year: i32 },

    /// No observation survives the date, level, stratum and country filter.
    #[error("no population observations found for country {country} in {stat_year}")]
    NoObservations { country: String, stat_year: i32 },

    // === Schema Errors ===
    /// An input frame lacks a column the stage depends on.
    #[error("required column '{column}' not found in {frame}")]
    MissingColumn { column: String, frame: &'static str },

    // === Validation Errors ===
    /// An observation value is neither numeric nor a missing marker.
    #[error("non-numeric value '{value}' for region {region} in {column}")]
    NonNumeric {
        value: String,
        region: String,
        column: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
