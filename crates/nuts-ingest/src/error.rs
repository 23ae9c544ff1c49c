//! Error types for boundary and population downloads.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or decoding provider data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Network Errors ===
    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Request failed before a response was received.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    // === Cache Errors ===
    /// Cache directory or file could not be read or written.
    #[error("failed to {operation} cache file {path}: {source}")]
    Cache {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// Body is not valid GeoJSON or not a feature collection.
    #[error("invalid GeoJSON from {source_name}: {message}")]
    GeoJson {
        source_name: String,
        message: String,
    },

    /// Body could not be parsed as CSV.
    #[error("failed to parse CSV from {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// Provider response lacks an expected attribute.
    #[error("required column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// Time period value is not a year.
    #[error("invalid TIME_PERIOD value '{value}' in {source_name}")]
    InvalidTimePeriod { value: String, source_name: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Status {
            url: "https://example.org/data".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "request to https://example.org/data returned HTTP 404"
        );

        let err = IngestError::MissingColumn {
            column: "NUTS_ID".to_string(),
            source_name: "NUTS_RG_20M_2016_4326_LEVL_3.geojson".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required column 'NUTS_ID' not found in NUTS_RG_20M_2016_4326_LEVL_3.geojson"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
