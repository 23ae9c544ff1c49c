//! Error types for input validation and the year compatibility policy.

use thiserror::Error;

use crate::compat::CompatibilityError;

/// Errors raised before any data is fetched.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Country code is not exactly two alphabetic characters.
    #[error("invalid country code '{value}': expected exactly 2 letters (e.g. DE)")]
    InvalidCountryCode { value: String },

    /// Year argument is not an integer.
    #[error("invalid {field} '{value}': expected an integer year")]
    InvalidYear { field: &'static str, value: String },

    /// Unknown resolution code.
    #[error("invalid resolution '{value}': expected one of 01M, 03M, 10M, 20M, 60M")]
    InvalidResolution { value: String },

    /// CRS argument is not an EPSG code.
    #[error("invalid CRS '{value}': expected an EPSG code such as 4326 or EPSG:3035")]
    InvalidCrs { value: String },

    /// Unsupported coordinate reference system.
    #[error("unsupported CRS EPSG:{epsg}: expected one of 4326, 3035, 3857")]
    UnsupportedCrs { epsg: u32 },


    /// Schema year and statistics year do not form a legal pair.
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InvalidCountryCode {
            value: "DEU".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid country code 'DEU': expected exactly 2 letters (e.g. DE)"
        );

        let err = ModelError::InvalidYear {
            field: "stat year",
            value: "twenty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid stat year 'twenty': expected an integer year"
        );
    }
}
