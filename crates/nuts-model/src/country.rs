//! Two-letter country codes as used by GISCO and Eurostat.
//!
//! Eurostat codes follow ISO 3166-1 alpha-2 with two exceptions (`EL` for
//! Greece, `UK` for the United Kingdom); no mapping is applied, the code is
//! used as given after normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Normalized (uppercase) two-letter country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalize a country code.
    ///
    /// Surrounding whitespace is ignored; the code must then consist of
    /// exactly two ASCII letters.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidCountryCode {
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if a region identifier starts with this code.
    ///
    /// Case-sensitive: identifiers are joined verbatim, so `de111` does not
    /// belong to `DE`.
    pub fn is_prefix_of(&self, region_id: &str) -> bool {
        region_id.get(..2) == Some(self.0.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
