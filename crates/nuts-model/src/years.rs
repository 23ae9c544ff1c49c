//! Boundary vintages and statistical reference years.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// NUTS boundary release vintage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaYear {
    Nuts2013,
    Nuts2016,
    Nuts2021,
    Nuts2024,
}

impl SchemaYear {
    /// All known vintages, oldest first.
    pub const ALL: [SchemaYear; 4] = [
        SchemaYear::Nuts2013,
        SchemaYear::Nuts2016,
        SchemaYear::Nuts2021,
        SchemaYear::Nuts2024,
    ];

    /// Look up a vintage by its release year.
    pub fn from_year(year: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|schema| schema.year() == year)
    }

    pub fn year(self) -> i32 {
        match self {
            SchemaYear::Nuts2013 => 2013,
            SchemaYear::Nuts2016 => 2016,
            SchemaYear::Nuts2021 => 2021,
            SchemaYear::Nuts2024 => 2024,
        }
    }
}

impl fmt::Display for SchemaYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

/// Reference year of the population counts.
///
/// Any integer can be wrapped; legality against a vintage is decided by
/// [`crate::compat::validate`], which is the only way to obtain a
/// [`YearPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatYear(i32);

impl StatYear {
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    pub const fn year(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StatYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schema year and statistics year that passed the compatibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearPair {
    pub(crate) schema: SchemaYear,
    pub(crate) stat: StatYear,
}

impl YearPair {
    pub fn schema(&self) -> SchemaYear {
        self.schema
    }

    pub fn stat(&self) -> StatYear {
        self.stat
    }
}

/// Parse a command-line year argument.
///
/// `field` names the argument in the error message ("schema year",
/// "stat year").
pub fn parse_year(field: &'static str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ModelError::InvalidYear {
            field,
            value: value.to_string(),
        })
}
