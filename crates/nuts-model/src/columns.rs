//! Column names shared by the providers, the transform stage and the writer.
//!
//! These must stay in sync with the upstream GISCO GeoJSON properties and the
//! Eurostat SDMX-CSV header.

use std::fmt;

use serde::Serialize;

use crate::years::StatYear;

// Boundary features (GISCO).
pub const NUTS_ID: &str = "NUTS_ID";
pub const CNTR_CODE: &str = "CNTR_CODE";
pub const LEVL_CODE: &str = "LEVL_CODE";
/// GeoJSON text of the feature geometry.
pub const GEOMETRY: &str = "geometry";

// Observations (Eurostat SDMX-CSV).
pub const GEO: &str = "geo";
pub const TIME_PERIOD: &str = "TIME_PERIOD";
pub const SEX: &str = "sex";
pub const AGE: &str = "age";
pub const OBS_VALUE: &str = "OBS_VALUE";

/// Sex stratum covering all sexes.
pub const SEX_TOTAL: &str = "T";
/// Age stratum covering all ages.
pub const AGE_TOTAL: &str = "TOTAL";

/// Eurostat dataset: population on 1 January by age group, sex and NUTS 3 region.
pub const POPULATION_DATASET: &str = "demo_r_pjangrp3";

/// Name of the population attribute added to each region, e.g. `POP_2018`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PopulationColumn {
    year: StatYear,
    name: String,
}

impl PopulationColumn {
    pub fn for_year(year: StatYear) -> Self {
        Self {
            year,
            name: format!("POP_{}", year.year()),
        }
    }

    pub fn year(&self) -> StatYear {
        self.year
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PopulationColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_column_name() {
        let column = PopulationColumn::for_year(StatYear::new(2018));
        assert_eq!(column.name(), "POP_2018");
        assert_eq!(column.to_string(), "POP_2018");
        assert_eq!(column.year(), StatYear::new(2018));
    }
}
