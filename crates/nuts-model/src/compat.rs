//! Compatibility policy between NUTS boundary vintages and statistics years.
//!
//! Each boundary release is only valid for the reference years in which the
//! statistical office published counts against that release:
//!
//! | schema year | stat years  |
//! |-------------|-------------|
//! | 2013        | 2014 – 2017 |
//! | 2016        | 2018 – 2020 |
//! | 2021        | 2021 – 2023 |
//! | 2024        | 2024 – 2030 |
//!
//! [`validate`] is total over any pair of integers and never touches the
//! network; callers run it before fetching anything.

use std::fmt;
use std::ops::RangeInclusive;

use crate::years::{SchemaYear, StatYear, YearPair};

/// Inclusive statistics-year range for a boundary vintage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityRule {
    pub schema: SchemaYear,
    pub first_stat_year: i32,
    pub last_stat_year: i32,
}

impl CompatibilityRule {
    pub fn stat_years(&self) -> RangeInclusive<i32> {
        self.first_stat_year..=self.last_stat_year
    }

    pub fn allows(&self, stat_year: i32) -> bool {
        self.stat_years().contains(&stat_year)
    }
}

/// The canonical rule table, ordered by schema year.
pub static COMPATIBILITY_RULES: [CompatibilityRule; 4] = [
    CompatibilityRule {
        schema: SchemaYear::Nuts2013,
        first_stat_year: 2014,
        last_stat_year: 2017,
    },
    CompatibilityRule {
        schema: SchemaYear::Nuts2016,
        first_stat_year: 2018,
        last_stat_year: 2020,
    },
    CompatibilityRule {
        schema: SchemaYear::Nuts2021,
        first_stat_year: 2021,
        last_stat_year: 2023,
    },
    CompatibilityRule {
        schema: SchemaYear::Nuts2024,
        first_stat_year: 2024,
        last_stat_year: 2030,
    },
];

/// Look up the rule for a vintage.
pub fn rule_for(schema: SchemaYear) -> &'static CompatibilityRule {
    let index = match schema {
        SchemaYear::Nuts2013 => 0,
        SchemaYear::Nuts2016 => 1,
        SchemaYear::Nuts2021 => 2,
        SchemaYear::Nuts2024 => 3,
    };
    &COMPATIBILITY_RULES[index]
}

/// Enumerate every legal (schema year, stat year) pair.
pub fn allowed_pairs() -> impl Iterator<Item = (i32, i32)> {
    COMPATIBILITY_RULES
        .iter()
        .flat_map(|rule| rule.stat_years().map(move |stat| (rule.schema.year(), stat)))
}

/// Decide whether a schema year and statistics year may be combined.
pub fn validate(schema_year: i32, stat_year: i32) -> Result<YearPair, CompatibilityError> {
    let rejected = CompatibilityError {
        schema_year,
        stat_year,
    };
    let schema = SchemaYear::from_year(schema_year).ok_or(rejected)?;
    if !rule_for(schema).allows(stat_year) {
        return Err(rejected);
    }
    Ok(YearPair {
        schema,
        stat: StatYear::new(stat_year),
    })
}

/// Rejected year combination.
///
/// The message lists the whole rule table so the caller can pick a valid
/// pair without consulting documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityError {
    pub schema_year: i32,
    pub stat_year: i32,
}

impl fmt::Display for CompatibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "incompatible years: schema year {} cannot be combined with stat year {}",
            self.schema_year, self.stat_year
        )?;
        write!(f, "valid combinations (schema year: stat years):")?;
        for rule in &COMPATIBILITY_RULES {
            write!(
                f,
                "\n  {}: {}-{}",
                rule.schema, rule.first_stat_year, rule.last_stat_year
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for CompatibilityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_is_contiguous_per_schema() {
        for rule in &COMPATIBILITY_RULES {
            assert!(rule.first_stat_year <= rule.last_stat_year);
        }
        assert_eq!(allowed_pairs().count(), 4 + 3 + 3 + 7);
    }

    #[test]
    fn test_validate_returns_typed_pair() {
        let pair = validate(2016, 2018).unwrap();
        assert_eq!(pair.schema(), SchemaYear::Nuts2016);
        assert_eq!(pair.stat(), StatYear::new(2018));
    }

    #[test]
    fn test_boundaries_rejected() {
        assert!(validate(2016, 2017).is_err());
        assert!(validate(2016, 2021).is_err());
        assert!(validate(2013, 2013).is_err());
        assert!(validate(2024, 2031).is_err());
    }

    #[test]
    fn test_unknown_schema_year_rejected() {
        let err = validate(2015, 2018).unwrap_err();
        assert_eq!(err.schema_year, 2015);
        assert_eq!(err.stat_year, 2018);
    }
}
