//! Observation filtering: one reference date, the total stratum, level-3
//! codes of one country.

use polars::prelude::{BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};

use nuts_model::columns::{AGE, AGE_TOTAL, GEO, SEX, SEX_TOTAL, TIME_PERIOD};
use nuts_model::dates::{epoch_days, parse_period, reference_date};
use nuts_model::{CountryCode, NutsLevel, StatYear};

use crate::error::{Result, TransformError};
use crate::polars_utils::{OBSERVATIONS, required_column, string_column};

/// Identifier length of the regions the boundaries are published at.
const REGION_CODE_LENGTH: usize = NutsLevel::LEVEL_3.code_length();

/// Keep the observations for `stat_year` (January 1st), sex `T`, age
/// `TOTAL`, 5-character identifiers starting with `country`.
///
/// Unlike [`crate::select_country`], the country test is a prefix match on
/// the identifier since observations carry no separate country attribute.
pub fn filter_stats(
    observations: &DataFrame,
    stat_year: StatYear,
    country: &CountryCode,
) -> Result<DataFrame> {
    let no_observations = || TransformError::NoObservations {
        country: country.to_string(),
        stat_year: stat_year.year(),
    };

    let geo = string_column(observations, GEO, OBSERVATIONS)?;
    let sex = string_column(observations, SEX, OBSERVATIONS)?;
    let age = string_column(observations, AGE, OBSERVATIONS)?;
    let days = period_days(required_column(observations, TIME_PERIOD, OBSERVATIONS)?)?;
    let target = reference_date(stat_year)
        .and_then(epoch_days)
        .ok_or_else(no_observations)?;

    let keep: Vec<bool> = geo
        .str()?
        .into_iter()
        .zip(sex.str()?)
        .zip(age.str()?)
        .zip(days)
        .map(|(((geo, sex), age), day)| {
            day == Some(target)
                && sex == Some(SEX_TOTAL)
                && age == Some(AGE_TOTAL)
                && geo.is_some_and(|id| {
                    id.len() == REGION_CODE_LENGTH && country.is_prefix_of(id)
                })
        })
        .collect();
    let mask = BooleanChunked::from_slice("filter_stats".into(), &keep);
    let filtered = observations.filter(&mask)?;

    if filtered.height() == 0 {
        return Err(no_observations());
    }

    tracing::debug!(
        country = %country,
        stat_year = stat_year.year(),
        total = observations.height(),
        kept = filtered.height(),
        "filtered population observations"
    );
    Ok(filtered)
}

/// Reference date of each row as days since the epoch.
///
/// Accepts a Date column or period text (`YYYY`, `YYYY-MM-DD`); text that is
/// not a period never matches.
fn period_days(column: &Column) -> Result<Vec<Option<i32>>> {
    if column.dtype() == &DataType::Date {
        let days = column.cast(&DataType::Int32)?;
        return Ok(days.i32()?.into_iter().collect());
    }
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.and_then(parse_period).and_then(epoch_days))
        .collect())
}
