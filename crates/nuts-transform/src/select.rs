//! Geometry selection: narrow the full boundary layer to one country.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use nuts_model::columns::CNTR_CODE;
use nuts_model::{CountryCode, SchemaYear};

use crate::error::{Result, TransformError};
use crate::polars_utils::{REGIONS, string_column};

/// Keep the regions whose `CNTR_CODE` equals `country` exactly.
///
/// The region identifier is not consulted; the provider's own country
/// attribute is authoritative for boundaries.
pub fn select_country(
    regions: &DataFrame,
    country: &CountryCode,
    schema_year: SchemaYear,
) -> Result<DataFrame> {
    let codes = string_column(regions, CNTR_CODE, REGIONS)?;
    let keep: Vec<bool> = codes
        .str()?
        .into_iter()
        .map(|code| code == Some(country.as_str()))
        .collect();
    let mask = BooleanChunked::from_slice("select_country".into(), &keep);
    let selected = regions.filter(&mask)?;

    if selected.height() == 0 {
        return Err(TransformError::NoRegions {
            country: country.to_string(),
            schema_year: schema_year.year(),
        });
    }

    tracing::debug!(
        country = %country,
        total = regions.height(),
        selected = selected.height(),
        "selected country regions"
    );
    Ok(selected)
}
