//! Column access helpers shared by the stages.

use polars::prelude::{Column, DataFrame, DataType};

use crate::error::{Result, TransformError};

/// Frame label used in errors about the boundary table.
pub(crate) const REGIONS: &str = "regions";
/// Frame label used in errors about the observation table.
pub(crate) const OBSERVATIONS: &str = "observations";

/// Fetch a column as String, failing with a schema error when absent.
pub(crate) fn string_column(df: &DataFrame, name: &str, frame: &'static str) -> Result<Column> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::MissingColumn {
            column: name.to_string(),
            frame,
        })?;
    Ok(column.cast(&DataType::String)?)
}

/// Fetch a column as is, failing with a schema error when absent.
pub(crate) fn required_column<'a>(
    df: &'a DataFrame,
    name: &str,
    frame: &'static str,
) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::MissingColumn {
        column: name.to_string(),
        frame,
    })
}
