//! Left join of regions with their population observation.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use polars::prelude::{DataFrame, NamedFrom, Series};

use nuts_model::PopulationColumn;
use nuts_model::columns::{GEO, NUTS_ID, OBS_VALUE};

use crate::dataset::{JoinReport, OutputDataset};
use crate::error::{Result, TransformError};
use crate::numeric::coerce_value;
use crate::polars_utils::{OBSERVATIONS, REGIONS, string_column};

/// Number of unmatched identifiers echoed in the warning.
const UNMATCHED_SAMPLE: usize = 5;

/// Attach `population` to every region.
///
/// Regions keep their order and attributes; the observation's `OBS_VALUE` is
/// coerced to a number and stored under `population`'s name. Regions without
/// an observation get a null. When an identifier is observed more than once
/// the first row wins and a warning is logged.
pub fn merge(
    regions: &DataFrame,
    observations: &DataFrame,
    population: &PopulationColumn,
) -> Result<OutputDataset> {
    let values = observations
        .column(OBS_VALUE)
        .map_err(|_| TransformError::MissingColumn {
            column: OBS_VALUE.to_string(),
            frame: OBSERVATIONS,
        })?;
    let region_ids = string_column(regions, NUTS_ID, REGIONS)?;
    let observation_ids = string_column(observations, GEO, OBSERVATIONS)?;

    let mut first_rows: HashMap<&str, usize> = HashMap::new();
    let mut duplicates: BTreeSet<String> = BTreeSet::new();
    for (row, id) in observation_ids.str()?.into_iter().enumerate() {
        let Some(id) = id else { continue };
        match first_rows.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(row);
            }
            Entry::Occupied(_) => {
                if duplicates.insert(id.to_string()) {
                    tracing::warn!(region = id, "duplicate observations, keeping the first");
                }
            }
        }
    }

    let mut report = JoinReport {
        regions: regions.height(),
        ..JoinReport::default()
    };
    let mut population_values: Vec<Option<f64>> = Vec::with_capacity(regions.height());
    for id in region_ids.str()? {
        let Some((id, row)) = id.and_then(|id| first_rows.get(id).map(|row| (id, *row))) else {
            report.unmatched.push(id.unwrap_or_default().to_string());
            population_values.push(None);
            continue;
        };
        let value = coerce_value(values.get(row)?).map_err(|value| TransformError::NonNumeric {
            value,
            region: id.to_string(),
            column: population.name().to_string(),
        })?;
        report.matched += 1;
        if value.is_none() {
            report.missing_values += 1;
        }
        population_values.push(value);
    }
    report.duplicates = duplicates.into_iter().collect();

    let mut data = regions.clone();
    data.with_column(Series::new(population.name().into(), population_values))?;

    if !report.unmatched.is_empty() {
        let sample: Vec<&str> = report
            .unmatched
            .iter()
            .take(UNMATCHED_SAMPLE)
            .map(String::as_str)
            .collect();
        tracing::warn!(
            count = report.unmatched.len(),
            sample = %sample.join(", "),
            "regions without a population observation"
        );
    }
    tracing::info!(
        column = %population,
        regions = report.regions,
        matched = report.matched,
        unmatched = report.unmatched.len(),
        duplicates = report.duplicates.len(),
        "merged population into regions"
    );

    Ok(OutputDataset {
        population_column: population.clone(),
        data,
        report,
    })
}
