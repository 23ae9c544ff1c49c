//! End-to-end run: validate, fetch, select, filter, merge, export.
//!
//! Input and compatibility checks happen before either provider is called.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use nuts_ingest::{GeometryProvider, StatisticsProvider};
use nuts_model::columns::POPULATION_DATASET;
use nuts_model::{
    CountryCode, ExportOptions, GeometryOptions, PopulationColumn, YearPair, compat, parse_year,
};
use nuts_output::export;
use nuts_transform::{filter_stats, merge, select_country};

use crate::types::{RunRequest, RunResult};

/// Validated inputs of a run.
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    pub country: CountryCode,
    pub years: YearPair,
}

/// Check the country code, both years and their combination.
///
/// Performs no I/O.
pub fn validate_inputs(request: &RunRequest) -> Result<ValidatedInputs> {
    let country = CountryCode::parse(&request.country)?;
    let schema_year = parse_year("schema year", &request.schema_year)?;
    let stat_year = parse_year("stat year", &request.stat_year)?;
    let years = compat::validate(schema_year, stat_year)?;
    Ok(ValidatedInputs { country, years })
}

pub fn run_pipeline(
    request: &RunRequest,
    geometry_provider: &dyn GeometryProvider,
    statistics_provider: &dyn StatisticsProvider,
) -> Result<RunResult> {
    let ValidatedInputs { country, years } = validate_inputs(request)?;
    let schema_year = years.schema();
    let stat_year = years.stat();
    let settings = &request.settings;

    let run_span = info_span!(
        "run",
        country = %country,
        schema_year = schema_year.year(),
        stat_year = stat_year.year()
    );
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let geometry_options = GeometryOptions::new(schema_year)
        .with_resolution(settings.resolution)
        .with_crs(settings.crs)
        .with_cache(settings.cache_enabled);
    let regions = info_span!("fetch_regions")
        .in_scope(|| geometry_provider.fetch_regions(&geometry_options))
        .context("failed to fetch boundary regions")?;
    let regions = info_span!("select_country")
        .in_scope(|| select_country(&regions, &country, schema_year))?;
    info!(regions = regions.height(), "selected regions");

    let observations = info_span!("fetch_observations", dataset = POPULATION_DATASET)
        .in_scope(|| statistics_provider.fetch_observations(POPULATION_DATASET))
        .context("failed to fetch population observations")?;
    let observations = info_span!("filter_stats")
        .in_scope(|| filter_stats(&observations, stat_year, &country))?;
    info!(observations = observations.height(), "filtered observations");

    let population_column = PopulationColumn::for_year(stat_year);
    let dataset = info_span!("merge", column = %population_column)
        .in_scope(|| merge(&regions, &observations, &population_column))?;

    let export_report = if settings.dry_run {
        info!("dry run, skipping export");
        None
    } else {
        let export_options = ExportOptions::default().with_crs(settings.crs);
        let report = info_span!("export", path = %request.output.display())
            .in_scope(|| export(&dataset, &request.output, &export_options))
            .with_context(|| format!("failed to write {}", request.output.display()))?;
        Some(report)
    };

    info!(
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(RunResult {
        country: country.to_string(),
        schema_year,
        stat_year,
        population_column,
        output: request.output.clone(),
        join: dataset.report,
        export: export_report,
    })
}
