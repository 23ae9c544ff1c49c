use std::path::PathBuf;

use nuts_model::{Crs, PopulationColumn, Resolution, SchemaYear, StatYear};
use nuts_output::ExportReport;
use nuts_transform::JoinReport;

/// One invocation as entered on the command line.
///
/// Country and years stay raw text so that malformed values are reported
/// by the pipeline's own validation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub country: String,
    pub schema_year: String,
    pub stat_year: String,
    pub output: PathBuf,
    pub settings: RunSettings,
}

/// Options applied to the fetch and export stages.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub resolution: Resolution,
    pub crs: Crs,
    pub cache_enabled: bool,
    /// Stop before the export stage.
    pub dry_run: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            crs: Crs::default(),
            cache_enabled: true,
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub country: String,
    pub schema_year: SchemaYear,
    pub stat_year: StatYear,
    pub population_column: PopulationColumn,
    pub output: PathBuf,
    pub join: JoinReport,
    /// `None` on a dry run.
    pub export: Option<ExportReport>,
}
