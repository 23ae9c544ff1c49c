//! Result of the reconciliation stage.

use polars::prelude::DataFrame;
use serde::Serialize;

use nuts_model::PopulationColumn;

/// Outcome of joining regions with observations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    /// Regions on the left side of the join.
    pub regions: usize,
    /// Regions with an observation.
    pub matched: usize,
    /// Matched regions whose value is a missing marker.
    pub missing_values: usize,
    /// Regions without an observation, in region order.
    pub unmatched: Vec<String>,
    /// Identifiers observed more than once, sorted.
    pub duplicates: Vec<String>,
}

/// Merged regions ready for export: every selected region with its
/// attributes, its geometry and the population column.
#[derive(Debug, Clone)]
pub struct OutputDataset {
    pub population_column: PopulationColumn,
    pub data: DataFrame,
    pub report: JoinReport,
}
