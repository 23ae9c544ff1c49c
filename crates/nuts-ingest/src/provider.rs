//! Provider seams used by the pipeline.
//!
//! The pipeline only depends on these traits, so tests substitute in-memory
//! implementations for the remote services.

use polars::prelude::DataFrame;

use nuts_model::GeometryOptions;

use crate::error::Result;

/// Source of boundary polygons.
///
/// The returned frame has one row per region with at least the `NUTS_ID`,
/// `CNTR_CODE` and `geometry` (GeoJSON text) columns, plus every other
/// attribute the provider publishes.
pub trait GeometryProvider {
    fn fetch_regions(&self, options: &GeometryOptions) -> Result<DataFrame>;
}

/// Source of population observations.
///
/// The returned frame covers all countries, years and strata with the
/// `geo`, `TIME_PERIOD` (Date), `sex`, `age` and, when the upstream schema
/// provides it, `OBS_VALUE` (raw text) columns.
pub trait StatisticsProvider {
    fn fetch_observations(&self, dataset_id: &str) -> Result<DataFrame>;
}
