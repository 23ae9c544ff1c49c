//! Boundary and population providers.
//!
//! - [`gisco`]: NUTS boundary polygons as GeoJSON
//! - [`eurostat`]: population observations as SDMX-CSV
//! - [`provider`]: the traits the pipeline depends on
//! - [`http`], [`cache`]: downloads with an optional on-disk cache

pub mod cache;
pub mod error;
pub mod eurostat;
pub mod gisco;
pub mod http;
pub mod provider;

pub use cache::DownloadCache;
pub use error::{IngestError, Result};
pub use eurostat::{
    EUROSTAT_BASE_URL, EurostatProvider, STATISTICS_MAX_AGE, observations_from_csv,
};
pub use gisco::{GISCO_BASE_URL, GiscoProvider, boundary_file_name, regions_from_geojson};
pub use http::{CachePolicy, DEFAULT_TIMEOUT, Downloader, HttpOptions};
pub use provider::{GeometryProvider, StatisticsProvider};
