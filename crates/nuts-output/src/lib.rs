//! Output of merged NUTS population layers.
//!
//! [`export`] writes an [`nuts_transform::OutputDataset`] as a GeoPackage
//! through a temp file and a rename. The writer itself lives in [`gpkg`].

pub mod error;
pub mod export;
pub mod geometry;
pub mod gpkg;
pub mod srs;
pub mod values;

pub use error::{OutputError, Result};
pub use export::{ExportReport, export};
pub use gpkg::{APPLICATION_ID, USER_VERSION, write_geopackage};
