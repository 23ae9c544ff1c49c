//! Data model for the NUTS population pipeline.
//!
//! - [`CountryCode`], [`SchemaYear`], [`StatYear`]: validated inputs
//! - [`compat`]: which boundary vintage may be combined with which
//!   statistics year
//! - [`options`]: explicit configuration for fetching and exporting
//! - [`columns`]: column names shared across stages

pub mod columns;
pub mod compat;
pub mod country;
pub mod dates;
pub mod error;
pub mod options;
pub mod years;

pub use columns::PopulationColumn;
pub use compat::{COMPATIBILITY_RULES, CompatibilityError, CompatibilityRule, allowed_pairs, validate};
pub use country::CountryCode;
pub use error::{ModelError, Result};
pub use options::{
    Crs, DEFAULT_LAYER_NAME, ExportOptions, GeometryOptions, NutsLevel, OutputFormat, Resolution,
};
pub use years::{SchemaYear, StatYear, YearPair, parse_year};
