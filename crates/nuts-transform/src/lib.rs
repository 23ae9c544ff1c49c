//! Reconciliation of boundaries with population observations.
//!
//! Three stages, applied in order by the pipeline:
//!
//! - [`select_country`]: boundary features of one country (`CNTR_CODE`)
//! - [`filter_stats`]: observations for one reference date, the total
//!   stratum and level-3 codes of one country
//! - [`merge`]: left join on the region identifier, producing an
//!   [`OutputDataset`] with a `POP_<year>` column and a [`JoinReport`]
//!
//! Every region that enters [`merge`] leaves it; missing observations and
//! Eurostat's `:` marker become nulls, any other non-numeric value is an
//! error.

mod dataset;
mod error;
mod filter;
mod merge;
mod polars_utils;
mod select;

pub mod numeric;

pub use dataset::{JoinReport, OutputDataset};
pub use error::{Result, TransformError};
pub use filter::filter_stats;
pub use merge::merge;
pub use select::select_country;
