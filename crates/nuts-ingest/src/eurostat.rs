//! Population observations from the Eurostat dissemination API.
//!
//! The dataset is requested whole in SDMX-CSV form; one row per
//! (frequency, unit, sex, age, region, period) with the count in
//! `OBS_VALUE`. Values are kept as text so the reconciliation stage decides
//! what counts as numeric.

use std::io::Cursor;
use std::time::Duration;

use polars::prelude::{CsvReadOptions, DataFrame, DataType, NamedFrom, SerReader, Series};

use nuts_model::columns::{AGE, GEO, OBS_VALUE, SEX, TIME_PERIOD};
use nuts_model::dates::{epoch_days, parse_period};

use crate::error::{IngestError, Result};
use crate::http::{CachePolicy, Downloader};
use crate::provider::StatisticsProvider;

/// Eurostat SDMX 2.1 dissemination API base URL.
pub const EUROSTAT_BASE_URL: &str = "https://ec.europa.eu/eurostat/api/dissemination/sdmx/2.1";

/// Age after which a cached statistics table is downloaded again. Eurostat
/// revises the table and adds a reference year with each release.
pub const STATISTICS_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);

/// Statistics provider backed by Eurostat SDMX-CSV downloads.
#[derive(Debug, Clone)]
pub struct EurostatProvider {
    downloader: Downloader,
    base_url: String,
    cache_policy: CachePolicy,
}

impl EurostatProvider {
    pub fn new(downloader: Downloader) -> Self {
        Self {
            downloader,
            base_url: EUROSTAT_BASE_URL.to_string(),
            cache_policy: CachePolicy::Reuse {
                max_age: Some(STATISTICS_MAX_AGE),
            },
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn url(&self, dataset_id: &str) -> String {
        format!(
            "{}/data/{}?format=SDMX-CSV",
            self.base_url.trim_end_matches('/'),
            dataset_id
        )
    }
}

impl StatisticsProvider for EurostatProvider {
    fn fetch_observations(&self, dataset_id: &str) -> Result<DataFrame> {
        let url = self.url(dataset_id);
        let bytes = self.downloader.fetch(&url, self.cache_policy)?;
        let observations = observations_from_csv(bytes, dataset_id)?;
        tracing::info!(
            dataset = dataset_id,
            observations = observations.height(),
            "loaded population observations"
        );
        Ok(observations)
    }
}

/// Parse an SDMX-CSV body into an observation frame.
///
/// `geo`, `sex`, `age` and `OBS_VALUE` are returned as String columns and
/// `TIME_PERIOD` as a Date at the start of the period. A missing `OBS_VALUE`
/// column is not an error here; the reconciliation stage reports it.
pub fn observations_from_csv(bytes: Vec<u8>, source_name: &str) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    for required in [GEO, TIME_PERIOD, SEX, AGE] {
        if df.column(required).is_err() {
            return Err(IngestError::MissingColumn {
                column: required.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }

    for name in [GEO, SEX, AGE, OBS_VALUE] {
        if let Ok(column) = df.column(name) {
            let text = column.cast(&DataType::String)?;
            df.with_column(text)?;
        }
    }

    let dates = reference_dates(&df, source_name)?;
    df.with_column(dates)?;
    Ok(df)
}

fn reference_dates(df: &DataFrame, source_name: &str) -> Result<Series> {
    let periods = df.column(TIME_PERIOD)?.cast(&DataType::String)?;
    let mut days: Vec<Option<i32>> = Vec::with_capacity(df.height());
    for period in periods.str()? {
        let Some(raw) = period else {
            days.push(None);
            continue;
        };
        let value = parse_period(raw)
            .and_then(epoch_days)
            .ok_or_else(|| IngestError::InvalidTimePeriod {
                value: raw.to_string(),
                source_name: source_name.to_string(),
            })?;
        days.push(Some(value));
    }
    Ok(Series::new(TIME_PERIOD.into(), days).cast(&DataType::Date)?)
}
