//! Reference dates of observations.
//!
//! Eurostat publishes annual population "on 1 January"; the observation
//! table stores each period as the date at the start of its year. Polars
//! `Date` values are days since the Unix epoch.

use chrono::NaiveDate;

use crate::years::StatYear;

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Days between the Unix epoch and `date`, as stored in a Polars `Date`.
pub fn epoch_days(date: NaiveDate) -> Option<i32> {
    i32::try_from(date.signed_duration_since(unix_epoch()).num_days()).ok()
}

/// January 1st of a statistics year.
pub fn reference_date(year: StatYear) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.year(), 1, 1)
}

/// Parse an upstream period: `YYYY` means January 1st of that year, a full
/// `YYYY-MM-DD` date is taken as is.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 4 {
        let year = raw.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
