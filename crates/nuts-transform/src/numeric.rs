//! Numeric coercion of population values.
//!
//! Eurostat marks unavailable figures with `:`. That marker, empty text and
//! nulls are missing values; anything else must parse as a finite number.

use polars::prelude::AnyValue;

/// Eurostat's "not available" marker.
pub const MISSING_MARKER: &str = ":";

/// True for empty text and the provider's missing marker.
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == MISSING_MARKER
}

/// Parse text as a finite number.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Coerce a raw observation value.
///
/// Returns `Ok(None)` for missing values and `Err` with the offending text
/// for values that are neither missing nor numeric.
pub fn coerce_value(value: AnyValue<'_>) -> Result<Option<f64>, String> {
    let number = match value {
        AnyValue::Null => return Ok(None),
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        AnyValue::String(s) => return coerce_text(s),
        AnyValue::StringOwned(s) => return coerce_text(s.as_str()),
        other => return Err(other.to_string()),
    };
    if number.is_finite() {
        Ok(Some(number))
    } else {
        Err(number.to_string())
    }
}

fn coerce_text(value: &str) -> Result<Option<f64>, String> {
    if is_missing_marker(value) {
        return Ok(None);
    }
    parse_numeric(value)
        .map(Some)
        .ok_or_else(|| value.to_string())
}
