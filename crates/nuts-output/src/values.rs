//! Polars values as SQLite columns.

use chrono::{Duration, NaiveDate};
use polars::prelude::{AnyValue, DataType};
use rusqlite::types::Value;

/// GeoPackage column type for a Polars dtype.
pub fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean => "BOOLEAN",
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => "INTEGER",
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Date => "DATE",
        _ => "TEXT",
    }
}

/// Convert one cell to an SQLite value.
pub fn any_to_sql(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Integer(i64::from(b)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(v.to_string())),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::Date(days) => NaiveDate::default()
            .checked_add_signed(Duration::days(i64::from(days)))
            .map_or(Value::Null, |date| {
                Value::Text(date.format("%Y-%m-%d").to_string())
            }),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(other.to_string()),
    }
}
