//! Datetime coercion for text columns.
//!
//! A text column is promoted to `Datetime(ms)` only as a whole: every
//! non-null cell must parse with one of the accepted layouts, and more than
//! [`DATETIME_PROMOTION_RATIO`] of the rows must hold a parsed value.
//! Anything else leaves the column exactly as it was.

use crate::utils::{ColumnKind, columns_of_kind};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

/// Fraction of parsed (non-null) rows a column must exceed to be promoted.
pub const DATETIME_PROMOTION_RATIO: f64 = 0.8;

/// Text tokens that parse to a null timestamp instead of failing the column.
const NULL_TOKENS: [&str; 3] = ["", "nat", "nan"];

const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_LAYOUTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse one cell into a naive timestamp.
///
/// Offsets in RFC 3339 input are normalized to UTC.
pub fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();

    for layout in DATETIME_LAYOUTS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(parsed);
        }
    }

    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc())
}

fn is_null_token(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    NULL_TOKENS.contains(&lower.as_str())
}

/// Try to parse a whole text series as timestamps.
///
/// Returns `None` when any non-null cell fails to parse, or when the parsed
/// fraction does not exceed [`DATETIME_PROMOTION_RATIO`].
pub fn try_parse_datetime_series(series: &Series) -> PolarsResult<Option<Series>> {
    let len = series.len();
    if len == 0 {
        return Ok(None);
    }

    let text = series.cast(&DataType::String)?;
    let mut millis: Vec<Option<i64>> = Vec::with_capacity(len);

    for opt_val in text.str()?.into_iter() {
        match opt_val {
            None => millis.push(None),
            Some(val) if is_null_token(val) => millis.push(None),
            Some(val) => match parse_datetime_text(val) {
                Some(parsed) => millis.push(Some(parsed.and_utc().timestamp_millis())),
                None => return Ok(None),
            },
        }
    }

    let parsed = millis.iter().filter(|v| v.is_some()).count();
    let ratio = parsed as f64 / len as f64;
    if ratio <= DATETIME_PROMOTION_RATIO {
        debug!(
            "Column '{}': only {:.1}% parsed as datetime, keeping text",
            series.name(),
            ratio * 100.0
        );
        return Ok(None);
    }

    let promoted = Series::new(series.name().clone(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(Some(promoted))
}

/// Promote every date-like text column of `df` to a datetime column, in
/// place. Returns the names of the promoted columns.
///
/// Columns that are not text, or that fail to parse, are left untouched.
pub fn coerce_datetime(df: &mut DataFrame) -> PolarsResult<Vec<String>> {
    let mut promoted = Vec::new();
    for name in columns_of_kind(df, ColumnKind::Text) {
        let series = df.column(&name)?.as_materialized_series();
        match try_parse_datetime_series(series) {
            Ok(Some(parsed)) => {
                debug!("Promoted '{}' to datetime", name);
                df.replace(&name, parsed)?;
                promoted.push(name);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Datetime parsing of '{}' failed: {}", name, e);
            }
        }
    }
    Ok(promoted)
}
