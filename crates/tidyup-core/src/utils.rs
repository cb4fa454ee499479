//! Shared helpers for column classification and value extraction.

use polars::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Column Kinds
// =============================================================================

/// Semantic kind of a column, derived once from its physical dtype.
///
/// Stages select the columns they operate on by kind, so a column only
/// changes behavior when a stage actually changes its dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Free text or categorical labels
    Text,
    /// Date, datetime or time values
    Datetime,
    /// Boolean flags (including one-hot indicators)
    Boolean,
    /// Anything else (lists, structs, binary)
    Other,
}

impl ColumnKind {
    /// Classify a polars dtype.
    pub fn of(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else if is_datetime_dtype(dtype) {
            Self::Datetime
        } else if matches!(dtype, DataType::Boolean) {
            Self::Boolean
        } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
            Self::Text
        } else {
            Self::Other
        }
    }

    /// Short lowercase label used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Other => "other",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Names of the columns of `kind`, in frame order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == kind)
        .map(|col| col.name().to_string())
        .collect()
}

/// Dtype name recorded in reports and summaries (e.g. `str`, `f64`,
/// `datetime[ms]`).
pub fn dtype_name(dtype: &DataType) -> String {
    dtype.to_string()
}

/// `column -> dtype name` object for the whole frame, in column order.
pub fn dtype_map(df: &DataFrame) -> serde_json::Map<String, serde_json::Value> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), dtype_name(col.dtype()).into()))
        .collect()
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Values of a series as `f64`, with nulls and NaNs mapped to `None`.
pub fn float_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Values of a series as owned strings, nulls preserved.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

// =============================================================================
// Series Statistics
// =============================================================================

/// Most frequent non-null value of a text series.
///
/// Ties resolve to the lexicographically smallest value so the choice is
/// stable across runs.
pub fn string_mode(series: &Series) -> PolarsResult<Option<String>> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for val in string_values(series)?.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }

    let mut best: Option<(String, usize)> = None;
    for (val, count) in counts {
        // BTreeMap iterates in ascending order, so strict > keeps the smallest tie
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((val, count));
        }
    }

    Ok(best.map(|(val, _)| val))
}

/// Numeric series as Float64 with NaNs turned into nulls, so polars
/// aggregations skip them along with missing values.
pub fn nan_as_null(series: &Series) -> PolarsResult<Series> {
    Ok(Series::new(series.name().clone(), float_values(series)?))
}

/// Quantile of the non-null values, interpolating linearly between the two
/// closest ranks. `None` when every value is null.
pub fn linear_quantile(series: &Series, q: f64) -> PolarsResult<Option<f64>> {
    let scalar = series.quantile_reduce(q, QuantileMethod::Linear)?;
    Ok(scalar.value().extract::<f64>())
}

// =============================================================================
// Series Transformation
// =============================================================================

/// Fill null and NaN values in a numeric series, producing a Float64 series.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<f64> = float_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a text series, producing a String series.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let values: Vec<String> = string_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// JSON Conversion
// =============================================================================

/// Convert a cell to JSON for summaries; temporal values become strings.
pub fn any_value_to_json(value: &AnyValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => serde_json::Number::from_f64(f64::from(*v))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Float64(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}
