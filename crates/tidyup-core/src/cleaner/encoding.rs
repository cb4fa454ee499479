//! One-hot encoding of low-cardinality text columns.

use crate::utils::{ColumnKind, columns_of_kind, string_values};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Outcome of encoding a frame.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Frame with encoded columns removed and indicators appended.
    pub data: DataFrame,
    /// Source columns that were replaced, in frame order.
    pub encoded_cols: Vec<String>,
    /// Indicator columns that were appended, in order.
    pub new_cols: Vec<String>,
}

/// Sorted distinct non-null values of a series.
pub fn distinct_levels(series: &Series) -> PolarsResult<BTreeSet<String>> {
    Ok(string_values(series)?.into_iter().flatten().collect())
}

/// Return `base`, or `base_<n>` with the smallest `n >= 1` not in `taken`.
fn unique_column_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Boolean indicator of `level` over `values`; nulls map to `false`.
fn indicator_series(name: &str, values: &[Option<String>], level: &str) -> Series {
    let flags: Vec<bool> = values
        .iter()
        .map(|v| v.as_deref() == Some(level))
        .collect();
    Series::new(name.into(), flags)
}

/// Replace every text column with at most `max_unique` distinct values by
/// boolean indicator columns named `<col>_<value>`.
///
/// Levels are sorted; the first is dropped when `drop_first` is set. Indicator
/// columns follow the remaining columns, grouped by source column.
pub fn one_hot_encode_frame(
    df: &DataFrame,
    drop_first: bool,
    max_unique: usize,
) -> PolarsResult<EncodedFrame> {
    let mut encoded_cols = Vec::new();
    let mut planned: Vec<(String, Vec<String>)> = Vec::new();

    for name in columns_of_kind(df, ColumnKind::Text) {
        let series = df.column(&name)?.as_materialized_series();
        let levels = distinct_levels(series)?;
        if levels.len() > max_unique {
            debug!(
                "Skipping '{}': {} distinct values exceeds {}",
                name,
                levels.len(),
                max_unique
            );
            continue;
        }
        let skip = usize::from(drop_first);
        planned.push((name.clone(), levels.into_iter().skip(skip).collect()));
        encoded_cols.push(name);
    }

    let mut data = df.drop_many(encoded_cols.iter().map(|s| s.as_str()));
    let mut taken: HashSet<String> = data
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut new_cols = Vec::new();

    for (source, levels) in planned {
        let values = string_values(df.column(&source)?.as_materialized_series())?;
        for level in levels {
            let name = unique_column_name(&format!("{source}_{level}"), &taken);
            data.with_column(indicator_series(&name, &values, &level))?;
            taken.insert(name.clone());
            new_cols.push(name);
        }
    }

    Ok(EncodedFrame {
        data,
        encoded_cols,
        new_cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_drop_first_yields_n_minus_one_columns() {
        let df = df![
            "id" => [1, 2, 3, 4],
            "plan" => ["free", "pro", "basic", "pro"],
        ]
        .unwrap();

        let encoded = one_hot_encode_frame(&df, true, 50).unwrap();
        assert_eq!(encoded.encoded_cols, vec!["plan"]);
        assert_eq!(encoded.new_cols, vec!["plan_free", "plan_pro"]);
        assert_eq!(names(&encoded.data), vec!["id", "plan_free", "plan_pro"]);
    }

    #[test]
    fn test_indicator_values() {
        let df = df![
            "city" => [Some("pune"), Some("delhi"), None],
        ]
        .unwrap();

        let encoded = one_hot_encode_frame(&df, false, 50).unwrap();
        let delhi: Vec<Option<bool>> = encoded
            .data
            .column("city_delhi")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(delhi, vec![Some(false), Some(true), Some(false)]);
        assert_eq!(
            encoded.data.column("city_pune").unwrap().dtype(),
            &DataType::Boolean
        );
    }

    #[test]
    fn test_high_cardinality_column_is_kept() {
        let df = df![
            "note" => ["a", "b", "c"],
            "plan" => ["x", "y", "x"],
        ]
        .unwrap();

        let encoded = one_hot_encode_frame(&df, true, 2).unwrap();
        assert_eq!(encoded.encoded_cols, vec!["plan"]);
        assert_eq!(names(&encoded.data), vec!["note", "plan_y"]);
    }

    #[test]
    fn test_name_collision_gets_suffix() {
        let df = df![
            "a_b" => [1, 2],
            "a" => ["b", "c"],
        ]
        .unwrap();

        let encoded = one_hot_encode_frame(&df, false, 50).unwrap();
        assert_eq!(encoded.new_cols, vec!["a_b_1", "a_c"]);
        assert_eq!(names(&encoded.data), vec!["a_b", "a_b_1", "a_c"]);
    }

    #[test]
    fn test_no_text_columns() {
        let df = df!["x" => [1.0, 2.0]].unwrap();
        let encoded = one_hot_encode_frame(&df, true, 50).unwrap();
        assert!(encoded.encoded_cols.is_empty());
        assert!(encoded.new_cols.is_empty());
        assert_eq!(names(&encoded.data), vec!["x"]);
    }

    #[test]
    fn test_distinct_levels_sorted() {
        let series = Series::new("s".into(), &[Some("b"), None, Some("a"), Some("b")]);
        let levels: Vec<String> = distinct_levels(&series).unwrap().into_iter().collect();
        assert_eq!(levels, vec!["a", "b"]);
    }
}
