//! The cleaning engine.
//!
//! [`DataCleaner`] owns a private copy of the caller's table and exposes one
//! operation per cleaning stage:
//! - Removing duplicate rows
//! - Normalizing text columns
//! - Promoting date-like text columns to datetimes
//! - Imputing missing values
//! - Removing IQR outliers
//! - One-hot encoding low-cardinality text columns
//! - Z-score scaling of numeric columns
//!
//! Each call appends exactly one step to the engine's [`CleaningReport`].
//! Stages can be chained in any order; [`crate::pipeline::Pipeline`] applies
//! them in the canonical order.

mod converters;
mod encoding;
mod outliers;
mod sanitizers;
mod scaling;

pub use converters::{
    DATETIME_PROMOTION_RATIO, coerce_datetime, parse_datetime_text, try_parse_datetime_series,
};
pub use encoding::{EncodedFrame, distinct_levels, one_hot_encode_frame};
pub use outliers::{iqr_bounds, outlier_mask};
pub use sanitizers::{standardize_text_series, text_standardize};
pub use scaling::{ScaleParams, standardize_series};

use crate::config::{CategoricalImputation, NumericImputation, TextNullPolicy};
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::reporting::{CleaningReport, StageAction};
use crate::utils::{ColumnKind, columns_of_kind, dtype_map};
use polars::prelude::*;
use serde_json::json;
use tracing::{debug, info, warn};

/// Stateful cleaning session over one table.
///
/// The engine never touches the caller's frame; all stages operate on its
/// own copy. Row ids (positions in the original table) follow every row
/// filter, so `row_ids()[i]` names the source row of output row `i`.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    df: DataFrame,
    row_ids: Vec<usize>,
    original_rows: usize,
    report: CleaningReport,
    text_null_policy: TextNullPolicy,
}

static_assertions::assert_impl_all!(DataCleaner: Send);

impl DataCleaner {
    /// Start a session over a copy of `df`.
    pub fn new(df: &DataFrame) -> Self {
        let rows = df.height();
        Self {
            df: df.clone(),
            row_ids: (0..rows).collect(),
            original_rows: rows,
            report: CleaningReport::new(),
            text_null_policy: TextNullPolicy::default(),
        }
    }

    /// Set how [`DataCleaner::standardize_text`] treats null cells.
    pub fn with_text_null_policy(mut self, policy: TextNullPolicy) -> Self {
        self.set_text_null_policy(policy);
        self
    }

    pub fn set_text_null_policy(&mut self, policy: TextNullPolicy) {
        self.text_null_policy = policy;
    }

    /// Current working table.
    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Original row position of each current row.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn original_row_count(&self) -> usize {
        self.original_rows
    }

    /// Consume the session, returning the cleaned table and its report.
    pub fn into_parts(self) -> (DataFrame, CleaningReport) {
        (self.df, self.report)
    }

    /// Keep the rows where `keep` is true, filtering row ids in lockstep.
    /// Returns the number of rows removed.
    fn retain_rows(&mut self, keep: &[bool]) -> Result<usize> {
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return Ok(0);
        }

        let mask = BooleanChunked::from_slice("keep".into(), keep);
        self.df = self.df.filter(&mask)?;
        self.row_ids = self
            .row_ids
            .iter()
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(id, _)| *id)
            .collect();
        Ok(removed)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Remove exact duplicate rows, keeping the first occurrence.
    ///
    /// Rows compare across all columns; two nulls in the same column are equal.
    pub fn drop_duplicates(&mut self) -> Result<&mut Self> {
        let keep = first_occurrence_mask(&self.df)?;
        let removed = self.retain_rows(&keep)?;
        self.report.add_rows_removed(removed);
        self.report.append(
            StageAction::DropDuplicates.as_str(),
            json!({ "removed": removed }),
        );

        info!("Removed {} duplicate rows", removed);
        Ok(self)
    }

    /// Normalize every text column (see [`text_standardize`]).
    pub fn standardize_text(&mut self) -> Result<&mut Self> {
        let columns = columns_of_kind(&self.df, ColumnKind::Text);
        for name in &columns {
            let series = self.df.column(name)?.as_materialized_series();
            let cleaned = standardize_text_series(series, self.text_null_policy)?;
            self.df.replace(name, cleaned)?;
            debug!("Standardized text in '{}'", name);
        }

        self.report.append(
            StageAction::StandardizeText.as_str(),
            json!({ "columns": columns, "null_policy": self.text_null_policy }),
        );
        info!("Standardized {} text columns", columns.len());
        Ok(self)
    }

    /// Promote date-like text columns to datetimes (see [`coerce_datetime`]).
    pub fn coerce_types(&mut self) -> Result<&mut Self> {
        let before = dtype_map(&self.df);
        let promoted = coerce_datetime(&mut self.df)?;
        let after = dtype_map(&self.df);

        self.report.append(
            StageAction::CoerceTypes.as_str(),
            json!({ "before": before, "after": after }),
        );
        info!("Coerced {} columns to datetime", promoted.len());
        Ok(self)
    }

    /// Fill missing values in numeric and text columns.
    ///
    /// All-missing numeric columns stay missing under median and mean.
    pub fn impute_missing(
        &mut self,
        num_strategy: NumericImputation,
        cat_strategy: CategoricalImputation,
    ) -> Result<&mut Self> {
        let mut filled = 0;
        for name in columns_of_kind(&self.df, ColumnKind::Numeric) {
            filled += StatisticalImputer::impute_numeric(&mut self.df, &name, num_strategy)?;
        }
        for name in columns_of_kind(&self.df, ColumnKind::Text) {
            filled += StatisticalImputer::impute_text(&mut self.df, &name, cat_strategy)?;
        }

        self.report.append(
            StageAction::ImputeMissing.as_str(),
            json!({
                "num_strategy": num_strategy.name(),
                "cat_strategy": cat_strategy.name(),
            }),
        );
        info!(
            "Imputed {} cells (numeric: {}, text: {})",
            filled,
            num_strategy.name(),
            cat_strategy.name()
        );
        Ok(self)
    }

    /// Drop every row that is an IQR outlier in any of `cols`.
    ///
    /// `None` selects all numeric columns. Named columns that are absent or
    /// not numeric are skipped.
    pub fn remove_outliers_iqr(&mut self, cols: Option<&[String]>, k: f64) -> Result<&mut Self> {
        let selected: Vec<String> = match cols {
            Some(cols) => cols.to_vec(),
            None => columns_of_kind(&self.df, ColumnKind::Numeric),
        };

        let mut flagged = vec![false; self.df.height()];
        for name in &selected {
            let Ok(column) = self.df.column(name) else {
                warn!("Outlier column '{}' not found, skipping", name);
                continue;
            };
            if ColumnKind::of(column.dtype()) != ColumnKind::Numeric {
                warn!(
                    "Outlier column '{}' is {}, not numeric, skipping",
                    name,
                    ColumnKind::of(column.dtype()).as_str()
                );
                continue;
            }

            let mask = outlier_mask(column.as_materialized_series(), k)?;
            debug!(
                "'{}': {} outliers",
                name,
                mask.iter().filter(|m| **m).count()
            );
            for (acc, is_outlier) in flagged.iter_mut().zip(mask) {
                *acc |= is_outlier;
            }
        }

        let keep: Vec<bool> = flagged.iter().map(|f| !f).collect();
        let removed = self.retain_rows(&keep)?;
        self.report.add_rows_removed(removed);
        self.report.append(
            StageAction::RemoveOutliersIqr.as_str(),
            json!({ "cols": selected, "k": k, "removed": removed }),
        );

        info!("Removed {} outlier rows (k = {})", removed, k);
        Ok(self)
    }

    /// Replace low-cardinality text columns with boolean indicator columns.
    pub fn one_hot_encode(&mut self, drop_first: bool, max_unique: usize) -> Result<&mut Self> {
        let EncodedFrame {
            data,
            encoded_cols,
            new_cols,
        } = one_hot_encode_frame(&self.df, drop_first, max_unique)?;
        self.df = data;

        self.report.extend_encoded(encoded_cols.iter().cloned());
        self.report.append(
            StageAction::OneHotEncode.as_str(),
            json!({
                "encoded_cols": encoded_cols,
                "new_cols": new_cols,
                "drop_first": drop_first,
                "max_unique": max_unique,
            }),
        );

        info!(
            "Encoded {} columns into {} indicators",
            encoded_cols.len(),
            new_cols.len()
        );
        Ok(self)
    }

    /// Z-score every numeric column.
    pub fn scale_numeric(&mut self) -> Result<&mut Self> {
        let columns = columns_of_kind(&self.df, ColumnKind::Numeric);
        for name in &columns {
            let scaled = standardize_series(self.df.column(name)?.as_materialized_series())?;
            self.df.replace(name, scaled)?;
        }

        self.report.extend_scaled(columns.iter().cloned());
        self.report.append(
            StageAction::ScaleNumeric.as_str(),
            json!({ "scaled_cols": columns }),
        );
        info!("Scaled {} numeric columns", columns.len());
        Ok(self)
    }
}

/// Temporary column carrying original positions through deduplication.
const ROW_INDEX: &str = "__tidyup_row";

/// `true` for the first occurrence of each distinct row, compared by value
/// across all columns.
fn first_occurrence_mask(df: &DataFrame) -> Result<Vec<bool>> {
    let height = df.height();
    if height == 0 || df.width() == 0 {
        return Ok(vec![true; height]);
    }

    let subset: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let unique = df
        .with_row_index(ROW_INDEX.into(), None)?
        .unique_stable(Some(subset.as_slice()), UniqueKeepStrategy::First, None)?;

    let mut keep = vec![false; height];
    for idx in unique
        .column(ROW_INDEX)?
        .as_materialized_series()
        .idx()?
        .into_no_null_iter()
    {
        keep[idx as usize] = true;
    }
    Ok(keep)
}
