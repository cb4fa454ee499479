//! Statistical imputation methods.
//!
//! Numeric columns are filled with the median, the mean or zero; text columns
//! with their most frequent value or a constant marker.

use crate::config::{CategoricalImputation, NumericImputation};
use crate::utils::{fill_numeric_nulls, fill_string_nulls, nan_as_null, string_mode};
use polars::prelude::*;
use tracing::debug;

/// Marker used by [`CategoricalImputation::Missing`].
pub const MISSING_MARKER: &str = "missing";

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill value for a numeric column, or `None` when there is nothing to
    /// fill with (an all-missing column under median or mean).
    ///
    /// `values` must already have NaNs mapped to null (see [`nan_as_null`]).
    pub fn numeric_fill_value(values: &Series, strategy: NumericImputation) -> Option<f64> {
        match strategy {
            NumericImputation::Median => values.median(),
            NumericImputation::Mean => values.mean(),
            NumericImputation::Zero => Some(0.0),
        }
    }

    /// Impute a numeric column in place.
    ///
    /// Returns the number of cells filled. Columns without missing values are
    /// left as they are, dtype included.
    pub fn impute_numeric(
        df: &mut DataFrame,
        col_name: &str,
        strategy: NumericImputation,
    ) -> PolarsResult<usize> {
        let values = nan_as_null(df.column(col_name)?.as_materialized_series())?;
        let missing = values.null_count();
        if missing == 0 {
            return Ok(0);
        }

        let Some(fill_value) = Self::numeric_fill_value(&values, strategy) else {
            debug!("'{}' has no values to derive a {} from", col_name, strategy.name());
            return Ok(0);
        };

        let filled = fill_numeric_nulls(&values, fill_value)?;
        df.replace(col_name, filled)?;
        debug!(
            "Filled {} cells in '{}' with {} ({})",
            missing,
            col_name,
            strategy.name(),
            fill_value
        );
        Ok(missing)
    }

    /// Impute a text column in place. Returns the number of cells filled.
    pub fn impute_text(
        df: &mut DataFrame,
        col_name: &str,
        strategy: CategoricalImputation,
    ) -> PolarsResult<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let missing = series.null_count();
        if missing == 0 {
            return Ok(0);
        }

        let fill_value = match strategy {
            CategoricalImputation::MostFrequent => string_mode(&series)?.unwrap_or_default(),
            CategoricalImputation::Missing => MISSING_MARKER.to_string(),
        };

        let filled = fill_string_nulls(&series, &fill_value)?;
        df.replace(col_name, filled)?;
        debug!(
            "Filled {} cells in '{}' with '{}'",
            missing, col_name, fill_value
        );
        Ok(missing)
    }
}
