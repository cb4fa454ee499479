//! IQR-based outlier detection.
//!
//! Quartiles use linear interpolation between closest ranks. Missing values
//! (nulls and NaNs) take no part in the bounds and are never flagged.

use crate::utils::{linear_quantile, nan_as_null};
use polars::prelude::*;

/// Fences `(Q1 - k*IQR, Q3 + k*IQR)` over the present values, or `None`
/// when every value is missing.
pub fn iqr_bounds(series: &Series, k: f64) -> PolarsResult<Option<(f64, f64)>> {
    let values = nan_as_null(series)?;
    let (Some(q1), Some(q3)) = (
        linear_quantile(&values, 0.25)?,
        linear_quantile(&values, 0.75)?,
    ) else {
        return Ok(None);
    };

    let iqr = q3 - q1;
    Ok(Some((q1 - k * iqr, q3 + k * iqr)))
}

/// Flag each row whose value lies strictly outside the IQR fences.
///
/// The mask has one entry per row; missing positions are `false`.
pub fn outlier_mask(series: &Series, k: f64) -> PolarsResult<Vec<bool>> {
    let values = nan_as_null(series)?;
    let Some((lower, upper)) = iqr_bounds(&values, k)? else {
        return Ok(vec![false; values.len()]);
    };

    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.is_some_and(|x| x < lower || x > upper))
        .collect())
}
