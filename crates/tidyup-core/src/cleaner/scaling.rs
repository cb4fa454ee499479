//! Z-score standardization of numeric columns.
//!
//! ```text
//! z = (x - mean) / std
//! ```
//! `std` is the population standard deviation over the present values. A
//! constant column keeps a scale of 1 so it centers to zero instead of
//! dividing by zero.

use crate::utils::nan_as_null;
use polars::prelude::*;

/// Fitted location and scale of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub mean: f64,
    pub std: f64,
}

impl ScaleParams {
    /// Fit on the present values; `None` when every value is missing.
    pub fn fit(series: &Series) -> PolarsResult<Option<Self>> {
        let values = nan_as_null(series)?;
        let (Some(mean), Some(std)) = (values.mean(), values.std(0)) else {
            return Ok(None);
        };
        Ok(Some(Self {
            mean,
            std: if std == 0.0 { 1.0 } else { std },
        }))
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Standardize a numeric series into a Float64 series; missing stays null.
pub fn standardize_series(series: &Series) -> PolarsResult<Series> {
    let values = nan_as_null(series)?;
    let Some(params) = ScaleParams::fit(&values)? else {
        return Ok(Series::full_null(
            series.name().clone(),
            values.len(),
            &DataType::Float64,
        ));
    };

    let scaled: Vec<Option<f64>> = values
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| params.transform(x)))
        .collect();
    Ok(Series::new(series.name().clone(), scaled))
}
