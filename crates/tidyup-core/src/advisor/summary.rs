//! Compact dataset description sent to advisors.

use crate::error::Result;
use crate::utils::{any_value_to_json, dtype_name};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Number of leading rows included as samples.
pub const SAMPLE_ROWS: usize = 5;

/// Shape, types, missingness and a few sample rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// `[rows, columns]`
    pub shape: [usize; 2],
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, String>,
    pub null_counts: BTreeMap<String, usize>,
    pub sample_rows: Vec<Map<String, Value>>,
}

impl DatasetSummary {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let dtypes = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), dtype_name(col.dtype())))
            .collect();

        let null_counts = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        let mut sample_rows = Vec::new();
        for row in 0..df.height().min(SAMPLE_ROWS) {
            let mut record = Map::new();
            for col in df.get_columns() {
                let value = col.get(row)?;
                record.insert(col.name().to_string(), any_value_to_json(&value));
            }
            sample_rows.push(record);
        }

        Ok(Self {
            shape: [df.height(), df.width()],
            columns,
            dtypes,
            null_counts,
            sample_rows,
        })
    }
}
