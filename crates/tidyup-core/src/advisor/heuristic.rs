//! Offline advisor that derives suggestions from dtype names alone.

use super::{ColumnAdvice, DatasetSummary, GlobalAdvice, SchemaAdvisor, SchemaSuggestion};
use anyhow::Result;

/// Note attached to every heuristic suggestion.
pub const HEURISTIC_NOTE: &str = "Heuristic suggestion (no API key).";

/// Rule-based advisor used when no model is configured.
///
/// Numeric columns get median imputation and standard scaling, datetime
/// columns are flagged for row dropping when critical, and everything else
/// is treated as categorical (mode imputation, one-hot encoding).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdvisor;

impl HeuristicAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Recipe for a column given its dtype name (`i64`, `f64`, `str`,
    /// `datetime[ms]`, ...).
    pub fn advise_dtype(dtype: &str) -> ColumnAdvice {
        let dtype = dtype.to_ascii_lowercase();
        if is_numeric_name(&dtype) {
            ColumnAdvice {
                kind: Some("numeric".to_string()),
                impute: Some("median".to_string()),
                encode: None,
                scale: Some("standard".to_string()),
            }
        } else if dtype.contains("datetime") || dtype == "date" {
            ColumnAdvice {
                kind: Some("datetime".to_string()),
                impute: Some("drop-row-if-critical".to_string()),
                encode: None,
                scale: None,
            }
        } else {
            ColumnAdvice {
                kind: Some("categorical".to_string()),
                impute: Some("most_frequent".to_string()),
                encode: Some("onehot".to_string()),
                scale: None,
            }
        }
    }
}

/// Matches both short names (`i32`, `u8`, `f64`) and long ones (`int64`,
/// `float32`).
fn is_numeric_name(dtype: &str) -> bool {
    if dtype.contains("float") || dtype.contains("int") {
        return true;
    }
    let mut chars = dtype.chars();
    matches!(chars.next(), Some('i' | 'u' | 'f'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}

impl SchemaAdvisor for HeuristicAdvisor {
    fn suggest(&self, summary: &DatasetSummary) -> Result<SchemaSuggestion> {
        let columns = summary
            .dtypes
            .iter()
            .map(|(name, dtype)| (name.clone(), Self::advise_dtype(dtype)))
            .collect();

        Ok(SchemaSuggestion {
            columns,
            global: GlobalAdvice {
                notes: Some(HEURISTIC_NOTE.to_string()),
            },
        })
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
