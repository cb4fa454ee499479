use crate::error::{CleaningError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Stage Actions
// ============================================================================

/// Stage operations that can appear in a cleaning report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageAction {
    DropDuplicates,
    StandardizeText,
    CoerceTypes,
    ImputeMissing,
    RemoveOutliersIqr,
    OneHotEncode,
    ScaleNumeric,
}

impl StageAction {
    /// All stages in canonical order.
    pub const CANONICAL_ORDER: [StageAction; 7] = [
        Self::DropDuplicates,
        Self::StandardizeText,
        Self::CoerceTypes,
        Self::ImputeMissing,
        Self::RemoveOutliersIqr,
        Self::OneHotEncode,
        Self::ScaleNumeric,
    ];

    /// Action name written to the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropDuplicates => "drop_duplicates",
            Self::StandardizeText => "standardize_text",
            Self::CoerceTypes => "coerce_types",
            Self::ImputeMissing => "impute_missing",
            Self::RemoveOutliersIqr => "remove_outliers_iqr",
            Self::OneHotEncode => "one_hot_encode",
            Self::ScaleNumeric => "scale_numeric",
        }
    }
}

impl fmt::Display for StageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageAction {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self> {
        Self::CANONICAL_ORDER
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| CleaningError::UnknownAction(s.to_string()))
    }
}

// ============================================================================
// Steps
// ============================================================================

/// One applied stage: its action name and the parameters/effects it recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub action: String,
    pub detail: Map<String, Value>,
}

impl Step {
    /// Typed action, if the name is one the engine knows.
    pub fn stage(&self) -> Result<StageAction> {
        self.action.parse()
    }

    /// Detail entry, or a [`CleaningError::MalformedStep`] naming the key.
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.detail
            .get(key)
            .ok_or_else(|| CleaningError::MalformedStep {
                action: self.action.clone(),
                reason: format!("missing '{key}'"),
            })
    }
}

// ============================================================================
// Cleaning Report
// ============================================================================

/// Ordered, append-only audit log of the stages applied to a table.
///
/// Serializes as `{steps, rows_removed, cols_encoded, cols_scaled}`. The
/// aggregates are only advanced by the engine, alongside the step that
/// caused the change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    steps: Vec<Step>,
    rows_removed: usize,
    cols_encoded: Vec<String>,
    cols_scaled: Vec<String>,
}

impl CleaningReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Object details are stored as-is; `null` becomes an empty
    /// detail and any other value is stored under `"value"`.
    pub fn append(&mut self, action: impl Into<String>, detail: Value) {
        let detail = match detail {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.steps.push(Step {
            action: action.into(),
            detail,
        });
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn total_rows_removed(&self) -> usize {
        self.rows_removed
    }

    pub fn encoded_columns(&self) -> &[String] {
        &self.cols_encoded
    }

    pub fn scaled_columns(&self) -> &[String] {
        &self.cols_scaled
    }

    /// Action names in the order they were applied.
    pub fn actions(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.action.as_str()).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously produced by [`CleaningReport::to_json_pretty`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub(crate) fn add_rows_removed(&mut self, n: usize) {
        self.rows_removed += n;
    }

    pub(crate) fn extend_encoded<I: IntoIterator<Item = String>>(&mut self, cols: I) {
        extend_unique(&mut self.cols_encoded, cols);
    }

    pub(crate) fn extend_scaled<I: IntoIterator<Item = String>>(&mut self, cols: I) {
        extend_unique(&mut self.cols_scaled, cols);
    }
}

fn extend_unique<I: IntoIterator<Item = String>>(target: &mut Vec<String>, cols: I) {
    for col in cols {
        if !target.contains(&col) {
            target.push(col);
        }
    }
}
