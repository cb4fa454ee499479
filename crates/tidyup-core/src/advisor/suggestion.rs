//! Advisor output types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Suggested handling of one column. Every field is optional and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnAdvice {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub impute: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub encode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scale: Option<String>,
}

/// Dataset-wide remarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalAdvice {
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

/// `{columns: {name: {type, impute, encode, scale}}, global: {notes}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSuggestion {
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnAdvice>,
    #[serde(default)]
    pub global: GlobalAdvice,
}

/// Result of asking an advisor: a suggestion, or the error that prevented one.
///
/// Serializes either as the suggestion itself or as
/// `{"error": "...", "fallback": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Advice {
    Fallback { error: String, fallback: bool },
    Suggestion(SchemaSuggestion),
}

impl Advice {
    pub fn fallback(error: impl Into<String>) -> Self {
        Self::Fallback {
            error: error.into(),
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn suggestion(&self) -> Option<&SchemaSuggestion> {
        match self {
            Self::Suggestion(s) => Some(s),
            Self::Fallback { .. } => None,
        }
    }
}

/// Accept any JSON scalar where a string is expected; models are not always
/// consistent about `"scale": false` versus `"scale": null`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
