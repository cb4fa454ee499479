//! Error types for the cleaning engine.
//!
//! Stage operations never fail on empty or degenerate input; the variants
//! here cover configuration mistakes, report replay problems and failures
//! bubbling up from polars or the filesystem.
//!
//! Errors serialize as `{code, message}` so a front-end can branch on the
//! stable code without parsing the message.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A report step names an action the engine does not know.
    #[error("Unknown action '{0}' in cleaning report")]
    UnknownAction(String),

    /// A report step is missing a parameter required to replay it.
    #[error("Malformed '{action}' step: {reason}")]
    MalformedStep { action: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnknownAction(_) => "UNKNOWN_ACTION",
            Self::MalformedStep { .. } => "MALFORMED_STEP",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error stems from caller input rather than a runtime failure.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::InvalidConfig(_)
            | Self::UnknownAction(_)
            | Self::MalformedStep { .. } => true,
            Self::WithContext { source, .. } => source.is_caller_error(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleaningError::InvalidConfig("k".to_string()).error_code(),
            "INVALID_CONFIG"
        );
        assert_eq!(
            CleaningError::UnknownAction("shuffle".to_string()).error_code(),
            "UNKNOWN_ACTION"
        );
    }

    #[test]
    fn test_is_caller_error() {
        assert!(CleaningError::InvalidConfig("k".to_string()).is_caller_error());
        let io = CleaningError::Io(std::io::Error::other("disk"));
        assert!(!io.is_caller_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleaningError::UnknownAction("shuffle_rows".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNKNOWN_ACTION"));
        assert!(json.contains("shuffle_rows"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = CleaningError::MalformedStep {
            action: "remove_outliers_iqr".to_string(),
            reason: "missing k".to_string(),
        }
        .with_context("While replaying report");
        assert!(error.to_string().contains("While replaying report"));
        assert_eq!(error.error_code(), "MALFORMED_STEP");
        assert!(error.is_caller_error());
    }
}
