//! Configuration types for the cleaning pipeline.
//!
//! Strategy enums are shared by the engine's stage operations and by
//! [`CleaningConfig`], which drives the canonical-order runner in
//! [`crate::pipeline`].

use serde::{Deserialize, Serialize};

/// Strategy for imputing missing numeric values.
///
/// Deserializes leniently: unknown names become [`NumericImputation::Zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum NumericImputation {
    /// Use the median of non-null values
    #[default]
    Median,
    /// Use the mean of non-null values
    Mean,
    /// Use a constant 0.0
    Zero,
}

impl NumericImputation {
    /// Parse a strategy name, falling back to [`NumericImputation::Zero`]
    /// for anything unrecognized.
    ///
    /// Mirrors the front-end contract where an unknown selection fills with
    /// zero instead of failing.
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "median" => Self::Median,
            "mean" => Self::Mean,
            _ => Self::Zero,
        }
    }

    /// Name recorded in the cleaning report.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Mean => "mean",
            Self::Zero => "zero",
        }
    }
}

impl From<String> for NumericImputation {
    fn from(name: String) -> Self {
        Self::from_name_lenient(&name)
    }
}

/// Strategy for imputing missing values in text columns.
///
/// Deserializes leniently: unknown names become [`CategoricalImputation::Missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CategoricalImputation {
    /// Use the per-column mode (empty string for all-null columns)
    #[default]
    MostFrequent,
    /// Use the constant sentinel `"missing"`
    Missing,
}

impl CategoricalImputation {
    /// Parse a strategy name, falling back to [`CategoricalImputation::Missing`]
    /// for anything unrecognized.
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "most_frequent" | "mode" => Self::MostFrequent,
            _ => Self::Missing,
        }
    }

    /// Name recorded in the cleaning report.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MostFrequent => "most_frequent",
            Self::Missing => "missing",
        }
    }
}

impl From<String> for CategoricalImputation {
    fn from(name: String) -> Self {
        Self::from_name_lenient(&name)
    }
}

/// How text standardization treats null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextNullPolicy {
    /// Nulls are stringified to `"None"` before normalization and end up as
    /// the text `"none"`. Matches the audit output of earlier exports.
    #[default]
    Stringify,
    /// Nulls stay null so a later imputation stage can fill them.
    Preserve,
}

/// Default multiplier applied to the IQR when computing outlier bounds.
pub const DEFAULT_OUTLIER_K: f64 = 1.5;

/// Default cardinality ceiling for one-hot encoding.
pub const DEFAULT_MAX_UNIQUE: usize = 50;

/// Configuration for the canonical-order cleaning run.
///
/// Use [`CleaningConfig::builder()`] for a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use tidyup_core::config::{CleaningConfig, NumericImputation};
///
/// let config = CleaningConfig::builder()
///     .numeric_imputation(NumericImputation::Mean)
///     .remove_outliers(true)
///     .scale_numeric(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Drop exact duplicate rows. Default: true
    pub remove_duplicates: bool,

    /// Normalize every text column. Default: true
    pub standardize_text: bool,

    /// Promote date-like text columns to datetime. Default: true
    pub coerce_types: bool,

    /// Fill strategy for numeric columns. Default: Median
    pub numeric_imputation: NumericImputation,

    /// Fill strategy for text columns. Default: MostFrequent
    pub categorical_imputation: CategoricalImputation,

    /// Drop rows flagged by the IQR test. Default: false
    pub remove_outliers: bool,

    /// Columns tested for outliers. `None` means every numeric column.
    pub outlier_columns: Option<Vec<String>>,

    /// IQR multiplier for outlier bounds. Default: 1.5
    pub outlier_k: f64,

    /// One-hot encode low-cardinality text columns. Default: true
    pub one_hot_encode: bool,

    /// Drop the first (reference) level when encoding. Default: true
    pub drop_first: bool,

    /// Text columns with more distinct values than this are not encoded.
    /// Default: 50
    pub max_unique: usize,

    /// Standardize numeric columns to zero mean and unit variance.
    /// Default: false
    pub scale_numeric: bool,

    /// Null handling during text standardization. Default: Stringify
    pub text_null_policy: TextNullPolicy,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            standardize_text: true,
            coerce_types: true,
            numeric_imputation: NumericImputation::default(),
            categorical_imputation: CategoricalImputation::default(),
            remove_outliers: false,
            outlier_columns: None,
            outlier_k: DEFAULT_OUTLIER_K,
            one_hot_encode: true,
            drop_first: true,
            max_unique: DEFAULT_MAX_UNIQUE,
            scale_numeric: false,
            text_null_policy: TextNullPolicy::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.outlier_k.is_finite() || self.outlier_k < 0.0 {
            return Err(ConfigValidationError::InvalidOutlierK(self.outlier_k));
        }

        if let Some(cols) = &self.outlier_columns
            && cols.is_empty()
        {
            return Err(ConfigValidationError::EmptyOutlierColumns);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid outlier k: {0} (must be finite and non-negative)")]
    InvalidOutlierK(f64),

    #[error("Outlier column list is empty (omit it to test every numeric column)")]
    EmptyOutlierColumns,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    remove_duplicates: Option<bool>,
    standardize_text: Option<bool>,
    coerce_types: Option<bool>,
    numeric_imputation: Option<NumericImputation>,
    categorical_imputation: Option<CategoricalImputation>,
    remove_outliers: Option<bool>,
    outlier_columns: Option<Vec<String>>,
    outlier_k: Option<f64>,
    one_hot_encode: Option<bool>,
    drop_first: Option<bool>,
    max_unique: Option<usize>,
    scale_numeric: Option<bool>,
    text_null_policy: Option<TextNullPolicy>,
}

impl CleaningConfigBuilder {
    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = Some(enable);
        self
    }

    /// Enable or disable text standardization.
    pub fn standardize_text(mut self, enable: bool) -> Self {
        self.standardize_text = Some(enable);
        self
    }

    /// Enable or disable datetime coercion.
    pub fn coerce_types(mut self, enable: bool) -> Self {
        self.coerce_types = Some(enable);
        self
    }

    /// Set the numeric imputation strategy.
    pub fn numeric_imputation(mut self, strategy: NumericImputation) -> Self {
        self.numeric_imputation = Some(strategy);
        self
    }

    /// Set the text imputation strategy.
    pub fn categorical_imputation(mut self, strategy: CategoricalImputation) -> Self {
        self.categorical_imputation = Some(strategy);
        self
    }

    /// Enable or disable IQR outlier removal.
    pub fn remove_outliers(mut self, enable: bool) -> Self {
        self.remove_outliers = Some(enable);
        self
    }

    /// Restrict outlier detection to the given columns.
    pub fn outlier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outlier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the IQR multiplier.
    pub fn outlier_k(mut self, k: f64) -> Self {
        self.outlier_k = Some(k);
        self
    }

    /// Enable or disable one-hot encoding.
    pub fn one_hot_encode(mut self, enable: bool) -> Self {
        self.one_hot_encode = Some(enable);
        self
    }

    /// Drop the reference level when encoding.
    pub fn drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = Some(drop_first);
        self
    }

    /// Set the cardinality ceiling for encoding.
    pub fn max_unique(mut self, max_unique: usize) -> Self {
        self.max_unique = Some(max_unique);
        self
    }

    /// Enable or disable numeric scaling.
    pub fn scale_numeric(mut self, enable: bool) -> Self {
        self.scale_numeric = Some(enable);
        self
    }

    /// Set how text standardization treats nulls.
    pub fn text_null_policy(mut self, policy: TextNullPolicy) -> Self {
        self.text_null_policy = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            standardize_text: self.standardize_text.unwrap_or(defaults.standardize_text),
            coerce_types: self.coerce_types.unwrap_or(defaults.coerce_types),
            numeric_imputation: self.numeric_imputation.unwrap_or_default(),
            categorical_imputation: self.categorical_imputation.unwrap_or_default(),
            remove_outliers: self.remove_outliers.unwrap_or(defaults.remove_outliers),
            outlier_columns: self.outlier_columns,
            outlier_k: self.outlier_k.unwrap_or(defaults.outlier_k),
            one_hot_encode: self.one_hot_encode.unwrap_or(defaults.one_hot_encode),
            drop_first: self.drop_first.unwrap_or(defaults.drop_first),
            max_unique: self.max_unique.unwrap_or(defaults.max_unique),
            scale_numeric: self.scale_numeric.unwrap_or(defaults.scale_numeric),
            text_null_policy: self.text_null_policy.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
