//! Canonical-order cleaning pipeline.
//!
//! [`Pipeline`] turns a [`CleaningConfig`] into a sequence of
//! [`DataCleaner`] stage calls, in the order dedup → text → types → impute →
//! outliers → encode → scale. Imputation always runs; the other stages are
//! skipped when disabled.

use crate::cleaner::DataCleaner;
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::reporting::CleaningReport;
use polars::prelude::*;
use std::time::Instant;
use tracing::info;

/// Result of a pipeline run or a replay.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The cleaned table.
    pub data: DataFrame,
    /// Audit trail of the applied stages.
    pub report: CleaningReport,
    /// Original row position of each row in `data`.
    pub row_ids: Vec<usize>,
}

impl CleaningOutcome {
    pub(crate) fn from_cleaner(cleaner: DataCleaner) -> Self {
        let row_ids = cleaner.row_ids().to_vec();
        let (data, report) = cleaner.into_parts();
        Self {
            data,
            report,
            row_ids,
        }
    }
}

/// The cleaning pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use tidyup_core::{CleaningConfig, Pipeline};
///
/// let outcome = Pipeline::builder()
///     .config(CleaningConfig::builder().remove_outliers(true).build()?)
///     .build()?
///     .run(&raw)?;
///
/// println!("{}", outcome.report.to_json_pretty()?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: CleaningConfig,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a pipeline; the configuration is validated when it runs.
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a copy of `df`. The caller's frame is not modified.
    pub fn run(&self, df: &DataFrame) -> Result<CleaningOutcome> {
        self.config.validate()?;
        let config = &self.config;
        let start = Instant::now();

        info!(
            "Cleaning {} rows x {} columns",
            df.height(),
            df.width()
        );

        let mut cleaner = DataCleaner::new(df).with_text_null_policy(config.text_null_policy);

        if config.remove_duplicates {
            cleaner.drop_duplicates().context("Removing duplicates")?;
        }
        if config.standardize_text {
            cleaner.standardize_text().context("Standardizing text")?;
        }
        if config.coerce_types {
            cleaner.coerce_types().context("Coercing types")?;
        }
        cleaner
            .impute_missing(config.numeric_imputation, config.categorical_imputation)
            .context("Imputing missing values")?;
        if config.remove_outliers {
            cleaner
                .remove_outliers_iqr(config.outlier_columns.as_deref(), config.outlier_k)
                .context("Removing outliers")?;
        }
        if config.one_hot_encode {
            cleaner
                .one_hot_encode(config.drop_first, config.max_unique)
                .context("Encoding categorical columns")?;
        }
        if config.scale_numeric {
            cleaner.scale_numeric().context("Scaling numeric columns")?;
        }

        let outcome = CleaningOutcome::from_cleaner(cleaner);
        info!(
            "Cleaning finished in {:.2?}: {} steps, {} rows removed, {} x {} result",
            start.elapsed(),
            outcome.report.steps().len(),
            outcome.report.total_rows_removed(),
            outcome.data.height(),
            outcome.data.width()
        );
        Ok(outcome)
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
}

impl PipelineBuilder {
    /// Set the cleaning configuration (defaults to [`CleaningConfig::default()`]).
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(Pipeline { config })
    }
}
