//! tidyup: an auditable data-cleaning library built with Rust and Polars.
//!
//! # Overview
//!
//! The library applies a fixed set of well-defined cleaning stages to a
//! table and records every stage it applied, in order, with its parameters
//! and measurable effect:
//!
//! - **Deduplication**: exact duplicate rows, first occurrence kept
//! - **Text standardization**: lowercase, trimmed, whitespace-collapsed text
//! - **Type coercion**: date-like text columns promoted to datetimes
//! - **Imputation**: median/mean/zero for numbers, mode/marker for text
//! - **Outlier removal**: IQR fences on any set of numeric columns
//! - **One-hot encoding**: boolean indicators for low-cardinality text
//! - **Scaling**: z-scores for numeric columns
//!
//! The resulting [`CleaningReport`] serializes to JSON and can be replayed
//! onto fresh data with [`pipeline::replay`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidyup_core::{CleaningConfig, Pipeline, io};
//!
//! let raw = io::read_csv_latin1("data.csv")?;
//!
//! // Canonical order, driven by configuration
//! let config = CleaningConfig::builder()
//!     .remove_outliers(true)
//!     .scale_numeric(true)
//!     .build()?;
//! let mut outcome = Pipeline::new(config).run(&raw)?;
//!
//! io::write_csv(&mut outcome.data, "data_cleaned.csv")?;
//! io::write_report(&outcome.report, "data_report.json")?;
//! ```
//!
//! # Driving the engine directly
//!
//! [`DataCleaner`] exposes each stage as a chainable call, in whatever order
//! the caller chooses:
//!
//! ```rust,ignore
//! use tidyup_core::{DataCleaner, NumericImputation, CategoricalImputation};
//!
//! let mut cleaner = DataCleaner::new(&raw);
//! cleaner
//!     .drop_duplicates()?
//!     .standardize_text()?
//!     .impute_missing(NumericImputation::Mean, CategoricalImputation::Missing)?
//!     .remove_outliers_iqr(None, 1.5)?;
//!
//! assert_eq!(
//!     cleaner.report().total_rows_removed(),
//!     cleaner.original_row_count() - cleaner.data().height()
//! );
//! ```
//!
//! # Schema advice
//!
//! The [`advisor`] module can suggest per-column recipes from a dataset
//! summary, either with a chat model (feature `ai`) or with offline
//! heuristics. Advice is informational only; the engine never applies it.

pub mod advisor;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod reporting;
pub mod sample;
pub mod utils;

// Re-exports for convenient access
pub use advisor::{Advice, DatasetSummary, HeuristicAdvisor, SchemaAdvisor, SchemaSuggestion};
pub use cleaner::{
    DataCleaner, coerce_datetime, outlier_mask, standardize_text_series, text_standardize,
};
pub use config::{
    CategoricalImputation, CleaningConfig, CleaningConfigBuilder, ConfigValidationError,
    NumericImputation, TextNullPolicy,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{CleaningOutcome, Pipeline, PipelineBuilder, replay};
pub use reporting::{CleaningReport, StageAction, Step};
pub use sample::sample_dataset;
pub use utils::{ColumnKind, columns_of_kind};
