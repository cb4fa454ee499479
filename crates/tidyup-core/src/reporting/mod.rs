//! Audit trail of applied cleaning stages.
//!
//! Every stage call on [`crate::DataCleaner`] appends exactly one [`Step`] to
//! the engine's [`CleaningReport`], even when the stage changed nothing. The
//! serialized report can be written next to the cleaned table and later fed
//! to [`crate::pipeline::replay`] to re-apply the same stages to fresh data.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidyup_core::reporting::CleaningReport;
//!
//! let report = CleaningReport::from_json(&std::fs::read_to_string("run_report.json")?)?;
//! for step in report.steps() {
//!     println!("{} {}", step.action, serde_json::Value::Object(step.detail.clone()));
//! }
//! ```

mod report;

pub use report::{CleaningReport, StageAction, Step};
