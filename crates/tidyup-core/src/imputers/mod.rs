//! Imputation module for handling missing values.
//!
//! Statistical imputation (median, mean, zero, mode, constant marker).

mod statistical;

pub use statistical::{MISSING_MARKER, StatisticalImputer};
