//! Re-applying a recorded cleaning report to a fresh table.
//!
//! Each step runs with the parameters it recorded, so a report written for
//! one export can clean the next export of the same source the same way.
//! The replayed report is rebuilt from scratch and reflects the new data.

use super::CleaningOutcome;
use crate::cleaner::DataCleaner;
use crate::config::{CategoricalImputation, NumericImputation, TextNullPolicy};
use crate::error::{CleaningError, Result, ResultExt};
use crate::reporting::{CleaningReport, StageAction, Step};
use polars::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

fn malformed(step: &Step, reason: impl Into<String>) -> CleaningError {
    CleaningError::MalformedStep {
        action: step.action.clone(),
        reason: reason.into(),
    }
}

fn f64_param(step: &Step, key: &str) -> Result<f64> {
    step.require(key)?
        .as_f64()
        .ok_or_else(|| malformed(step, format!("'{key}' is not a number")))
}

fn bool_param(step: &Step, key: &str) -> Result<bool> {
    step.require(key)?
        .as_bool()
        .ok_or_else(|| malformed(step, format!("'{key}' is not a boolean")))
}

fn usize_param(step: &Step, key: &str) -> Result<usize> {
    step.require(key)?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| malformed(step, format!("'{key}' is not a non-negative integer")))
}

fn str_param<'a>(step: &'a Step, key: &str) -> Result<&'a str> {
    step.require(key)?
        .as_str()
        .ok_or_else(|| malformed(step, format!("'{key}' is not a string")))
}

fn string_list_param(step: &Step, key: &str) -> Result<Vec<String>> {
    let Value::Array(items) = step.require(key)? else {
        return Err(malformed(step, format!("'{key}' is not a list")));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(step, format!("'{key}' holds a non-string entry")))
        })
        .collect()
}

/// Null policy recorded by a text step; older reports without it used the
/// stringifying behavior.
fn null_policy_param(step: &Step) -> Result<TextNullPolicy> {
    match step.detail.get("null_policy") {
        None => Ok(TextNullPolicy::Stringify),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| malformed(step, format!("invalid 'null_policy': {e}"))),
    }
}

fn apply_step(cleaner: &mut DataCleaner, step: &Step) -> Result<()> {
    match step.stage()? {
        StageAction::DropDuplicates => {
            cleaner.drop_duplicates()?;
        }
        StageAction::StandardizeText => {
            cleaner.set_text_null_policy(null_policy_param(step)?);
            cleaner.standardize_text()?;
        }
        StageAction::CoerceTypes => {
            cleaner.coerce_types()?;
        }
        StageAction::ImputeMissing => {
            let num = NumericImputation::from_name_lenient(str_param(step, "num_strategy")?);
            let cat = CategoricalImputation::from_name_lenient(str_param(step, "cat_strategy")?);
            cleaner.impute_missing(num, cat)?;
        }
        StageAction::RemoveOutliersIqr => {
            let cols = string_list_param(step, "cols")?;
            let k = f64_param(step, "k")?;
            cleaner.remove_outliers_iqr(Some(cols.as_slice()), k)?;
        }
        StageAction::OneHotEncode => {
            let drop_first = bool_param(step, "drop_first")?;
            let max_unique = usize_param(step, "max_unique")?;
            cleaner.one_hot_encode(drop_first, max_unique)?;
        }
        StageAction::ScaleNumeric => {
            cleaner.scale_numeric()?;
        }
    }
    Ok(())
}

/// Apply every step of `report` to a copy of `df`, in recorded order.
///
/// Fails with [`CleaningError::UnknownAction`] on an action the engine does
/// not know and [`CleaningError::MalformedStep`] when a step lacks a
/// parameter.
pub fn replay(df: &DataFrame, report: &CleaningReport) -> Result<CleaningOutcome> {
    let mut cleaner = DataCleaner::new(df);

    for (index, step) in report.steps().iter().enumerate() {
        debug!("Replaying step {}: {}", index + 1, step.action);
        apply_step(&mut cleaner, step).context(format!("Replaying step {}", index + 1))?;
    }

    info!(
        "Replayed {} steps, {} rows removed",
        report.steps().len(),
        cleaner.report().total_rows_removed()
    );
    Ok(CleaningOutcome::from_cleaner(cleaner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningConfig;
    use crate::pipeline::Pipeline;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw_df() -> DataFrame {
        df![
            "income" => [Some(50.0), Some(52.0), Some(51.0), None, Some(49.0), Some(500.0)],
            "plan" => [Some("Free"), Some("pro"), Some("PRO "), Some("basic"), None, Some("free")],
        ]
        .unwrap()
    }

    #[test]
    fn test_replay_reproduces_run() {
        let config = CleaningConfig::builder()
            .remove_outliers(true)
            .scale_numeric(true)
            .build()
            .unwrap();
        let first = Pipeline::new(config).run(&raw_df()).unwrap();
        let replayed = replay(&raw_df(), &first.report).unwrap();

        assert_eq!(replayed.report, first.report);
        assert_eq!(replayed.row_ids, first.row_ids);
        assert!(replayed.data.equals_missing(&first.data));
    }

    #[test]
    fn test_replay_after_json_round_trip() {
        let first = Pipeline::default().run(&raw_df()).unwrap();
        let text = first.report.to_json_pretty().unwrap();
        let restored = CleaningReport::from_json(&text).unwrap();

        let replayed = replay(&raw_df(), &restored).unwrap();
        assert_eq!(replayed.report.actions(), first.report.actions());
    }

    #[test]
    fn test_replay_unknown_action() {
        let mut report = CleaningReport::new();
        report.append("shuffle_rows", json!({}));

        let err = replay(&raw_df(), &report).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_ACTION");
    }

    #[test]
    fn test_replay_malformed_step() {
        let mut report = CleaningReport::new();
        report.append("remove_outliers_iqr", json!({"cols": ["income"]}));

        let err = replay(&raw_df(), &report).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_STEP");
        assert!(err.to_string().contains("Replaying step 1"));
    }

    #[test]
    fn test_replay_standardize_without_policy_stringifies() {
        let mut report = CleaningReport::new();
        report.append("standardize_text", json!({"columns": ["plan"]}));

        let replayed = replay(&raw_df(), &report).unwrap();
        let plan = crate::utils::string_values(
            replayed.data.column("plan").unwrap().as_materialized_series(),
        )
        .unwrap();
        assert_eq!(plan[4], Some("none".to_string()));
    }
}
