//! Integration tests for the cleaning pipeline.
//!
//! These tests drive the public API end to end on the fixture files.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tidyup_core::advisor::{DatasetSummary, advise};
use tidyup_core::utils::{float_values, string_values};
use tidyup_core::{
    CategoricalImputation, CleaningConfig, CleaningReport, ColumnKind, DataCleaner,
    HeuristicAdvisor, NumericImputation, Pipeline, TextNullPolicy, columns_of_kind, io, replay,
    sample_dataset,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    io::read_csv_latin1(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tidyup_it_{}_{}", std::process::id(), name))
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn full_config() -> CleaningConfig {
    CleaningConfig::builder()
        .remove_outliers(true)
        .outlier_columns(["income"])
        .scale_numeric(true)
        .build()
        .unwrap()
}

// ============================================================================
// Default Pipeline
// ============================================================================

#[test]
fn test_default_pipeline_on_messy_fixture() {
    let raw = load_csv("messy_customers.csv");
    assert_eq!(raw.shape(), (8, 5));

    let outcome = Pipeline::default().run(&raw).unwrap();
    let report = &outcome.report;

    assert_eq!(
        report.actions(),
        vec![
            "drop_duplicates",
            "standardize_text",
            "coerce_types",
            "impute_missing",
            "one_hot_encode",
        ]
    );
    assert_eq!(report.total_rows_removed(), 1);
    assert_eq!(outcome.data.height(), 7);
    assert_eq!(outcome.row_ids, vec![0, 1, 2, 4, 5, 6, 7]);

    // Dates promoted, text encoded away
    assert_eq!(
        outcome.data.column("signup").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Milliseconds, None)
    );
    assert!(columns_of_kind(&outcome.data, ColumnKind::Text).is_empty());
    assert_eq!(report.encoded_columns(), ["city", "plan"]);

    // Numeric gaps filled with the median
    let income = float_values(outcome.data.column("income").unwrap().as_materialized_series())
        .unwrap();
    assert!(income.iter().all(|v| v.is_some()));
    assert_eq!(income[2], Some(59_000.0));

    let age =
        float_values(outcome.data.column("age").unwrap().as_materialized_series()).unwrap();
    assert_eq!(age[1], Some(39.5));
}

#[test]
fn test_stringified_null_becomes_a_level() {
    let raw = load_csv("messy_customers.csv");
    let outcome = Pipeline::default().run(&raw).unwrap();

    let names = column_names(&outcome.data);
    for expected in ["city_mumbai", "city_none", "city_pune", "plan_free", "plan_pro"] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
    // First sorted level dropped
    assert!(!names.contains(&"city_delhi".to_string()));
    assert!(!names.contains(&"plan_basic".to_string()));
}

#[test]
fn test_preserve_policy_imputes_text_nulls() {
    let raw = load_csv("messy_customers.csv");
    let config = CleaningConfig::builder()
        .one_hot_encode(false)
        .text_null_policy(TextNullPolicy::Preserve)
        .build()
        .unwrap();

    let outcome = Pipeline::new(config).run(&raw).unwrap();
    let city =
        string_values(outcome.data.column("city").unwrap().as_materialized_series()).unwrap();

    assert!(city.iter().all(|v| v.is_some()));
    assert!(!city.iter().any(|v| v.as_deref() == Some("none")));
    assert_eq!(city[0].as_deref(), Some("delhi"));
    assert_eq!(city[2].as_deref(), Some("pune"));
}

// ============================================================================
// Outliers and Scaling
// ============================================================================

#[test]
fn test_full_pipeline_removes_outlier_and_scales() {
    let raw = load_csv("messy_customers.csv");
    let outcome = Pipeline::new(full_config()).run(&raw).unwrap();
    let report = &outcome.report;

    assert_eq!(
        report.actions(),
        vec![
            "drop_duplicates",
            "standardize_text",
            "coerce_types",
            "impute_missing",
            "remove_outliers_iqr",
            "one_hot_encode",
            "scale_numeric",
        ]
    );

    // One duplicate plus the 990000 income
    assert_eq!(report.total_rows_removed(), 2);
    assert_eq!(outcome.data.height(), 6);
    assert_eq!(
        report.total_rows_removed(),
        raw.height() - outcome.data.height()
    );
    assert!(!outcome.row_ids.contains(&5));

    assert_eq!(report.scaled_columns(), ["age", "income"]);
    for name in ["age", "income"] {
        let values =
            float_values(outcome.data.column(name).unwrap().as_materialized_series()).unwrap();
        let mean: f64 = values.iter().flatten().sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-9, "{name} mean {mean}");
    }

    // Indicators are boolean and never scaled
    assert!(
        !report
            .scaled_columns()
            .iter()
            .any(|c| c.starts_with("city_") || c.starts_with("plan_"))
    );
}

#[test]
fn test_sample_dataset_outliers_are_removed() {
    let raw = sample_dataset(500, 42).unwrap();
    let config = CleaningConfig::builder()
        .remove_outliers(true)
        .outlier_columns(["income"])
        .build()
        .unwrap();

    let outcome = Pipeline::new(config).run(&raw).unwrap();

    assert!(outcome.report.total_rows_removed() > 0);
    assert_eq!(
        outcome.report.total_rows_removed(),
        raw.height() - outcome.data.height()
    );
    let income = float_values(outcome.data.column("income").unwrap().as_materialized_series())
        .unwrap();
    assert!(income.iter().flatten().all(|v| *v < 200_000.0));
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_report_file_replays_to_identical_result() {
    let raw = load_csv("messy_customers.csv");
    let outcome = Pipeline::new(full_config()).run(&raw).unwrap();

    let path = temp_path("replay_report.json");
    io::write_report(&outcome.report, &path).unwrap();
    let loaded = io::read_report(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, outcome.report);

    let replayed = replay(&raw, &loaded).unwrap();
    assert!(replayed.data.equals_missing(&outcome.data));
    assert_eq!(replayed.report, outcome.report);
    assert_eq!(replayed.row_ids, outcome.row_ids);
}

#[test]
fn test_replay_on_fresh_rows() {
    let raw = load_csv("messy_customers.csv");
    let outcome = Pipeline::default().run(&raw).unwrap();

    let fresh = raw.slice(4, 4);
    let replayed = replay(&fresh, &outcome.report).unwrap();

    assert_eq!(replayed.report.actions(), outcome.report.actions());
    assert_eq!(replayed.data.height(), 4);
    assert_eq!(replayed.report.total_rows_removed(), 0);
}

#[test]
fn test_replay_unknown_action_fails() {
    let raw = load_csv("messy_customers.csv");
    let report = io::read_report(fixtures_path().join("unknown_action_report.json")).unwrap();

    let err = replay(&raw, &report).unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_ACTION");
    assert!(err.is_caller_error());
    assert!(err.to_string().contains("Replaying step 2"));
}

#[test]
fn test_replay_empty_report_is_identity() {
    let raw = load_csv("messy_customers.csv");
    let replayed = replay(&raw, &CleaningReport::new()).unwrap();

    assert!(replayed.data.equals_missing(&raw));
    assert!(replayed.report.steps().is_empty());
}

// ============================================================================
// Engine Used Directly
// ============================================================================

#[test]
fn test_engine_custom_order() {
    let raw = load_csv("messy_customers.csv");
    let mut cleaner = DataCleaner::new(&raw);
    cleaner
        .standardize_text()
        .unwrap()
        .drop_duplicates()
        .unwrap()
        .impute_missing(NumericImputation::Zero, CategoricalImputation::Missing)
        .unwrap();

    assert_eq!(
        cleaner.report().actions(),
        vec!["standardize_text", "drop_duplicates", "impute_missing"]
    );
    assert_eq!(cleaner.report().total_rows_removed(), 1);

    let income =
        float_values(cleaner.data().column("income").unwrap().as_materialized_series()).unwrap();
    assert_eq!(income[2], Some(0.0));
    assert_eq!(
        cleaner.report().total_rows_removed(),
        cleaner.original_row_count() - cleaner.data().height()
    );
}

// ============================================================================
// IO
// ============================================================================

#[test]
fn test_latin1_fixture() {
    let raw = load_csv("latin1_people.csv");
    assert_eq!(raw.shape(), (3, 3));

    let outcome = Pipeline::new(
        CleaningConfig::builder()
            .one_hot_encode(false)
            .build()
            .unwrap(),
    )
    .run(&raw)
    .unwrap();

    assert_eq!(outcome.report.total_rows_removed(), 1);
    let names =
        string_values(outcome.data.column("name").unwrap().as_materialized_series()).unwrap();
    assert_eq!(names, vec![Some("josé".to_string()), Some("renée".to_string())]);
    let cities =
        string_values(outcome.data.column("city").unwrap().as_materialized_series()).unwrap();
    assert_eq!(cities[0].as_deref(), Some("são paulo"));
}

#[test]
fn test_cleaned_csv_round_trip() {
    let raw = load_csv("messy_customers.csv");
    let mut outcome = Pipeline::default().run(&raw).unwrap();

    let path = temp_path("cleaned.csv");
    io::write_csv(&mut outcome.data, &path).unwrap();
    let reread = io::read_csv_latin1(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(reread.shape(), outcome.data.shape());
    assert_eq!(column_names(&reread), column_names(&outcome.data));
}

// ============================================================================
// Advisor
// ============================================================================

#[test]
fn test_heuristic_advice_on_fixture() {
    let raw = load_csv("messy_customers.csv");
    let summary = DatasetSummary::from_frame(&raw).unwrap();

    assert_eq!(summary.shape, [8, 5]);
    assert_eq!(summary.null_counts["age"], 1);
    assert_eq!(summary.sample_rows.len(), 5);

    let advice = advise(&summary, &HeuristicAdvisor::new());
    let suggestion = advice.suggestion().expect("heuristics never fail");

    assert_eq!(suggestion.columns["age"].kind.as_deref(), Some("numeric"));
    assert_eq!(suggestion.columns["city"].kind.as_deref(), Some("categorical"));
    assert_eq!(suggestion.columns["city"].encode.as_deref(), Some("onehot"));
}
