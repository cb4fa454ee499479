//! Deterministic synthetic dataset for demos and tests.
//!
//! The table mixes every column kind the cleaner handles and carries the
//! usual defects: missing numbers, messy text, and a handful of income
//! outliers.

use crate::error::Result;
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};

/// Default number of rows.
pub const DEFAULT_SAMPLE_ROWS: usize = 500;

/// Default RNG seed.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

const CITIES: [&str; 5] = ["Delhi", "Mumbai", "Bangalore", "Hyderabad", "Pune"];
const PLANS: [&str; 3] = ["free", "basic", "pro"];
const NOTES: [Option<&str>; 4] = [Some("  Hello "), Some("WORLD!!"), None, Some("TeSt  ")];

// Defect counts at DEFAULT_SAMPLE_ROWS; smaller tables get proportionally fewer.
const MISSING_INCOME: usize = 30;
const MISSING_AGE: usize = 15;
const INCOME_OUTLIERS: usize = 5;
const OUTLIER_FACTOR: f64 = 5.0;

const INCOME_MEAN: f64 = 60_000.0;
const INCOME_STD: f64 = 15_000.0;

fn scaled_count(count: usize, rows: usize) -> usize {
    (count * rows / DEFAULT_SAMPLE_ROWS).min(rows)
}

/// Standard normal draw (Box-Muller).
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Generate `rows` rows of sample data from `seed`.
///
/// Columns: `date` (daily from 2024-01-01, as text), `age` (18..65),
/// `income` (normal, mean 60000, std 15000), `city`, `plan`, `notes`.
pub fn sample_dataset(rows: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    let dates: Vec<String> = (0..rows as u64)
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .unwrap_or(start)
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect();
    let mut ages: Vec<Option<f64>> = (0..rows)
        .map(|_| Some(f64::from(rng.gen_range(18u32..65))))
        .collect();
    let mut incomes: Vec<Option<f64>> = (0..rows)
        .map(|_| Some(INCOME_MEAN + INCOME_STD * standard_normal(&mut rng)))
        .collect();
    let cities: Vec<&str> = (0..rows)
        .map(|_| *CITIES.choose(&mut rng).unwrap_or(&CITIES[0]))
        .collect();
    let plans: Vec<&str> = (0..rows)
        .map(|_| *PLANS.choose(&mut rng).unwrap_or(&PLANS[0]))
        .collect();
    let notes: Vec<Option<&str>> = (0..rows)
        .map(|_| *NOTES.choose(&mut rng).unwrap_or(&None))
        .collect();

    for i in index::sample(&mut rng, rows, scaled_count(MISSING_INCOME, rows)) {
        incomes[i] = None;
    }
    for i in index::sample(&mut rng, rows, scaled_count(MISSING_AGE, rows)) {
        ages[i] = None;
    }
    for i in index::sample(&mut rng, rows, scaled_count(INCOME_OUTLIERS, rows)) {
        incomes[i] = incomes[i].map(|v| v * OUTLIER_FACTOR);
    }

    let df = df![
        "date" => dates,
        "age" => ages,
        "income" => incomes,
        "city" => cities,
        "plan" => plans,
        "notes" => notes,
    ]?;
    Ok(df)
}
