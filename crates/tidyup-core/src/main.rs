//! CLI entry point for the tidyup cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tidyup_core::advisor::{DatasetSummary, advise, advisor_from_env};
use tidyup_core::config::{DEFAULT_MAX_UNIQUE, DEFAULT_OUTLIER_K};
use tidyup_core::sample::{DEFAULT_SAMPLE_ROWS, DEFAULT_SAMPLE_SEED};
use tidyup_core::{
    CategoricalImputation, CleaningConfig, CleaningOutcome, NumericImputation, Pipeline,
    TextNullPolicy, io, replay, sample_dataset,
};
use tracing::{error, info};

/// CLI-compatible numeric imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNumericImputation {
    /// Use the median of non-null values
    Median,
    /// Use the mean of non-null values
    Mean,
    /// Use zero as the fill value
    Zero,
}

impl From<CliNumericImputation> for NumericImputation {
    fn from(cli: CliNumericImputation) -> Self {
        match cli {
            CliNumericImputation::Median => NumericImputation::Median,
            CliNumericImputation::Mean => NumericImputation::Mean,
            CliNumericImputation::Zero => NumericImputation::Zero,
        }
    }
}

/// CLI-compatible categorical imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalImputation {
    /// Use the most frequent value
    MostFrequent,
    /// Use the constant "missing"
    Missing,
}

impl From<CliCategoricalImputation> for CategoricalImputation {
    fn from(cli: CliCategoricalImputation) -> Self {
        match cli {
            CliCategoricalImputation::MostFrequent => CategoricalImputation::MostFrequent,
            CliCategoricalImputation::Missing => CategoricalImputation::Missing,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Auditable data-cleaning pipeline",
    long_about = "Cleans a CSV table with a fixed, configurable sequence of stages and \
                  writes an audit report of every stage applied.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENAI_API_KEY     API key for model-backed advice (heuristics otherwise)\n  \
                  OPENAI_MODEL       Override the advisory model\n  \
                  OPENAI_BASE_URL    Override the chat-completions endpoint\n\n\
                  EXAMPLES:\n  \
                  # Clean with defaults\n  \
                  tidyup clean -i data.csv -o results/\n\n  \
                  # Also drop outliers and scale numbers\n  \
                  tidyup clean -i data.csv --remove-outliers --scale\n\n  \
                  # Re-apply a saved report to a new export\n  \
                  tidyup replay -i next.csv --report results/data_report.json\n\n  \
                  # Generate the demo dataset\n  \
                  tidyup sample -o sample_data.csv"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the JSON result to stdout and disable logging
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a CSV file and write the cleaned table plus its report
    Clean(CleanArgs),
    /// Suggest per-column types and cleaning steps
    Advise {
        /// Path to the CSV file to summarize
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write the synthetic demo dataset
    Sample {
        /// Output CSV path
        #[arg(short, long, default_value = "sample_data.csv")]
        output: PathBuf,

        #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
        rows: usize,

        #[arg(long, default_value_t = DEFAULT_SAMPLE_SEED)]
        seed: u64,
    },
    /// Re-apply the stages recorded in a report to a CSV file
    Replay {
        /// Path to the CSV file to clean
        #[arg(short, long)]
        input: PathBuf,

        /// Report written by a previous `clean` run
        #[arg(long)]
        report: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "./outputs")]
        output: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct CleanArgs {
    /// Path to the CSV file to process (Latin-1 or ASCII)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Load the cleaning configuration from a JSON file
    ///
    /// When given, the stage flags below are ignored.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep duplicate rows
    #[arg(long)]
    no_dedup: bool,

    /// Leave text columns as they are
    #[arg(long)]
    no_standardize_text: bool,

    /// Do not promote date-like text columns
    #[arg(long)]
    no_coerce_types: bool,

    /// Strategy for imputing missing numeric values
    #[arg(long, value_enum, default_value = "median")]
    numeric_imputation: CliNumericImputation,

    /// Strategy for imputing missing text values
    #[arg(long, value_enum, default_value = "most-frequent")]
    categorical_imputation: CliCategoricalImputation,

    /// Drop rows outside the IQR fences
    #[arg(long)]
    remove_outliers: bool,

    /// Columns tested for outliers (comma-separated; default all numeric)
    #[arg(long, value_delimiter = ',')]
    outlier_columns: Option<Vec<String>>,

    /// IQR multiplier for outlier fences
    #[arg(long, default_value_t = DEFAULT_OUTLIER_K)]
    outlier_k: f64,

    /// Do not one-hot encode text columns
    #[arg(long)]
    no_one_hot: bool,

    /// Keep an indicator for every level instead of dropping the first
    #[arg(long)]
    keep_first_level: bool,

    /// Text columns with more distinct values are not encoded
    #[arg(long, default_value_t = DEFAULT_MAX_UNIQUE)]
    max_unique: usize,

    /// Z-score numeric columns
    #[arg(long)]
    scale: bool,

    /// Keep nulls as nulls during text standardization
    #[arg(long)]
    preserve_nulls: bool,
}

impl CleanArgs {
    fn to_config(&self) -> Result<CleaningConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Reading config {}", path.display()))?;
            let config: CleaningConfig = serde_json::from_str(&text)
                .with_context(|| format!("Parsing config {}", path.display()))?;
            config.validate()?;
            return Ok(config);
        }

        let mut builder = CleaningConfig::builder()
            .remove_duplicates(!self.no_dedup)
            .standardize_text(!self.no_standardize_text)
            .coerce_types(!self.no_coerce_types)
            .numeric_imputation(self.numeric_imputation.into())
            .categorical_imputation(self.categorical_imputation.into())
            .remove_outliers(self.remove_outliers)
            .outlier_k(self.outlier_k)
            .one_hot_encode(!self.no_one_hot)
            .drop_first(!self.keep_first_level)
            .max_unique(self.max_unique)
            .scale_numeric(self.scale);

        if let Some(cols) = &self.outlier_columns {
            builder = builder.outlier_columns(cols.iter().map(|c| c.trim()));
        }
        if self.preserve_nulls {
            builder = builder.text_null_policy(TextNullPolicy::Preserve);
        }

        Ok(builder.build()?)
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout only
/// carries the JSON result.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    // Load environment variables from .env file
    dotenv().ok();

    let result = match &cli.command {
        Command::Clean(args) => run_clean(args, cli.json),
        Command::Advise { input } => run_advise(input),
        Command::Sample { output, rows, seed } => run_sample(output, *rows, *seed),
        Command::Replay {
            input,
            report,
            output,
        } => run_replay(input, report, output, cli.json),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn load_input(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", path.display()));
    }
    info!("Loading dataset from: {}", path.display());
    let df = io::read_csv_latin1(path)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created output directory: {}", dir.display());
    }
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn run_clean(args: &CleanArgs, json_output: bool) -> Result<()> {
    let config = args.to_config()?;
    let data = load_input(&args.input)?;
    ensure_output_dir(&args.output)?;

    let outcome = Pipeline::new(config).run(&data)?;
    write_outcome(outcome, &args.input, &args.output, json_output)
}

fn run_replay(input: &Path, report_path: &Path, output: &Path, json_output: bool) -> Result<()> {
    let report = io::read_report(report_path)?;
    let data = load_input(input)?;
    ensure_output_dir(output)?;

    let outcome = replay(&data, &report)?;
    write_outcome(outcome, input, output, json_output)
}

fn write_outcome(
    mut outcome: CleaningOutcome,
    input: &Path,
    output_dir: &Path,
    json_output: bool,
) -> Result<()> {
    let stem = extract_file_stem(input);
    let data_path = output_dir.join(format!("{stem}_cleaned.csv"));
    io::write_csv(&mut outcome.data, &data_path)?;
    info!("Cleaned data written to: {}", data_path.display());

    if json_output {
        println!("{}", outcome.report.to_json_pretty()?);
        return Ok(());
    }

    let report_path = output_dir.join(format!("{stem}_report.json"));
    io::write_report(&outcome.report, &report_path)?;
    info!("Report written to: {}", report_path.display());

    print_summary(&outcome, &data_path, &report_path);
    Ok(())
}

fn run_advise(input: &Path) -> Result<()> {
    let data = load_input(input)?;
    let summary = DatasetSummary::from_frame(&data)?;
    let advisor = advisor_from_env();
    let advice = advise(&summary, advisor.as_ref());
    println!("{}", serde_json::to_string_pretty(&advice)?);
    Ok(())
}

fn run_sample(output: &Path, rows: usize, seed: u64) -> Result<()> {
    let mut df = sample_dataset(rows, seed)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_output_dir(parent)?;
    }
    io::write_csv(&mut df, output)?;
    info!("Sample dataset ({} rows, seed {}) written to: {}", rows, seed, output.display());
    Ok(())
}

/// Print the run summary.
///
/// Uses `println!` so the summary shows regardless of log level.
fn print_summary(outcome: &CleaningOutcome, data_path: &Path, report_path: &Path) {
    let report = &outcome.report;
    println!("{}", "=".repeat(60));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(60));
    for (i, step) in report.steps().iter().enumerate() {
        println!(
            "{:>2}. {:<22} {}",
            i + 1,
            step.action,
            serde_json::Value::Object(step.detail.clone())
        );
    }
    println!("{}", "-".repeat(60));
    println!("Rows removed:    {}", report.total_rows_removed());
    println!("Columns encoded: {}", report.encoded_columns().join(", "));
    println!("Columns scaled:  {}", report.scaled_columns().join(", "));
    println!(
        "Result shape:    {} rows x {} columns",
        outcome.data.height(),
        outcome.data.width()
    );
    println!("Cleaned data:    {}", data_path.display());
    println!("Report:          {}", report_path.display());
    println!("{}", "=".repeat(60));
}
