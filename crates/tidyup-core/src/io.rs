//! Loading and saving tables and reports.

use crate::error::{CleaningError, Result, ResultExt};
use crate::reporting::CleaningReport;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Rows sampled when inferring column types.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// Cell texts read as missing.
const NULL_TOKENS: [&str; 9] = ["NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "<NA>", "#N/A"];

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of the same
/// value, so decoding never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse delimited text with a header row.
pub fn read_csv_str(text: &str) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|s| (*s).into()).collect());
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;
    Ok(df)
}

/// Load a Latin-1 encoded CSV file.
pub fn read_csv_latin1(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(CleaningError::from)
        .context(format!("Reading {}", path.display()))?;
    let df = read_csv_str(&decode_latin1(&bytes)).context(format!("Parsing {}", path.display()))?;
    debug!("Loaded {:?} from {}", df.shape(), path.display());
    Ok(df)
}

/// Write a table as comma-separated UTF-8 with a header row.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Writing {}", path.display()))?;
    debug!("Wrote {:?} to {}", df.shape(), path.display());
    Ok(())
}

/// Write a report as pretty-printed JSON.
pub fn write_report(report: &CleaningReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, report.to_json_pretty()?)?;
    debug!("Wrote report to {}", path.display());
    Ok(())
}

/// Load a report written by [`write_report`].
pub fn read_report(path: impl AsRef<Path>) -> Result<CleaningReport> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    CleaningReport::from_json(&text).context(format!("Parsing report {}", path.display()))
}
