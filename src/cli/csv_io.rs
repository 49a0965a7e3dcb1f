//! Two-column CSV input and serde-driven CSV output.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Read the first two columns of a headed CSV file as numbers.
pub fn read_columns(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    parse_columns(file).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse the first two columns of headed CSV data as numbers.
///
/// Blank lines are skipped; anything else that is not two numbers is an error
/// naming the offending line.
pub fn parse_columns<R: Read>(input: R) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let mut first = Vec::new();
    let mut second = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.context("Malformed CSV record")?;
        let line = i + 2;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            bail!("Line {}: expected 2 columns, found {}", line, record.len());
        }
        first.push(parse_number(&record[0], line)?);
        second.push(parse_number(&record[1], line)?);
    }

    Ok((first, second))
}

fn parse_number(field: &str, line: usize) -> Result<f64> {
    field
        .parse::<f64>()
        .with_context(|| format!("Line {}: '{}' is not a number", line, field))
}

/// Write records to a CSV file, header taken from the field names.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    for record in records {
        writer.serialize(record).context("Failed to write CSV record")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Render records as CSV text.
pub fn records_to_string<T: Serialize>(records: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record).context("Failed to write CSV record")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
