//! Input loaders: whole-file parsing into a [`Dataset`].
//!
//! Each loader reads the entire input eagerly; streaming inputs too large
//! for memory is out of scope. Parse failures are wrapped in
//! `SplitError::Load`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;

use super::InputFormat;
use crate::dataset::Dataset;
use crate::error::SplitError;

/// Loads the input file into a dataset using the loader registered for its
/// format.
///
/// # Errors
///
/// Returns `SplitError::Load` wrapping the underlying parse failure.
pub fn load_dataset(path: &Path, format: InputFormat) -> Result<Dataset, SplitError> {
    match format {
        InputFormat::Csv => load_delimited(path, b','),
        InputFormat::Tsv => load_delimited(path, b'\t'),
        InputFormat::Xlsx | InputFormat::Xls => load_workbook(path),
        InputFormat::Json => load_json(path),
    }
}

/// CSV/TSV loader. All cells stay strings; quoted fields may contain the
/// delimiter and newlines.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, SplitError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| SplitError::Load(format!("failed to open {}: {}", path.display(), e)))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| SplitError::Load(format!("failed to read header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            SplitError::Load(format!("failed to parse record {}: {}", index + 1, e))
        })?;
        rows.push(
            record
                .iter()
                .map(|field| Value::String(field.to_string()))
                .collect(),
        );
    }

    Ok(Dataset::new(columns, rows))
}

/// Excel loader (xlsx and legacy xls). Reads the first worksheet; the first
/// row is the header.
fn load_workbook(path: &Path) -> Result<Dataset, SplitError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SplitError::Load(format!("failed to open workbook: {}", e)))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => {
            range.map_err(|e| SplitError::Load(format!("failed to read worksheet: {}", e)))?
        }
        None => return Err(SplitError::Load("workbook has no worksheets".into())),
    };

    let mut row_iter = range.rows();
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = cell_to_header(cell);
                if name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    name
                }
            })
            .collect(),
        None => return Ok(Dataset::empty(Vec::new())),
    };

    let rows: Vec<Vec<Value>> = row_iter
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{:?}", e),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::DateTime(dt) => serde_json::Number::from_f64(dt.as_f64())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => {
            tracing::warn!(cell_error = ?e, "Worksheet cell carries an error value");
            Value::Null
        }
    }
}

/// JSON loader. Expects an array of flat record objects; columns are the
/// keys in first-encounter order, missing keys become null.
fn load_json(path: &Path) -> Result<Dataset, SplitError> {
    let file = File::open(path)
        .map_err(|e| SplitError::Load(format!("failed to open {}: {}", path.display(), e)))?;

    let root: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SplitError::Load(format!("invalid JSON: {}", e)))?;

    let records = match root {
        Value::Array(records) => records,
        other => {
            return Err(SplitError::Load(format!(
                "expected a JSON array of records, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
                objects.push(map);
            }
            other => {
                return Err(SplitError::Load(format!(
                    "record {} is not an object, found {}",
                    index + 1,
                    json_kind(&other)
                )))
            }
        }
    }

    let rows: Vec<Vec<Value>> = objects
        .into_iter()
        .map(|map| {
            columns
                .iter()
                .map(|column| map.get(column).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
