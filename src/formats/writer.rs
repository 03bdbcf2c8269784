//! Export writers with atomic chunk persistence.
//!
//! Each chunk is rendered fully in memory, written to a temporary file in
//! the output directory, then atomically renamed over the final path. A
//! failed or interrupted write never leaves a half-written chunk behind; an
//! existing file at the final path is overwritten (last write wins).

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tempfile::NamedTempFile;

use super::ExportFormat;
use crate::dataset::{cell_text, Dataset};
use crate::error::SplitError;

/// Writes rows `[start, end)` of the dataset to `path` in the given export
/// format.
///
/// # Errors
///
/// Returns `SplitError::Write` if serialization fails or the file cannot be
/// created, written, or renamed into place. The `xls` format always fails:
/// the legacy BIFF writer is not bundled.
pub fn write_chunk(
    dataset: &Dataset,
    start: usize,
    end: usize,
    path: &Path,
    format: ExportFormat,
) -> Result<(), SplitError> {
    let bytes = match format {
        ExportFormat::Csv => render_delimited(dataset, start, end, b',')?,
        ExportFormat::Tsv => render_delimited(dataset, start, end, b'\t')?,
        ExportFormat::Json => render_json(dataset, start, end)?,
        ExportFormat::Html => render_html(dataset, start, end).into_bytes(),
        ExportFormat::Xlsx => render_xlsx(dataset, start, end)?,
        ExportFormat::Xls => {
            return Err(SplitError::Write(
                "the legacy .xls (BIFF) writer is not bundled; export to xlsx instead".into(),
            ))
        }
    };

    let mut chunk_file = AtomicChunkFile::new(path)?;
    chunk_file.write_all(&bytes)?;
    chunk_file.persist()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderers
// ─────────────────────────────────────────────────────────────────────────────

/// CSV/TSV rendering. The header row is repeated in every chunk; no
/// row-index column is emitted.
fn render_delimited(
    dataset: &Dataset,
    start: usize,
    end: usize,
    delimiter: u8,
) -> Result<Vec<u8>, SplitError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(dataset.columns())
        .map_err(|e| SplitError::Write(format!("failed to serialize header: {}", e)))?;

    for row in dataset.row_range(start, end) {
        let fields: Vec<String> = row.iter().map(cell_text).collect();
        writer
            .write_record(&fields)
            .map_err(|e| SplitError::Write(format!("failed to serialize record: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| SplitError::Write(format!("failed to flush writer: {}", e.error())))
}

/// JSON rendering: one object per row, keyed by column name.
fn render_json(dataset: &Dataset, start: usize, end: usize) -> Result<Vec<u8>, SplitError> {
    let records: Vec<Value> = dataset
        .row_range(start, end)
        .iter()
        .map(|row| {
            let map: serde_json::Map<String, Value> = dataset
                .columns()
                .iter()
                .zip(row.iter())
                .map(|(column, cell)| (column.clone(), cell.clone()))
                .collect();
            Value::Object(map)
        })
        .collect();

    serde_json::to_vec(&records)
        .map_err(|e| SplitError::Write(format!("failed to serialize JSON records: {}", e)))
}

/// HTML rendering: a plain escaped `<table>` with thead/tbody.
fn render_html(dataset: &Dataset, start: usize, end: usize) -> String {
    let mut html = String::from("<table>\n<thead>\n<tr>");
    for column in dataset.columns() {
        html.push_str("<th>");
        html.push_str(&escape_html(column));
        html.push_str("</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in dataset.row_range(start, end) {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape_html(&cell_text(cell)));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// XLSX rendering via an in-memory workbook buffer.
fn render_xlsx(dataset: &Dataset, start: usize, end: usize) -> Result<Vec<u8>, SplitError> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| {
        SplitError::Write(format!("failed to build workbook: {}", e))
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in dataset.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, column)
            .map_err(xlsx_err)?;
    }

    for (row_offset, row) in dataset.row_range(start, end).iter().enumerate() {
        let row_num = (row_offset + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col_num = col as u16;
            match cell {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(xlsx_err)?;
                }
                Value::Number(n) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row_num, col_num, f).map_err(xlsx_err)?;
                    }
                    None => {
                        worksheet
                            .write_string(row_num, col_num, &n.to_string())
                            .map_err(xlsx_err)?;
                    }
                },
                Value::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(xlsx_err)?;
                }
                other => {
                    worksheet
                        .write_string(row_num, col_num, &cell_text(other))
                        .map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomic persistence
// ─────────────────────────────────────────────────────────────────────────────

/// Writes chunk bytes to a temporary file in the destination directory, then
/// atomically renames it over the final path on `persist()`. If dropped
/// before persisting, the temporary file is cleaned up automatically.
struct AtomicChunkFile {
    temp: NamedTempFile,
    final_path: PathBuf,
}

impl AtomicChunkFile {
    /// The temporary file is created in the same directory as `final_path`
    /// (rename requires the same filesystem).
    fn new(final_path: &Path) -> Result<Self, SplitError> {
        let parent_dir = final_path.parent().ok_or_else(|| {
            SplitError::Write(format!(
                "cannot determine parent directory for {}",
                final_path.display()
            ))
        })?;

        let temp = NamedTempFile::new_in(parent_dir).map_err(|e| {
            SplitError::Write(format!(
                "failed to create temporary file in {}: {}",
                parent_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            temp,
            final_path: final_path.to_path_buf(),
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SplitError> {
        self.temp
            .write_all(bytes)
            .map_err(|e| SplitError::Write(format!("failed to write chunk data: {}", e)))
    }

    fn persist(self) -> Result<PathBuf, SplitError> {
        let final_path = self.final_path;
        self.temp.persist(&final_path).map_err(|e| {
            SplitError::Write(format!(
                "failed to persist chunk to {}: {}",
                final_path.display(),
                e.error
            ))
        })?;
        Ok(final_path)
    }
}
