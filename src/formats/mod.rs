//! Format registry: input loaders, export writers, and the compatibility
//! table between them.
//!
//! Both sides are closed enums dispatched with `match` tables, so adding a
//! format without wiring every table is a compile error. Delimited inputs
//! cannot target the legacy Excel writer, Excel inputs cannot target
//! html/tsv, and JSON inputs target only json/csv/xlsx.

mod loader;
mod writer;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::SplitError;

pub use loader::load_dataset;
pub use writer::write_chunk;

// ─────────────────────────────────────────────────────────────────────────────
// Input formats
// ─────────────────────────────────────────────────────────────────────────────

/// Recognized input file formats, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
    Xls,
    Tsv,
    Json,
}

impl InputFormat {
    /// Detects the input format from a file path's extension
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `SplitError::UnsupportedFormat` if the file does not exist or
    /// its extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self, SplitError> {
        if !path.is_file() {
            return Err(SplitError::UnsupportedFormat(format!(
                "no such input file: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "xlsx" => Ok(InputFormat::Xlsx),
            "xls" => Ok(InputFormat::Xls),
            "tsv" => Ok(InputFormat::Tsv),
            "json" => Ok(InputFormat::Json),
            "" => Err(SplitError::UnsupportedFormat(format!(
                "file has no extension: {}",
                path.display()
            ))),
            other => Err(SplitError::UnsupportedFormat(format!(
                "unrecognized input extension: .{}",
                other
            ))),
        }
    }

    /// Export formats this input may target, in presentation order.
    pub fn compatible_exports(self) -> &'static [ExportFormat] {
        use ExportFormat::*;
        match self {
            InputFormat::Csv => &[Csv, Xlsx, Json, Html, Tsv],
            InputFormat::Xlsx | InputFormat::Xls => &[Csv, Xlsx, Xls, Json],
            InputFormat::Tsv => &[Csv, Tsv, Json],
            InputFormat::Json => &[Json, Csv, Xlsx],
        }
    }

    /// Whether `export` is a valid target for this input.
    pub fn supports(self, export: ExportFormat) -> bool {
        self.compatible_exports().contains(&export)
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Csv => "csv",
            InputFormat::Xlsx => "xlsx",
            InputFormat::Xls => "xls",
            InputFormat::Tsv => "tsv",
            InputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export formats
// ─────────────────────────────────────────────────────────────────────────────

/// Export format ids, each with a fixed output extension and fixed write
/// options (no row-index column, tab delimiter for tsv, one record per row
/// for json).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Xls,
    Tsv,
    Json,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Csv,
        ExportFormat::Xlsx,
        ExportFormat::Xls,
        ExportFormat::Tsv,
        ExportFormat::Json,
        ExportFormat::Html,
    ];

    /// The registry id, as accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Xls => "xls",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }

    /// Fixed output file extension, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Xlsx => ".xlsx",
            ExportFormat::Xls => ".xls",
            ExportFormat::Tsv => ".tsv",
            ExportFormat::Json => ".json",
            ExportFormat::Html => ".html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExportFormat {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.id() == id)
            .ok_or_else(|| {
                SplitError::InvalidParameter(format!("unknown export format: {}", s))
            })
    }
}
