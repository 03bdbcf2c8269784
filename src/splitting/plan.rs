//! Split request validation and chunk planning.
//!
//! All parameter checks happen here, before any file I/O and before the
//! worker thread is spawned; a `SplitPlan` is proof that the parameters were
//! accepted.

use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::formats::{ExportFormat, InputFormat};

/// Raw parameters as collected by the shell.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// Input file; extension selects the loader.
    pub input_path: PathBuf,
    /// Directory receiving the chunk files.
    pub output_dir: PathBuf,
    /// Rows per chunk.
    pub chunk_size: usize,
    /// Digit-only template; its length is the zero-padding width for the
    /// 1-based chunk index (e.g. `"001"` → `_001`, `_002`, …).
    pub number_format: String,
    /// Target export format.
    pub export: ExportFormat,
}

impl SplitRequest {
    /// Validates the request and derives the plan.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` if the input file is missing or its extension is
    /// not recognized; `InvalidParameter` for a non-positive chunk size, a
    /// malformed number template, an empty output directory, or an export
    /// format the input cannot target.
    pub fn validate(self) -> Result<SplitPlan, SplitError> {
        if self.chunk_size == 0 {
            return Err(SplitError::InvalidParameter(
                "chunk size must be a positive number of rows".into(),
            ));
        }

        if self.number_format.is_empty()
            || !self.number_format.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(SplitError::InvalidParameter(format!(
                "number format template must contain only digits, got {:?}",
                self.number_format
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(SplitError::InvalidParameter(
                "output directory must not be empty".into(),
            ));
        }

        let input_format = InputFormat::from_path(&self.input_path)?;

        if !input_format.supports(self.export) {
            return Err(SplitError::InvalidParameter(format!(
                "export format {} is not available for {} input (choose one of: {})",
                self.export,
                input_format,
                format_list(input_format.compatible_exports())
            )));
        }

        let base_name = self
            .input_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                SplitError::InvalidParameter(format!(
                    "input file name is not valid UTF-8: {}",
                    self.input_path.display()
                ))
            })?;

        Ok(SplitPlan {
            input_path: self.input_path,
            output_dir: self.output_dir,
            chunk_size: self.chunk_size,
            pad_width: self.number_format.len(),
            input_format,
            export: self.export,
            base_name,
        })
    }
}

fn format_list(formats: &[ExportFormat]) -> String {
    formats
        .iter()
        .map(|f| f.id())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated split request.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub pad_width: usize,
    pub input_format: InputFormat,
    pub export: ExportFormat,
    base_name: String,
}

impl SplitPlan {
    /// Output path for the chunk with the given 0-based index:
    /// `{base}_{zero-padded index+1}{export extension}` under the output
    /// directory.
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}{}",
            self.base_name,
            chunk_suffix(index, self.pad_width),
            self.export.extension()
        ))
    }
}

/// One contiguous row-range of the dataset, written as one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    /// 0-based chunk index.
    pub index: usize,
    /// First row (inclusive).
    pub start: usize,
    /// One past the last row; already clipped to the dataset's row count.
    pub end: usize,
}

impl ChunkSpec {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Enumerates chunk specs for `total` rows in strictly increasing offset
/// order. An empty dataset yields no chunks.
pub fn chunk_specs(total: usize, chunk_size: usize) -> impl Iterator<Item = ChunkSpec> {
    debug_assert!(chunk_size > 0, "chunk_size is validated before planning");
    (0..total).step_by(chunk_size.max(1)).enumerate().map(
        move |(index, start)| ChunkSpec {
            index,
            start,
            end: (start + chunk_size).min(total),
        },
    )
}

/// The 1-based chunk index, left-padded with zeros to `width` digits.
/// Indexes wider than the template are not truncated.
pub fn chunk_suffix(index: usize, width: usize) -> String {
    format!("{:0width$}", index + 1, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request_for(dir: &TempDir, export: ExportFormat) -> SplitRequest {
        let input = dir.path().join("orders.csv");
        fs::write(&input, "id\n1\n2\n").expect("Failed to write fixture");
        SplitRequest {
            input_path: input,
            output_dir: dir.path().to_path_buf(),
            chunk_size: 1000,
            number_format: "001".into(),
            export,
        }
    }

    #[test]
    fn valid_request_produces_plan() {
        let dir = TempDir::new().unwrap();
        let plan = request_for(&dir, ExportFormat::Csv).validate().unwrap();

        assert_eq!(plan.pad_width, 3);
        assert_eq!(plan.input_format, InputFormat::Csv);
        assert_eq!(
            plan.chunk_path(0),
            dir.path().join("orders_001.csv"),
            "First chunk is numbered 001"
        );
        assert_eq!(plan.chunk_path(11), dir.path().join("orders_012.csv"));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut request = request_for(&dir, ExportFormat::Csv);
        request.chunk_size = 0;

        assert!(matches!(
            request.validate(),
            Err(SplitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn non_digit_template_is_rejected() {
        let dir = TempDir::new().unwrap();
        for template in ["0a1", "", " 01", "1.0"] {
            let mut request = request_for(&dir, ExportFormat::Csv);
            request.number_format = template.into();
            assert!(
                matches!(request.validate(), Err(SplitError::InvalidParameter(_))),
                "Template {:?} must be rejected",
                template
            );
        }
    }

    #[test]
    fn empty_output_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut request = request_for(&dir, ExportFormat::Csv);
        request.output_dir = PathBuf::new();

        assert!(matches!(
            request.validate(),
            Err(SplitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn incompatible_export_is_rejected_with_alternatives() {
        let dir = TempDir::new().unwrap();
        // xls is only reachable from Excel inputs.
        match request_for(&dir, ExportFormat::Xls).validate() {
            Err(SplitError::InvalidParameter(msg)) => {
                assert!(msg.contains("xls"));
                assert!(msg.contains("csv"), "Message should list valid targets");
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn missing_input_is_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let mut request = request_for(&dir, ExportFormat::Csv);
        request.input_path = dir.path().join("absent.csv");

        assert!(matches!(
            request.validate(),
            Err(SplitError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn chunk_enumeration_covers_all_rows_in_order() {
        let specs: Vec<ChunkSpec> = chunk_specs(7, 3).collect();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0], ChunkSpec { index: 0, start: 0, end: 3 });
        assert_eq!(specs[1], ChunkSpec { index: 1, start: 3, end: 6 });
        assert_eq!(specs[2], ChunkSpec { index: 2, start: 6, end: 7 });
        assert_eq!(specs[2].len(), 1, "Final chunk is clipped to the total");
    }

    #[test]
    fn chunk_enumeration_edge_cases() {
        assert_eq!(chunk_specs(0, 5).count(), 0, "Empty dataset yields no chunks");

        let single: Vec<ChunkSpec> = chunk_specs(4, 10).collect();
        assert_eq!(single.len(), 1, "total <= chunk_size is one chunk");
        assert_eq!(single[0].len(), 4);
        assert!(!single[0].is_empty());

        let exact: Vec<ChunkSpec> = chunk_specs(6, 3).collect();
        assert_eq!(exact.len(), 2);
        assert_eq!(exact[1].len(), 3);
    }

    #[test]
    fn suffix_padding() {
        assert_eq!(chunk_suffix(0, 3), "001");
        assert_eq!(chunk_suffix(4, 4), "0005");
        assert_eq!(chunk_suffix(2, 1), "3");
        // Wider indexes than the template are kept intact.
        assert_eq!(chunk_suffix(999, 2), "1000");
    }
}
