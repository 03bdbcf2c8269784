//! In-memory tabular dataset.
//!
//! The whole input file is loaded once into a `Dataset`; it is read-only for
//! the remainder of the run and dropped when splitting completes. Cells are
//! JSON-typed values so spreadsheet and JSON inputs keep their number/bool
//! types while delimited inputs stay plain strings.

use serde_json::Value;

/// An ordered table of rows with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Creates a dataset from columns and rows. Loaders produce full-width
    /// rows, one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Dataset with columns but no rows (e.g. a header-only CSV).
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows in `[start, end)`. Callers clip `end` to the row count.
    pub fn row_range(&self, start: usize, end: usize) -> &[Vec<Value>] {
        &self.rows[start..end]
    }
}

/// Renders a cell for delimited/HTML output.
///
/// Strings are emitted verbatim (no quotes), null as the empty field, and
/// numbers/booleans in their canonical literal form. Nested arrays/objects
/// from irregular JSON inputs fall back to compact JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["name".into(), "age".into()],
            vec![
                vec![json!("Alice"), json!(30)],
                vec![json!("Bob"), json!(25)],
                vec![json!("Carol"), json!(41)],
            ],
        )
    }

    #[test]
    fn row_range_clips_to_requested_window() {
        let dataset = sample();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.row_range(1, 3).len(), 2);
        assert_eq!(dataset.row_range(0, 0).len(), 0);
    }

    #[test]
    fn empty_dataset_keeps_columns() {
        let dataset = Dataset::empty(vec!["id".into()]);
        assert_eq!(dataset.columns(), &["id".to_string()]);
        assert_eq!(dataset.row_count(), 0);
    }

    #[test]
    fn cell_text_rendering() {
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!("plain")), "plain");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(2.5)), "2.5");
        assert_eq!(cell_text(&json!(["a", 1])), "[\"a\",1]");
    }
}
