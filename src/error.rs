use thiserror::Error;

/// User-friendly error presentation for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresentation {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

/// Application-wide error type.
///
/// All parameter validation errors are raised before the worker thread is
/// spawned; `Load`/`Write` surface during a run and terminate it.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Validation ────────────────────────────────────────────────────────────
    #[error("Unsupported input: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ── Run-time ──────────────────────────────────────────────────────────────
    #[error("Failed to load input file: {0}")]
    Load(String),

    #[error("Failed to write chunk: {0}")]
    Write(String),

    #[error("Operation cancelled")]
    Cancelled,

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SplitError {
    /// Converts the error into a user-friendly presentation suitable for
    /// shell display.
    pub fn to_presentation(&self) -> ErrorPresentation {
        match self {
            SplitError::UnsupportedFormat(msg) => ErrorPresentation {
                title: "Unsupported File Format".into(),
                message: format!("The input file cannot be processed: {}", msg),
                action: Some("Select a .csv, .tsv, .xlsx, .xls, or .json file".into()),
            },

            SplitError::InvalidParameter(msg) => ErrorPresentation {
                title: "Invalid Parameter".into(),
                message: msg.clone(),
                action: Some("Check the split parameters and try again".into()),
            },

            SplitError::Load(msg) => ErrorPresentation {
                title: "Load Failed".into(),
                message: format!("The input file could not be parsed: {}", msg),
                action: Some("Verify the file is well-formed".into()),
            },

            SplitError::Write(msg) => ErrorPresentation {
                title: "Write Failed".into(),
                message: format!("Error while writing a chunk: {}", msg),
                action: Some("Check the output directory and free disk space".into()),
            },

            SplitError::Cancelled => ErrorPresentation {
                title: "Cancelled".into(),
                message: "The split was cancelled. Chunks already written remain on disk.".into(),
                action: None,
            },

            SplitError::Internal(_) => ErrorPresentation {
                title: "Unexpected Error".into(),
                message: "Something went wrong. Please try again.".into(),
                action: Some("Try again".into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns all SplitError variants for exhaustive testing.
    fn all_variants() -> Vec<SplitError> {
        vec![
            SplitError::UnsupportedFormat("unrecognized extension: .dat".into()),
            SplitError::InvalidParameter("chunk size must be positive".into()),
            SplitError::Load("CSV parse error at line 3".into()),
            SplitError::Write("disk full".into()),
            SplitError::Cancelled,
            SplitError::Internal("thread spawn failed".into()),
        ]
    }

    #[test]
    fn all_variants_have_nonempty_title_and_message() {
        for variant in all_variants() {
            let presentation = variant.to_presentation();
            assert!(
                !presentation.title.trim().is_empty(),
                "Empty title for {:?}",
                variant
            );
            assert!(
                !presentation.message.trim().is_empty(),
                "Empty message for {:?}",
                variant
            );
        }
    }

    #[test]
    fn validation_errors_suggest_a_fix() {
        let actionable = vec![
            SplitError::UnsupportedFormat("no such file".into()),
            SplitError::InvalidParameter("bad template".into()),
        ];

        for variant in actionable {
            let presentation = variant.to_presentation();
            assert!(
                presentation.action.is_some(),
                "Expected action for {:?}, got None",
                variant
            );
        }
    }

    #[test]
    fn cancelled_mentions_kept_chunks() {
        let presentation = SplitError::Cancelled.to_presentation();
        assert!(
            presentation.message.to_lowercase().contains("remain"),
            "Cancellation message should state that written chunks are kept"
        );
    }

    #[test]
    fn internal_error_hides_details() {
        let presentation = SplitError::Internal("secret internals".into()).to_presentation();
        assert!(
            !presentation.message.contains("secret internals"),
            "Internal details should not reach the user"
        );
    }
}
