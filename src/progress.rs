//! Progress events delivered from the worker thread to the invoking shell.
//!
//! Events travel over an unbounded, order-preserving channel. Per run, zero
//! or more `Progress` events are followed by exactly one terminal event
//! (`Done`, `Cancelled`, or `Failed`), always last.

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// A single progress or terminal event for one split run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// Rows written so far out of the dataset total. `rows_done` is
    /// monotonically non-decreasing; the final `Progress` equals the total.
    Progress { rows_done: usize, rows_total: usize },
    /// The run completed; all chunks are on disk.
    Done { chunks: usize },
    /// The run stopped at a cancellation checkpoint. Chunks written before
    /// the checkpoint remain on disk.
    Cancelled { chunks: usize },
    /// The run aborted. Chunks written before the failure remain on disk.
    Failed { message: String },
}

impl ProgressEvent {
    /// Returns true for `Done`, `Cancelled`, and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }

    /// Builds the terminal event for a finished run.
    pub(crate) fn from_outcome(outcome: Result<usize, SplitError>, chunks_written: usize) -> Self {
        match outcome {
            Ok(chunks) => ProgressEvent::Done { chunks },
            Err(SplitError::Cancelled) => ProgressEvent::Cancelled {
                chunks: chunks_written,
            },
            Err(err) => ProgressEvent::Failed {
                message: err.to_string(),
            },
        }
    }
}
