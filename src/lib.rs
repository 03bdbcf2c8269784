//! tablesplit — split tabular data files into fixed-size row chunks.
//!
//! A loaded [`dataset::Dataset`] is partitioned into successive chunks of a
//! fixed row count; each chunk is written as a separate file named
//! `{base}_{index}{ext}`, with the 1-based index zero-padded to a template
//! width. A background [`splitting::SplitWorker`] executes the run and
//! reports [`progress::ProgressEvent`]s over an unbounded channel that the
//! invoking shell polls at its own cadence.
//!
//! ```no_run
//! use tablesplit::{ProgressEvent, SplitRequest, SplitWorker};
//!
//! # fn main() -> Result<(), tablesplit::SplitError> {
//! let plan = SplitRequest {
//!     input_path: "orders.csv".into(),
//!     output_dir: "out".into(),
//!     chunk_size: 1000,
//!     number_format: "001".into(),
//!     export: "csv".parse()?,
//! }
//! .validate()?;
//!
//! let worker = SplitWorker::spawn(plan)?;
//! for event in worker.events().iter() {
//!     match event {
//!         ProgressEvent::Progress { rows_done, rows_total } => {
//!             println!("{}/{}", rows_done, rows_total);
//!         }
//!         terminal => {
//!             println!("{:?}", terminal);
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod error;
pub mod formats;
pub mod progress;
pub mod splitting;
pub mod state;

pub use dataset::Dataset;
pub use error::{ErrorPresentation, SplitError};
pub use formats::{ExportFormat, InputFormat};
pub use progress::ProgressEvent;
pub use splitting::{SplitPlan, SplitRequest, SplitWorker};
pub use state::{RunState, SplitSession};
