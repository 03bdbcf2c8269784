//! Splitter core: request validation, chunk planning, the sequential run
//! loop, and the background worker that executes it.

mod plan;
mod runner;
mod worker;

pub use plan::{chunk_specs, chunk_suffix, ChunkSpec, SplitPlan, SplitRequest};
pub use runner::run_split;
pub use worker::SplitWorker;
