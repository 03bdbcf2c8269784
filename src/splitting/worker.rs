//! Background worker thread for one split run.
//!
//! Exactly two threads of control exist per run: the invoking context and
//! this worker. The worker owns the run; the invoker polls the event
//! receiver at its own cadence and may request cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver};

use super::plan::SplitPlan;
use super::runner::run_split;
use crate::error::SplitError;
use crate::progress::ProgressEvent;

/// Handle to a running split.
///
/// Owns the worker's join handle and the cancellation flag. Dropping the
/// handle requests cancellation and waits for the worker to stop (the chunk
/// in flight still completes; nothing is rolled back).
pub struct SplitWorker {
    cancel: Arc<AtomicBool>,
    events: Receiver<ProgressEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SplitWorker {
    /// Spawns the worker thread for a validated plan.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::Internal` if the OS refuses to spawn the thread.
    pub fn spawn(plan: SplitPlan) -> Result<Self, SplitError> {
        let (event_tx, event_rx) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = cancel.clone();

        let handle = thread::Builder::new()
            .name("split-worker".into())
            .spawn(move || {
                run_split(&plan, &event_tx, &cancel_flag);
            })
            .map_err(|e| SplitError::Internal(format!("failed to spawn worker thread: {}", e)))?;

        Ok(Self {
            cancel,
            events: event_rx,
            handle: Some(handle),
        })
    }

    /// The progress event receiver. Events arrive in production order; the
    /// terminal event is always last.
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Requests cooperative cancellation. The worker stops before writing
    /// the next chunk; chunks already on disk are kept.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Waits for the worker to finish and returns the undelivered events,
    /// ending with the terminal event.
    pub fn join(mut self) -> Vec<ProgressEvent> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

impl Drop for SplitWorker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Waiting for split worker to stop");
            let _ = handle.join();
        }
    }
}
