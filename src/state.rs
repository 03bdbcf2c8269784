//! Run-state tracking for the invoking shell.
//!
//! The run state is an explicit enum, and a session gate refuses to start a
//! second run while one is in flight. This is a state flag, not a true
//! mutex: the dataset and export configuration are never touched by the
//! invoker once handed to the worker.

use std::sync::Mutex;

use crate::progress::ProgressEvent;

/// Lifecycle of one split run as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
    Failed,
    Cancelled,
}

impl RunState {
    /// Maps a terminal progress event to its run state. Returns `None` for
    /// non-terminal events.
    pub fn from_terminal(event: &ProgressEvent) -> Option<RunState> {
        match event {
            ProgressEvent::Progress { .. } => None,
            ProgressEvent::Done { .. } => Some(RunState::Done),
            ProgressEvent::Cancelled { .. } => Some(RunState::Cancelled),
            ProgressEvent::Failed { .. } => Some(RunState::Failed),
        }
    }

    /// Whether a new run may start from this state.
    pub fn can_start(self) -> bool {
        self != RunState::Running
    }
}

/// Shell-side gate ensuring at most one run is in flight per session.
pub struct SplitSession {
    state: Mutex<RunState>,
}

impl SplitSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        *self.state.lock().expect("session state lock poisoned")
    }

    /// Transitions to `Running` if no run is in flight. Returns false (and
    /// leaves the state untouched) when a run is already active.
    pub fn try_begin(&self) -> bool {
        let mut state = self.state.lock().expect("session state lock poisoned");
        if state.can_start() {
            *state = RunState::Running;
            true
        } else {
            false
        }
    }

    /// Records the terminal state of the active run.
    pub fn finish(&self, terminal: RunState) {
        debug_assert!(
            matches!(
                terminal,
                RunState::Done | RunState::Failed | RunState::Cancelled
            ),
            "finish() takes a terminal state, got {:?}",
            terminal
        );
        *self.state.lock().expect("session state lock poisoned") = terminal;
    }
}

impl Default for SplitSession {
    fn default() -> Self {
        Self::new()
    }
}
