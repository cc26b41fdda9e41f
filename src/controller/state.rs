//! Refresh state machine types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::task::JoinHandle;

use crate::error::ErrorKind;

/// Where the refresh cycle currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight
    Fetching,
    /// The last fetch rendered successfully
    Displaying { stocks: usize },
    /// The last fetch, render or connectivity check failed
    Failed { error: ErrorKind },
}

/// What a call to `refresh` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Another fetch was already in flight
    Skipped,
    Displayed { stocks: usize },
    Failed { error: ErrorKind },
}

/// A view lifecycle notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Hidden,
    Visible,
    Online,
    Offline,
}

/// Mutable controller state, guarded by a single lock
#[derive(Debug)]
pub(crate) struct RefreshState {
    pub is_fetching: bool,
    pub phase: Phase,
    pub poll_timer: Option<JoinHandle<()>>,
    pub pending_resume: Option<JoinHandle<()>>,
    /// Views that last reported themselves visible
    pub visible_views: HashSet<String>,
    pub disposed: bool,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            is_fetching: false,
            phase: Phase::Idle,
            poll_timer: None,
            pending_resume: None,
            visible_views: HashSet::new(),
            disposed: false,
        }
    }
}

impl RefreshState {
    /// Abort the poll timer if one is running
    pub fn stop_timer(&mut self) -> bool {
        match self.poll_timer.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poll_timer
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn resume_pending(&self) -> bool {
        self.pending_resume
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort a scheduled resume refresh
    pub fn cancel_resume(&mut self) {
        if let Some(handle) = self.pending_resume.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshState {
    fn drop(&mut self) {
        self.stop_timer();
        self.cancel_resume();
    }
}
