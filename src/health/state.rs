//! Upstream failure tracking.
//!
//! # States
//! - `latest == true`: most recent fetch (from any session) succeeded
//! - `latest == false`: most recent fetch failed, or nothing observed yet
//!
//! # State Transitions
//! ```text
//! success → latest = true,  consecutive_failures = 0
//! failure → latest = false, consecutive_failures += 1 (saturating)
//! ```
//!
//! # Design Decisions
//! - Both fields live in one `Copy` struct behind one lock, so readers never
//!   see a pair written by two different updates
//! - The signal is global and best-effort: whichever fetch finished last wins
//! - Lock is never held across an `.await`

use std::sync::{PoisonError, RwLock};

/// Snapshot of the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureStatus {
    /// Outcome of the most recent upstream attempt.
    pub latest: bool,
    /// Failures since the last success.
    pub consecutive_failures: u64,
}

impl FailureStatus {
    pub fn is_healthy(&self) -> bool {
        self.latest
    }
}

/// Shared record of upstream fetch outcomes.
#[derive(Debug, Default)]
pub struct FailureTracker {
    state: RwLock<FailureStatus>,
}

impl FailureTracker {
    /// Create a tracker in the initial "unknown, unhealthy" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fetch outcome and return the state it produced.
    pub fn record_outcome(&self, success: bool) -> FailureStatus {
        // The guarded value is plain data; a panicked writer cannot leave it half-updated.
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.latest = success;
        if success {
            state.consecutive_failures = 0;
        } else {
            state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        }
        *state
    }

    pub fn record_success(&self) -> FailureStatus {
        self.record_outcome(true)
    }

    pub fn record_failure(&self) -> FailureStatus {
        self.record_outcome(false)
    }

    /// Consistent copy of the current state.
    pub fn status(&self) -> FailureStatus {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
