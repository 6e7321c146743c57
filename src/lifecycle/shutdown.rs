//! Shutdown coordination for the dashboard.
//!
//! The trigger is latched: a relay session that starts waiting after
//! shutdown began still sees it, so no session is left open while the
//! server drains.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// What started the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGTERM or Ctrl+C.
    Signal,
    /// Stopped from inside the process.
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Signal => write!(f, "signal received"),
            StopReason::Requested => write!(f, "shutdown requested"),
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// Clones share one latch. The server and every relay session wait on it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<StopReason>>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Start shutting down. Only the first reason is kept.
    pub fn trigger(&self, reason: StopReason) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    /// The reason, once triggered.
    pub fn reason(&self) -> Option<StopReason> {
        *self.tx.borrow()
    }

    /// Resolve once shutdown has been triggered, immediately if it already was.
    pub async fn triggered(&self) -> StopReason {
        let mut rx = self.tx.subscribe();
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or(StopReason::Requested),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => StopReason::Requested,
        };
        reason
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
