//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Relay sessions (http/websocket.rs):
//!     Upstream fetch completes
//!     → state.rs record_outcome(success)
//!
//! Probes (handlers.rs):
//!     GET /health      → always 200
//!     GET /health/api  → state.rs status() → 200 "ok" | 503 "failures: N"
//! ```
//!
//! # Design Decisions
//! - One tracker per process, shared via Arc, no global singleton
//! - Liveness never consults the tracker
//! - Passive only: the dashboard never probes the upstream on its own

pub mod handlers;
pub mod state;

pub use state::{FailureStatus, FailureTracker};
