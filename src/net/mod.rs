//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Upgraded WebSocket
//!     → identity.rs (local hostname, resolved once per session)
//!     → connection.rs (session ID, active-session accounting)
//!     → Hand off to relay loop
//! ```
//!
//! # Design Decisions
//! - Each session tracked by an RAII guard so every exit path releases it
//! - Hostname lookup failure degrades to a placeholder, never aborts a session

pub mod connection;
pub mod identity;

pub use connection::{SessionGuard, SessionId, SessionTracker};
pub use identity::local_hostname;
