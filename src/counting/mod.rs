//! Upstream counting service integration.
//!
//! # Data Flow
//! ```text
//! relay trigger
//!     → client.rs (GET counting service, 2s deadline)
//!     → types.rs (decode Count | FetchError)
//!     → relay converts FetchError into a degraded Count
//! ```

pub mod client;
pub mod types;

pub use client::{ClientBuildError, CountClient};
pub use types::{Count, FetchError, UNREACHABLE_COUNT, UNREACHABLE_HOSTNAME};
