//! HTTP front door.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, tracing layer)
//!         /ws          → websocket.rs (upgrade, relay loop)
//!         /health      → health::handlers::liveness
//!         /health/api  → health::handlers::connectivity
//!         /metrics     → Prometheus render
//!         everything else → assets.rs (embedded files, or ServeDir override)
//! ```

pub mod assets;
pub mod server;
pub mod websocket;

pub use server::{AppState, HttpServer, ServerError};
