//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($DASHBOARD_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (PORT / COUNTING_SERVICE_URL / ASSETS_DIR / LOG_LEVEL overrides)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults so an empty environment is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{AssetsConfig, DashboardConfig, ListenerConfig, ObservabilityConfig, UpstreamConfig};
