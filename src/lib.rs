//! Counting Dashboard Library

pub mod config;
pub mod counting;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::DashboardConfig;
pub use counting::{Count, CountClient};
pub use health::FailureTracker;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
