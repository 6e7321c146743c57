//! Counting Dashboard
//!
//! Serves the dashboard front end and relays counts from the counting
//! service to every connected browser over WebSocket.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  DASHBOARD                    │
//!                         │                                               │
//!    Browser  ── /ws ─────┼─▶ http::websocket ──▶ counting::client ───────┼──▶ Counting
//!             ◀─ JSON ────┼──  (one relay task       (GET, 2s deadline)   │    Service
//!                         │    per session)   │                           │
//!                         │                   ▼                           │
//!    Probes   ── /health ─┼─▶ health::handlers ◀── health::state          │
//!             ── /health/api                      (FailureTracker)        │
//!                         │                                               │
//!    Scraper  ── /metrics ┼─▶ observability::metrics                      │
//!    Browser  ── /*  ─────┼─▶ http::assets (embedded assets/)             │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::time::Duration;

use tokio::net::TcpListener;

use counting_dashboard::config::loader::{self, PORT_ENV, UPSTREAM_URL_ENV};
use counting_dashboard::http::HttpServer;
use counting_dashboard::lifecycle::{signals, Shutdown, StopReason};
use counting_dashboard::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = loader::load_from_env()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("counting-dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %format!("http://{}", config.listener.bind_address()),
        env = PORT_ENV,
        "Starting server (port set via environment)"
    );
    tracing::info!(
        upstream = %config.upstream.url,
        env = UPSTREAM_URL_ENV,
        "Using counting service (url set via environment)"
    );

    let shutdown = Shutdown::new();
    let mut server = HttpServer::new(config.clone(), shutdown.clone())?;

    if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                metrics::spawn_upkeep(handle.clone(), Duration::from_secs(5));
                server = server.with_metrics(handle);
            }
            Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger(StopReason::Signal);
    });

    server.run(listener).await?;

    tracing::info!(reason = ?shutdown.reason(), "Shutdown complete");
    Ok(())
}
