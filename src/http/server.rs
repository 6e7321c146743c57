//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Dispatch `/ws`, `/health`, `/health/api`, `/metrics`, static assets
//! - Serve until the shutdown coordinator fires

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::DashboardConfig;
use crate::counting::{ClientBuildError, CountClient};
use crate::health::handlers::{connectivity, liveness};
use crate::health::FailureTracker;
use crate::http::assets::AssetSource;
use crate::http::websocket::ws_handler;
use crate::lifecycle::Shutdown;
use crate::net::SessionTracker;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: CountClient,
    pub tracker: Arc<FailureTracker>,
    pub sessions: SessionTracker,
    pub shutdown: Shutdown,
    pub metrics: Option<PrometheusHandle>,
}

impl FromRef<AppState> for Arc<FailureTracker> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tracker)
    }
}

/// Errors building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientBuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the dashboard.
pub struct HttpServer {
    state: AppState,
    assets: AssetSource,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: DashboardConfig, shutdown: Shutdown) -> Result<Self, ServerError> {
        let counter = CountClient::new(&config.upstream)?;
        let assets = AssetSource::resolve(config.assets.dir.as_deref());

        let state = AppState {
            counter,
            tracker: Arc::new(FailureTracker::new()),
            sessions: SessionTracker::new(),
            shutdown,
            metrics: None,
        };

        Ok(Self { state, assets })
    }

    /// Expose the Prometheus handle at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state.metrics = Some(handle);
        self
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        let routes = Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(liveness))
            .route("/health/api", get(connectivity))
            .route("/metrics", get(metrics_handler));

        self.assets
            .attach(routes)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.state.counter.target(),
            assets = %self.assets,
            "HTTP server starting"
        );

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        let shutdown = self.state.shutdown.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let reason = shutdown.triggered().await;
                tracing::info!(reason = %reason, "Shutting down HTTP server");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Shared failure tracker, for inspection.
    pub fn failure_tracker(&self) -> Arc<FailureTracker> {
        Arc::clone(&self.state.tracker)
    }

    /// Session tracker, for inspection.
    pub fn sessions(&self) -> SessionTracker {
        self.state.sessions.clone()
    }
}

/// Prometheus exposition for `GET /metrics`.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
