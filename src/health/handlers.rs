//! Health endpoints.
//!
//! - `GET /health`: liveness for infrastructure probes; never fails
//! - `GET /health/api`: connectivity between the dashboard and the counting service

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::health::state::FailureTracker;

/// Liveness check. Echoes the requested path.
pub async fn liveness(uri: Uri) -> (StatusCode, String) {
    (StatusCode::OK, format!("Hello, you've hit {}\n", uri.path()))
}

/// Connectivity check derived from the most recent upstream fetch.
pub async fn connectivity(State(tracker): State<Arc<FailureTracker>>) -> Response {
    let status = tracker.status();
    if status.is_healthy() {
        (StatusCode::OK, "ok").into_response()
    } else {
        tracing::debug!(failures = status.consecutive_failures, "Reporting upstream unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("failures: {}", status.consecutive_failures),
        )
            .into_response()
    }
}
