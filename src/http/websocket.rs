//! WebSocket relay between dashboard clients and the counting service.
//!
//! # Responsibilities
//! - Accept upgrade requests on `/ws`
//! - Per session: wait for a trigger, fetch the count, record the outcome,
//!   reply with one JSON text message
//! - End the session on close, read error or write error
//!
//! # Session States
//! ```text
//! Connected → (WaitingForClientMessage → Fetching → Responding)* → Closed
//! ```
//!
//! # Design Decisions
//! - Any text or binary payload is a trigger; its content is ignored
//! - Ping/pong are control traffic and never trigger a fetch
//! - Close codes 1000 and 1001 end a session quietly; every other ending is
//!   logged as unexpected
//! - Upstream failures become a degraded count, never a protocol error
//! - No broadcast: a session only ever writes to its own client

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{close_code, rejection::WebSocketUpgradeRejection, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::{IntoResponse, Response},
};

use crate::counting::Count;
use crate::http::server::AppState;
use crate::net::{local_hostname, SessionId};
use crate::observability::metrics;

/// Entry point for `GET /ws`.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(peer = %peer, error = %rejection, "WebSocket upgrade error");
            return rejection.into_response();
        }
    };

    ws.on_failed_upgrade(move |e| {
        tracing::warn!(peer = %peer, error = %e, "WebSocket upgrade error");
    })
    .on_upgrade(move |socket| relay(socket, peer, state))
}

/// How a session's read side ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Client sent a close frame, with its code if it had one.
    Closed(Option<u16>),
    /// Stream ended without a close frame.
    Dropped,
    /// Transport or protocol error while reading.
    ReadError(String),
}

impl SessionEnd {
    /// Normal closure and going-away are the only expected endings.
    pub fn is_expected(&self) -> bool {
        matches!(self, SessionEnd::Closed(Some(code)) if is_expected_close(*code))
    }
}

pub fn is_expected_close(code: u16) -> bool {
    code == close_code::NORMAL || code == close_code::AWAY
}

/// Classification of one inbound read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inbound {
    Trigger,
    Control,
    End(SessionEnd),
}

fn classify(inbound: Option<Result<Message, axum::Error>>) -> Inbound {
    match inbound {
        Some(Ok(Message::Text(_))) | Some(Ok(Message::Binary(_))) => Inbound::Trigger,
        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => Inbound::Control,
        Some(Ok(Message::Close(frame))) => Inbound::End(SessionEnd::Closed(frame.map(|f| f.code))),
        Some(Err(e)) => Inbound::End(SessionEnd::ReadError(e.to_string())),
        None => Inbound::End(SessionEnd::Dropped),
    }
}

async fn relay(mut socket: WebSocket, peer: SocketAddr, state: AppState) {
    let session = state.sessions.track();
    let session_id = session.id();
    let hostname = local_hostname();

    tracing::info!(session_id = %session_id, peer = %peer, hostname = %hostname, "New WebSocket client connected");

    loop {
        let inbound = tokio::select! {
            inbound = socket.recv() => inbound,
            reason = state.shutdown.triggered() => {
                let frame = CloseFrame {
                    code: close_code::AWAY,
                    reason: Utf8Bytes::from(format!("server shutting down: {}", reason)),
                };
                let _ = socket.send(Message::Close(Some(frame))).await;
                tracing::debug!(session_id = %session_id, reason = %reason, "Closing session for shutdown");
                break;
            }
        };

        match classify(inbound) {
            Inbound::Trigger => {}
            Inbound::Control => continue,
            Inbound::End(end) => {
                log_session_end(session_id, peer, &end);
                break;
            }
        }

        let count = fetch_count(&state, session_id).await.with_dashboard_hostname(hostname.as_str());
        tracing::info!(session_id = %session_id, count = count.count, "Fetched count");

        let payload = match serde_json::to_string(&count) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Failed to serialize count");
                break;
            }
        };

        if let Err(e) = socket.send(Message::Text(payload.into())).await {
            tracing::warn!(session_id = %session_id, peer = %peer, error = %e, "WebSocket write error");
            break;
        }
    }

    tracing::info!(session_id = %session_id, peer = %peer, "WebSocket client disconnected");
}

/// Fetch once, record the outcome, and degrade failures into a sentinel count.
async fn fetch_count(state: &AppState, session_id: SessionId) -> Count {
    match state.counter.fetch().await {
        Ok(count) => {
            let status = state.tracker.record_success();
            metrics::record_consecutive_failures(status.consecutive_failures);
            count
        }
        Err(e) => {
            let status = state.tracker.record_failure();
            metrics::record_consecutive_failures(status.consecutive_failures);
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                consecutive_failures = status.consecutive_failures,
                "Counting service unreachable"
            );
            Count::unreachable(&e)
        }
    }
}

fn log_session_end(session_id: SessionId, peer: SocketAddr, end: &SessionEnd) {
    if end.is_expected() {
        tracing::debug!(session_id = %session_id, peer = %peer, end = ?end, "WebSocket closed by client");
    } else {
        tracing::warn!(session_id = %session_id, peer = %peer, end = ?end, "WebSocket read error");
    }
}
