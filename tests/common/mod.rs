//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use counting_dashboard::config::DashboardConfig;
use counting_dashboard::health::FailureTracker;
use counting_dashboard::net::SessionTracker;
use counting_dashboard::lifecycle::StopReason;
use counting_dashboard::{Count, HttpServer, Shutdown};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a programmable mock counting service on an ephemeral port.
///
/// The closure returns the status code and body of each response.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Mock counting service that always answers with the same body.
pub async fn start_mock_upstream(body: &'static str) -> SocketAddr {
    start_programmable_upstream(move || async move { (200, body.to_string()) }).await
}

/// Accepts connections and never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A dashboard running on an ephemeral port.
pub struct TestDashboard {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub tracker: Arc<FailureTracker>,
    pub sessions: SessionTracker,
}

impl TestDashboard {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("WebSocket handshake failed");
        ws
    }
}

impl Drop for TestDashboard {
    fn drop(&mut self) {
        self.shutdown.trigger(StopReason::Requested);
    }
}

/// Start a dashboard pointed at `upstream`.
pub async fn start_dashboard(upstream: SocketAddr) -> TestDashboard {
    start_dashboard_with(upstream, |_| {}).await
}

/// Start a dashboard pointed at `upstream`, adjusting config first.
pub async fn start_dashboard_with<F>(upstream: SocketAddr, adjust: F) -> TestDashboard
where
    F: FnOnce(&mut DashboardConfig),
{
    let mut config = DashboardConfig::default();
    config.listener.bind_host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.url = format!("http://{}", upstream);
    adjust(&mut config);

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shutdown.clone()).unwrap();
    let tracker = server.failure_tracker();
    let sessions = server.sessions();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    TestDashboard {
        addr,
        shutdown,
        tracker,
        sessions,
    }
}

/// Send one trigger and wait for the count it produces.
pub async fn request_count(ws: &mut WsClient) -> Count {
    ws.send(Message::Text("get count".into())).await.unwrap();
    next_count(ws).await
}

/// Wait for the next text message and decode it as a count.
pub async fn next_count(ws: &mut WsClient) -> Count {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for count")
            .expect("stream ended")
            .expect("read failed");

        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("reply is not a count");
        }
    }
}

/// Poll until `check` holds or a second passes.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..50 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
