//! Upstream counting service client.
//!
//! # Responsibilities
//! - Issue one bounded GET per call to the configured URL
//! - Decode the body into a [`Count`]
//! - Classify failures (timeout, transport, decode)
//!
//! # Design Decisions
//! - Exactly one attempt per call; the relay decides what a failure means
//! - The status code is not inspected; an undecodable body is the failure
//! - Deadline covers connect, headers and body
//! - Direct connections only; proxy environment variables are ignored
//! - An unusable URL does not stop the process; every fetch fails with
//!   [`FetchError::InvalidUrl`] and the relay serves degraded counts

use std::error::Error as _;
use std::time::{Duration, Instant};

use url::Url;

use crate::config::UpstreamConfig;
use crate::counting::types::{Count, FetchError};
use crate::observability::metrics;

/// HTTP client bound to one counting service URL.
#[derive(Debug, Clone)]
pub struct CountClient {
    http: reqwest::Client,
    raw_url: String,
    url: Result<Url, String>,
    timeout: Duration,
}

impl CountClient {
    /// Build a client from upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let url = parse_target(&config.url);
        if let Err(reason) = &url {
            tracing::error!(
                url = %config.url,
                reason = %reason,
                "Counting service URL is unusable; counts will report the service unreachable"
            );
        }
        let timeout = config.request_timeout();

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(config.idle_timeout())
            .user_agent(config.user_agent.as_str())
            .no_proxy()
            .build()
            .map_err(ClientBuildError::Http)?;

        Ok(Self {
            http,
            raw_url: config.url.clone(),
            url,
            timeout,
        })
    }

    /// The configured URL, as given.
    pub fn target(&self) -> &str {
        &self.raw_url
    }

    /// Fetch the current count from the upstream.
    pub async fn fetch(&self) -> Result<Count, FetchError> {
        let start = Instant::now();
        let result = self.fetch_once().await;
        metrics::record_upstream_fetch(result.is_ok(), start);

        if let Err(e) = &result {
            tracing::debug!(url = %self.raw_url, error = %e, "Upstream fetch failed");
        }
        result
    }

    async fn fetch_once(&self) -> Result<Count, FetchError> {
        let url = match &self.url {
            Ok(url) => url.clone(),
            Err(reason) => {
                return Err(FetchError::InvalidUrl {
                    url: self.raw_url.clone(),
                    reason: reason.clone(),
                })
            }
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        tracing::trace!(status = %status, bytes = body.len(), "Upstream responded");
        Count::from_slice(&body)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(describe(&err))
        }
    }
}

fn parse_target(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

/// Render an error with its source chain, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Errors constructing a [`CountClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn one_shot_upstream(response: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf[..n]).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    fn config_for(url: &str) -> UpstreamConfig {
        UpstreamConfig {
            url: url.to_string(),
            ..UpstreamConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_decodes_and_sends_user_agent() {
        let body = r#"{"count":5,"message":"","hostname":"svc1"}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let (url, request) = one_shot_upstream(response).await;

        let client = CountClient::new(&config_for(&url)).unwrap();
        let count = client.fetch().await.unwrap();
        assert_eq!(count.count, 5);
        assert_eq!(count.hostname, "svc1");

        let raw = request.await.unwrap().to_lowercase();
        assert!(raw.starts_with("get / http/1.1"));
        assert!(raw.contains("user-agent: hashicorp training lab"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (url, _request) = one_shot_upstream(
            "HTTP/1.1 200 OK\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!".to_string(),
        )
        .await;

        let client = CountClient::new(&config_for(&url)).unwrap();
        assert!(matches!(client.fetch().await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CountClient::new(&config_for(&format!("http://{}", addr))).unwrap();
        match client.fetch().await {
            Err(FetchError::Transport(text)) => assert!(!text.is_empty()),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn silent_upstream_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut config = config_for(&format!("http://{}", addr));
        config.request_timeout_ms = 200;
        config.idle_timeout_ms = 100;
        let client = CountClient::new(&config).unwrap();

        let start = Instant::now();
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unparseable_url_fails_every_fetch() {
        let client = CountClient::new(&config_for("no scheme here")).unwrap();
        assert_eq!(client.target(), "no scheme here");

        for _ in 0..2 {
            match client.fetch().await {
                Err(FetchError::InvalidUrl { url, .. }) => assert_eq!(url, "no scheme here"),
                other => panic!("expected invalid url, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn non_http_scheme_fails_fetch() {
        let client = CountClient::new(&config_for("ftp://counting:21")).unwrap();
        match client.fetch().await {
            Err(FetchError::InvalidUrl { reason, .. }) => assert!(reason.contains("ftp")),
            other => panic!("expected invalid url, got {:?}", other),
        }
    }
}
