//! Count payload and upstream error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Hostname reported in place of the upstream's when it cannot be reached.
pub const UNREACHABLE_HOSTNAME: &str = "[Unreachable]";

/// Count value sent to a client when the upstream fetch failed.
pub const UNREACHABLE_COUNT: i64 = -1;

/// A number being counted plus the data sent to WebSocket clients.
///
/// Decoding is lenient about shape: unknown fields are ignored, and missing
/// or `null` fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Count {
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dashboard_hostname: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Count {
    /// Degraded count used when the upstream fetch failed.
    pub fn unreachable(error: &FetchError) -> Self {
        Self {
            count: UNREACHABLE_COUNT,
            message: error.to_string(),
            hostname: UNREACHABLE_HOSTNAME.to_string(),
            dashboard_hostname: String::new(),
        }
    }

    /// Stamp the relay's own identity, replacing anything already present.
    pub fn with_dashboard_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.dashboard_hostname = hostname.into();
        self
    }

    /// Decode an upstream response body. A bare `null` is the zero count.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        let count: Option<Self> = serde_json::from_slice(body)?;
        Ok(count.unwrap_or_default())
    }
}

/// Errors from a single upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No complete response within the deadline.
    #[error("upstream request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Configured URL cannot be requested.
    #[error("invalid upstream url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connect, send or body read failed.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// Body was not a JSON count.
    #[error("malformed upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}
