//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dashboard metrics (upstream fetches, relay sessions)
//! - Install the Prometheus recorder and render it for `/metrics`
//!
//! # Metrics
//! - `dashboard_upstream_fetch_total` (counter): fetches by outcome
//! - `dashboard_upstream_fetch_duration_seconds` (histogram): fetch latency
//! - `dashboard_upstream_consecutive_failures` (gauge): mirrors the failure tracker
//! - `dashboard_ws_sessions_total` (counter): relay sessions opened
//! - `dashboard_ws_active_sessions` (gauge): relay sessions currently open
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; with no recorder installed
//!   (tests, metrics disabled) every call is a no-op
//! - Histogram buckets sized around the 2s upstream deadline

use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const UPSTREAM_FETCH_TOTAL: &str = "dashboard_upstream_fetch_total";
pub const UPSTREAM_FETCH_DURATION: &str = "dashboard_upstream_fetch_duration_seconds";
pub const UPSTREAM_CONSECUTIVE_FAILURES: &str = "dashboard_upstream_consecutive_failures";
pub const WS_SESSIONS_TOTAL: &str = "dashboard_ws_sessions_total";
pub const WS_ACTIVE_SESSIONS: &str = "dashboard_ws_active_sessions";

const FETCH_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 2.5];

/// Install the global Prometheus recorder.
///
/// Call at most once per process; the handle renders the exposition text.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(UPSTREAM_FETCH_DURATION.to_string()), FETCH_BUCKETS)?
        .install_recorder()?;

    describe();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Periodically drain histogram buffers so renders stay cheap.
pub fn spawn_upkeep(handle: PrometheusHandle, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

fn describe() {
    ::metrics::describe_counter!(UPSTREAM_FETCH_TOTAL, "Upstream count fetches by outcome");
    ::metrics::describe_histogram!(
        UPSTREAM_FETCH_DURATION,
        ::metrics::Unit::Seconds,
        "Upstream count fetch latency"
    );
    ::metrics::describe_gauge!(
        UPSTREAM_CONSECUTIVE_FAILURES,
        "Upstream fetch failures since the last success"
    );
    ::metrics::describe_counter!(WS_SESSIONS_TOTAL, "Relay sessions opened");
    ::metrics::describe_gauge!(WS_ACTIVE_SESSIONS, "Relay sessions currently open");
}

/// Record a single upstream fetch.
pub fn record_upstream_fetch(success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(UPSTREAM_FETCH_TOTAL, "outcome" => outcome).increment(1);
    ::metrics::histogram!(UPSTREAM_FETCH_DURATION).record(start.elapsed().as_secs_f64());
}

pub fn record_consecutive_failures(failures: u64) {
    ::metrics::gauge!(UPSTREAM_CONSECUTIVE_FAILURES).set(failures as f64);
}

pub fn record_session_opened(active: u64) {
    ::metrics::counter!(WS_SESSIONS_TOTAL).increment(1);
    ::metrics::gauge!(WS_ACTIVE_SESSIONS).set(active as f64);
}

pub fn record_session_closed(active: u64) {
    ::metrics::gauge!(WS_ACTIVE_SESSIONS).set(active as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_upstream_fetch(true, Instant::now());
        record_upstream_fetch(false, Instant::now());
        record_consecutive_failures(3);
        record_session_opened(1);
        record_session_closed(0);
    }

    #[test]
    fn local_recorder_renders_recorded_values() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            record_upstream_fetch(false, Instant::now());
            record_consecutive_failures(4);
        });

        let text = handle.render();
        assert!(text.contains("dashboard_upstream_fetch_total{outcome=\"failure\"} 1"));
        assert!(text.contains("dashboard_upstream_consecutive_failures 4"));
    }
}
