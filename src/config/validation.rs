//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, idle timeout within request timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - The upstream URL is not checked here: a bad URL degrades every count
//!   at runtime (see `counting::client`) instead of stopping the process

use thiserror::Error;

use crate::config::schema::DashboardConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("idle_timeout_ms ({idle_ms}) exceeds request_timeout_ms ({request_ms})")]
    IdleExceedsRequest { idle_ms: u64, request_ms: u64 },

    #[error("listener bind_host must not be empty")]
    EmptyBindHost,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_host.trim().is_empty() {
        errors.push(ValidationError::EmptyBindHost);
    }

    let upstream = &config.upstream;
    if upstream.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "request_timeout_ms" });
    }
    if upstream.idle_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "idle_timeout_ms" });
    }
    if upstream.request_timeout_ms > 0 && upstream.idle_timeout_ms > upstream.request_timeout_ms {
        errors.push(ValidationError::IdleExceedsRequest {
            idle_ms: upstream.idle_timeout_ms,
            request_ms: upstream.request_timeout_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&DashboardConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = DashboardConfig::default();
        config.listener.bind_host = " ".to_string();
        config.upstream.request_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyBindHost,
                ValidationError::ZeroTimeout { field: "request_timeout_ms" },
            ]
        );
    }

    #[test]
    fn upstream_url_is_not_checked() {
        let mut config = DashboardConfig::default();
        config.upstream.url = "not a url".to_string();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn idle_timeout_bounded_by_request_timeout() {
        let mut config = DashboardConfig::default();
        config.upstream.idle_timeout_ms = 5000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::IdleExceedsRequest { idle_ms: 5000, request_ms: 2000 }]
        );
    }
}
