//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, windows > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{GatewayConfig, WindowPolicy};

/// A single semantic validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener bind_address must not be empty")]
    EmptyBindAddress,

    #[error("rate_limit.{0}.limit must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("rate_limit.{0}.window_ms must be greater than zero")]
    ZeroWindow(&'static str),

    #[error("rate_limit.sweep_interval_secs must be greater than zero")]
    ZeroSweepInterval,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("auth.session_cookie must not be empty")]
    EmptySessionCookie,
}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let policies: [(&'static str, &WindowPolicy); 3] = [
        ("login", &config.rate_limit.login),
        ("comment", &config.rate_limit.comment),
        ("api", &config.rate_limit.api),
    ];
    for (name, policy) in policies {
        if policy.limit == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
        if policy.window_ms == 0 {
            errors.push(ValidationError::ZeroWindow(name));
        }
    }

    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.auth.session_cookie.trim().is_empty() {
        errors.push(ValidationError::EmptySessionCookie);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
