//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the blog gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting policies per route class.
    pub rate_limit: RateLimitConfig,

    /// Identity resolution settings.
    pub auth: AuthConfig,

    /// Response security header settings.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Fixed-window rate limiting configuration.
///
/// One policy per route class. The defaults mirror the production values:
/// 5 login attempts, 10 comment submissions and 30 API requests per minute
/// and per client address.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Policy for `POST /login`.
    pub login: WindowPolicy,

    /// Policy for `POST /post/*` (comment submissions).
    pub comment: WindowPolicy,

    /// Policy for `/api/*` (any method).
    pub api: WindowPolicy,

    /// Interval between background sweeps of expired windows, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: WindowPolicy {
                limit: 5,
                window_ms: 60_000,
            },
            comment: WindowPolicy {
                limit: 10,
                window_ms: 60_000,
            },
            api: WindowPolicy {
                limit: 30,
                window_ms: 60_000,
            },
            sweep_interval_secs: 60,
        }
    }
}

/// A single fixed-window policy: at most `limit` requests per `window_ms`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct WindowPolicy {
    /// Maximum accepted requests per window.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_limit() -> u32 {
    30
}

fn default_window_ms() -> u64 {
    60_000
}

/// Identity resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Which resolution strategy this deployment uses. The strategies are
    /// alternates, never composed.
    pub strategy: AuthStrategy,

    /// Name of the session cookie read by the local-session strategy.
    pub session_cookie: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: AuthStrategy::Local,
            session_cookie: "session".to_string(),
        }
    }
}

/// Identity resolution strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    /// Session cookie looked up against the application's session store.
    #[default]
    Local,

    /// Delegate to an external auth provider's request-scoped client.
    External,
}

/// Response security header configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Emit the Content-Security-Policy header. Disabled in local
    /// development because the policy breaks dev-only in-browser workers.
    pub strict_csp: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { strict_csp: true }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
