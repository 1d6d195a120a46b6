//! Fixed-window rate limiting middleware.
//!
//! # Responsibilities
//! - Classify requests into route classes (login, comment, api)
//! - Track attempt counts per `class:client_address` key
//! - Reject over-limit requests with a 429 before the application runs
//! - Bound table memory with a periodic sweep of expired windows
//!
//! # Design Decisions
//! - Fixed window, not token bucket: matches the product's admission policy
//!   (N attempts per minute), and a window that resets on expiry is easy to
//!   reason about for login throttling
//! - Counting under concurrency is approximate; exactness is not a goal for
//!   a best-effort limiter

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::broadcast;

use crate::config::{RateLimitConfig, WindowPolicy};
use crate::http::request::client_address;
use crate::observability::metrics;

/// One fixed window of observed attempts.
struct RateWindow {
    count: u32,
    reset_at: Instant,
}

/// Route classes with independent budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Login,
    Comment,
    Api,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Login => "login",
            RouteClass::Comment => "comment",
            RouteClass::Api => "api",
        }
    }

    /// Classify a request. Returns `None` for unthrottled routes.
    fn classify(method: &Method, path: &str) -> Option<RouteClass> {
        if path == "/login" && method == Method::POST {
            return Some(RouteClass::Login);
        }
        if path.starts_with("/post/") && method == Method::POST {
            return Some(RouteClass::Comment);
        }
        if path.starts_with("/api/") {
            return Some(RouteClass::Api);
        }
        None
    }

    fn throttled_response(&self) -> Response {
        match self {
            RouteClass::Login => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts. Please try again later.",
            )
                .into_response(),
            RouteClass::Comment => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please slow down.",
            )
                .into_response(),
            RouteClass::Api => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({"error": "Rate limit exceeded"})),
            )
                .into_response(),
        }
    }
}

/// State for the fixed-window rate limiter.
pub struct RateLimiterState {
    windows: Mutex<HashMap<String, RateWindow>>,
    config: RateLimitConfig,
}

impl RateLimiterState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Record one attempt for `key` and decide whether to reject it.
    ///
    /// A missing or expired window is replaced with a fresh one at count 1.
    /// Within a live window the count is incremented and compared against
    /// the limit, so the (limit+1)-th attempt is the first rejected one.
    pub fn should_throttle(&self, key: &str, limit: u32, window: Duration) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");

        match windows.get_mut(key) {
            Some(entry) if now < entry.reset_at => {
                entry.count += 1;
                entry.count > limit
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    RateWindow {
                        count: 1,
                        reset_at: now + window,
                    },
                );
                false
            }
        }
    }

    /// Drop every expired window. Keys that are still being hit are already
    /// replaced in place by `should_throttle`; this catches the ones that
    /// went quiet.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        windows.retain(|_, entry| entry.reset_at > now);
    }

    fn policy_for(&self, class: RouteClass) -> WindowPolicy {
        match class {
            RouteClass::Login => self.config.login,
            RouteClass::Comment => self.config.comment,
            RouteClass::Api => self.config.api,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.windows.lock().expect("rate limiter mutex poisoned").len()
    }
}

/// Middleware enforcing the per-class budgets.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(class) = RouteClass::classify(request.method(), request.uri().path()) else {
        return next.run(request).await;
    };

    let client = client_address(request.headers());
    let key = format!("{}:{}", class.as_str(), client);
    let policy = state.policy_for(class);

    if state.should_throttle(&key, policy.limit, Duration::from_millis(policy.window_ms)) {
        tracing::warn!(client = %client, category = class.as_str(), "Rate limit exceeded");
        metrics::record_rate_limited(class.as_str());
        return class.throttled_response();
    }

    next.run(request).await
}

/// Spawn the background sweep task. Exits on shutdown.
pub fn spawn_sweeper(
    state: Arc<RateLimiterState>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick of a tokio interval fires immediately; skip it so a
        // sweep never races server startup.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => state.sweep(),
                _ = shutdown.recv() => break,
            }
        }
        tracing::debug!("Rate limiter sweeper stopped");
    });
}
