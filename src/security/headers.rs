//! Security response headers.
//!
//! # Responsibilities
//! - Stamp the fixed security headers on every egress response
//! - Emit the Content-Security-Policy when strict CSP is enabled
//!
//! # Design Decisions
//! - Strict CSP is a config flag, not a hostname comparison, so the policy
//!   is testable without DNS
//! - The CSP allow-lists are fixed; they cover the blog's CDN scripts,
//!   OCR worker blobs and video embeds

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::SecurityConfig;
use crate::observability::metrics;

/// Content-Security-Policy directives, joined with `"; "` into the header
/// value. unsafe-inline stays until the templates stop inlining scripts.
pub const CSP_DIRECTIVES: [&str; 9] = [
    "default-src 'self'",
    "script-src 'self' 'unsafe-inline' blob: https://unpkg.com https://cdn.jsdelivr.net",
    "style-src 'self' 'unsafe-inline' https://unpkg.com",
    "img-src 'self' data: blob: https: http:",
    "font-src 'self' data:",
    "connect-src 'self' https://tessdata.projectnaptha.com https://cdn.jsdelivr.net",
    "worker-src 'self' blob:",
    "frame-src 'self' https://www.youtube.com https://player.vimeo.com",
    "frame-ancestors 'self'",
];

/// Prebuilt header values for the response pass.
pub struct HeaderPolicy {
    strict_csp: bool,
    csp: HeaderValue,
}

impl HeaderPolicy {
    pub fn new(config: &SecurityConfig) -> Self {
        let csp = HeaderValue::from_str(&CSP_DIRECTIVES.join("; "))
            .expect("static CSP directives form a valid header value");
        Self {
            strict_csp: config.strict_csp,
            csp,
        }
    }
}

/// Middleware stamping security headers onto every response.
pub async fn security_headers_middleware(
    State(policy): State<Arc<HeaderPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    metrics::record_request(response.status().as_u16());

    let headers = response.headers_mut();
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );

    if policy.strict_csp {
        headers.insert(header::CONTENT_SECURITY_POLICY, policy.csp.clone());
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csp_value_is_the_joined_directive_list() {
        let policy = HeaderPolicy::new(&SecurityConfig { strict_csp: true });
        let value = policy.csp.to_str().unwrap();
        assert!(value.starts_with("default-src 'self'; script-src"));
        assert!(value.ends_with("frame-ancestors 'self'"));
        assert_eq!(value.matches("; ").count(), CSP_DIRECTIVES.len() - 1);
    }
}
