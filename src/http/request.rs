//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for correlation
//! - Resolve the client address used as the rate-limit key segment
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The client address comes from proxy headers only; clients behind one
//!   NAT or with no headers at all share the `"unknown"` bucket

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID attached to every request.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Middleware attaching a request ID and echoing it on the response.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Resolve the client address for rate-limit keying.
///
/// Trust order: the reverse proxy's `cf-connecting-ip`, then the first
/// entry of `x-forwarded-for`, then the literal `"unknown"`.
pub fn client_address(headers: &HeaderMap) -> String {
    if let Some(ip) = headers
        .get("cf-connecting-ip")
        .and_then(|value| value.to_str().ok())
    {
        let ip = ip.trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }

    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn trusted_proxy_header_wins() {
        let map = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
        ]);
        assert_eq!(client_address(&map), "203.0.113.9");
    }

    #[test]
    fn forwarded_for_uses_the_first_entry() {
        let map = headers(&[("x-forwarded-for", "198.51.100.7, 10.0.0.2, 10.0.0.3")]);
        assert_eq!(client_address(&map), "198.51.100.7");
    }

    #[test]
    fn absent_headers_fall_back_to_unknown() {
        assert_eq!(client_address(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn blank_or_malformed_headers_fall_back_to_unknown() {
        let map = headers(&[("cf-connecting-ip", "  "), ("x-forwarded-for", " , 10.0.0.2")]);
        assert_eq!(client_address(&map), "unknown");
    }
}
