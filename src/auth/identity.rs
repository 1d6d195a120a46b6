//! Per-request identity resolution.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::auth::provider::AuthProvider;
use crate::auth::session::SessionStore;
use crate::observability::metrics;

/// Identity attached to authenticated requests.
///
/// Owned by a single request's processing lifetime: inserted into the
/// request extensions before delegation and dropped with the request.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

/// The deployment's identity resolution strategy. The two variants are
/// alternates; a deployment wires exactly one.
pub enum IdentityResolver {
    LocalSession {
        store: Arc<dyn SessionStore>,
        cookie_name: String,
    },
    ExternalProvider {
        provider: Arc<dyn AuthProvider>,
    },
}

impl IdentityResolver {
    pub fn local(store: Arc<dyn SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self::LocalSession {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn external(provider: Arc<dyn AuthProvider>) -> Self {
        Self::ExternalProvider { provider }
    }

    /// Resolve the request's identity, or `None` for anonymous requests.
    /// Lookup failures log and resolve to `None`; they never fail the
    /// request.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<RequestIdentity> {
        match self {
            IdentityResolver::LocalSession { store, cookie_name } => {
                let token = cookie_value(headers, cookie_name)?;
                match store.get_session(&token).await {
                    Ok(Some(record)) => {
                        // The store contract already filters expired rows;
                        // re-check so a store that forgets cannot mint
                        // identities from stale sessions.
                        if record.is_expired(Utc::now()) {
                            return None;
                        }
                        Some(RequestIdentity {
                            id: record.user_id,
                            username: record.username,
                            email: None,
                        })
                    }
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "Session check failed");
                        metrics::record_identity_failed("local");
                        None
                    }
                }
            }
            IdentityResolver::ExternalProvider { provider } => {
                match provider.current_user(headers).await {
                    Ok(user) => Some(user.into_identity()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Auth provider check failed");
                        metrics::record_identity_failed("external");
                        None
                    }
                }
            }
        }
    }
}

/// Middleware populating the request identity before delegation.
pub async fn identity_middleware(
    State(resolver): State<Arc<IdentityResolver>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(identity) = resolver.resolve(request.headers()).await {
        tracing::debug!(user = %identity.username, "Resolved request identity");
        metrics::record_identity_resolved();
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// Read a single cookie value out of the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
