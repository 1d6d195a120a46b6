//! External auth provider contract for the external-provider strategy.

use axum::http::HeaderMap;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::auth::identity::RequestIdentity;

/// Errors surfaced by the provider client. Recovered by the caller; a
/// request with a failing provider simply proceeds unauthenticated.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("auth provider request failed: {0}")]
    Request(String),
}

/// The provider's view of the current user.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
    /// Display name from provider metadata, when the provider has one.
    pub username: Option<String>,
}

impl ProviderUser {
    /// Best-effort identity: metadata username, else the email local part,
    /// else the provider id.
    pub fn into_identity(self) -> RequestIdentity {
        let username = self
            .username
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.id.clone());
        RequestIdentity {
            id: self.id,
            username,
            email: self.email,
        }
    }
}

/// Request-scoped client for an external auth provider. The implementation
/// inspects the provider's own cookies on the inbound headers.
pub trait AuthProvider: Send + Sync {
    fn current_user<'a>(
        &'a self,
        headers: &'a HeaderMap,
    ) -> BoxFuture<'a, Result<ProviderUser, ProviderError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_prefers_provider_metadata() {
        let user = ProviderUser {
            id: "uuid-1".into(),
            email: Some("sam@example.com".into()),
            username: Some("samwise".into()),
        };
        assert_eq!(user.into_identity().username, "samwise");
    }

    #[test]
    fn username_falls_back_to_email_local_part() {
        let user = ProviderUser {
            id: "uuid-1".into(),
            email: Some("sam@example.com".into()),
            username: None,
        };
        let identity = user.into_identity();
        assert_eq!(identity.username, "sam");
        assert_eq!(identity.email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn username_falls_back_to_provider_id_last() {
        let user = ProviderUser {
            id: "uuid-1".into(),
            email: None,
            username: None,
        };
        assert_eq!(user.into_identity().username, "uuid-1");
    }
}
