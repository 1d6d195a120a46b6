//! Session store contract for the local-session strategy.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use thiserror::Error;

/// Errors surfaced by a session store lookup. All of them are recovered by
/// the caller; none fail the request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("session store query failed: {0}")]
    Query(String),
}

/// A session row joined to its owning user.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Lookup contract against the application's session storage.
///
/// Implementations must return `Ok(None)` for missing or expired sessions;
/// the expiry filter belongs to the store, the way the blog's SQL lookup
/// only selects rows with `expires_at` in the future.
pub trait SessionStore: Send + Sync {
    fn get_session<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<SessionRecord>, StoreError>>;
}

/// In-memory session store.
///
/// Backs the standalone binary and tests; real deployments implement
/// [`SessionStore`] over the blog's database.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, record: SessionRecord) {
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        sessions.insert(token.into(), record);
    }

    pub fn remove(&self, token: &str) {
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        sessions.remove(token);
    }
}

impl SessionStore for MemorySessionStore {
    fn get_session<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<SessionRecord>, StoreError>> {
        let record = {
            let sessions = self.sessions.lock().expect("session store mutex poisoned");
            sessions
                .get(token)
                .filter(|record| !record.is_expired(Utc::now()))
                .cloned()
        };
        Box::pin(async move { Ok(record) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration) -> SessionRecord {
        SessionRecord {
            user_id: "u1".into(),
            username: "mara".into(),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[tokio::test]
    async fn live_session_is_returned() {
        let store = MemorySessionStore::new();
        store.insert("tok", record(Duration::hours(1)));
        let found = store.get_session("tok").await.unwrap();
        assert_eq!(found.unwrap().username, "mara");
    }

    #[tokio::test]
    async fn expired_session_reads_as_absent() {
        let store = MemorySessionStore::new();
        store.insert("tok", record(Duration::hours(-1)));
        assert!(store.get_session("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_token_reads_as_absent() {
        let store = MemorySessionStore::new();
        assert!(store.get_session("nope").await.unwrap().is_none());
    }
}
