//! Identity resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request headers
//!     → identity.rs (strategy dispatch)
//!         → session.rs (session cookie → SessionStore lookup)   [local]
//!         → provider.rs (external auth provider client)         [external]
//!     → RequestIdentity inserted into request extensions
//!     → Application reads it (or its absence) for authorization
//! ```
//!
//! # Design Decisions
//! - Exactly one strategy is wired per deployment; they are never merged
//! - Resolution failure is non-fatal: the request proceeds unauthenticated
//!   and only the lookup error is logged
//! - "Not logged in" and "lookup errored" are indistinguishable downstream

pub mod identity;
pub mod provider;
pub mod session;

pub use identity::{identity_middleware, IdentityResolver, RequestIdentity};
pub use provider::{AuthProvider, ProviderError, ProviderUser};
pub use session::{MemorySessionStore, SessionRecord, SessionStore, StoreError};
