//! Request gateway for a personal travel/food blog.
//!
//! Every inbound request makes a single linear pass through the gateway:
//!
//! ```text
//! Client request
//!     → security/rate_limit.rs  (fixed-window check per client + route class)
//!     → auth/identity.rs        (best-effort session → RequestIdentity)
//!     → [application router]    (pages, API, admin; external to this crate)
//!     → security/headers.rs     (security headers + optional CSP)
//! Client response
//! ```
//!
//! A throttled request short-circuits with a `429` before the application
//! runs. A failed identity lookup never fails the request; it proceeds
//! unauthenticated and the downstream authorization layer decides what that
//! means.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
