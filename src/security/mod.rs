//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (fixed-window check per client address + route class)
//!     → Pass to identity resolution and the application
//!
//! Outgoing response:
//!     → headers.rs (security headers, optional Content-Security-Policy)
//! ```
//!
//! # Design Decisions
//! - Rate limiting runs before authentication and cannot be bypassed by an
//!   authenticated identity
//! - Counters are process-local and approximate; a restart resets them
//! - Header stamping covers every egress response, including 429 rejections

pub mod headers;
pub mod rate_limit;
