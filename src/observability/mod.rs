//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters for the Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments); recording never blocks a request
//! - The scrape endpoint binds its own address, separate from the listener

pub mod logging;
pub mod metrics;
