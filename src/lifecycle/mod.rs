//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Init observability → Bind listener → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT → Shutdown broadcast → Stop accepting → Sweeper exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
