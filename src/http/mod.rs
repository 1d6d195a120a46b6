//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware wiring, serve loop)
//!     → request.rs (request ID, client address resolution)
//!     → [security + auth middleware, then the application router]
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{client_address, request_id_middleware, RequestId, X_REQUEST_ID};
pub use server::GatewayServer;
