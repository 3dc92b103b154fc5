//! HTTP surface of the relay.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, single relay endpoint, request IDs)
//!     → relay subsystem (translate, fetch, classify, project, stream)
//!     → cors.rs (fixed cross-origin policy stamped on every response)
//!     → Send to caller
//! ```

pub mod cors;
pub mod server;

pub use server::HttpServer;
