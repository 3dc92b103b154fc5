//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Shutdown fans out over a broadcast channel so the server task and any
//!   test harness can observe the same trigger
//! - Ctrl+C is wired up inside the HTTP server's shutdown future

pub mod shutdown;

pub use shutdown::Shutdown;
