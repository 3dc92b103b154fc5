//! The relay core.
//!
//! # Data Flow
//! ```text
//! Inbound query string
//!     → request.rs (validate target URL, build spoofed browser headers)
//!     → upstream fetch (reqwest, redirects followed)
//!     → classify.rs (inline-text vs streamed delivery, output extension)
//!     → headers.rs (content-type / content-disposition projection)
//!     → stream.rs (incremental body copy, cancellation in both directions)
//! ```
//!
//! # Design Decisions
//! - Each request owns its upstream response exclusively; nothing is cached
//! - Exactly one delivery path runs per request, with one terminal outcome
//! - The streamed path never buffers the body; memory use is bounded by
//!   the chunk size regardless of body length

pub mod classify;
pub mod error;
pub mod headers;
pub mod request;
pub mod stream;

pub use classify::DeliveryDecision;
pub use error::RelayError;
pub use request::{ProxyRequest, RelayParams};
pub use stream::{RelayOutcome, RelayStream};
