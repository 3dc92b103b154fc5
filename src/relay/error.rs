//! Relay error definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors produced while servicing a relay request.
///
/// Only failures that occur before any body byte reaches the caller are
/// representable here; once streaming has started the status line is already
/// on the wire and a failure can only terminate the stream abruptly.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The `url` query parameter was absent.
    #[error("Missing url parameter")]
    MissingUrl,

    /// The `url` query parameter did not parse as an absolute URL.
    #[error("Invalid url parameter: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reaching the upstream failed (DNS, connect, TLS), or reading the
    /// body failed while it was still being buffered for inline delivery.
    #[error("Error fetching the url: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
