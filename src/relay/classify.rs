//! Upstream response classification.
//!
//! # Responsibilities
//! - Decide between inline-text and streamed delivery
//! - Derive the output filename extension from the content type
//!
//! # Design Decisions
//! - Classification is a pure function of the content-type string and the
//!   debug flag; it must be total over absent, malformed, and parameterized
//!   ("; charset=...") content types
//! - Inline delivery buffers the whole body in memory and is only meant for
//!   debugging small text responses, never as a streaming substitute

use axum::http::{header, HeaderMap};

/// Content type assumed when the upstream response carries none.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension used when none can be derived from the content type.
const FALLBACK_EXTENSION: &str = "bin";

/// Which of the two mutually exclusive delivery paths handles the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryDecision {
    /// Buffer the full body and return it as text. Debug only.
    InlineText,
    /// Copy the body to the caller incrementally.
    StreamedBody,
}

/// Content type of an upstream response, with fallback.
pub fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// True when the media type carries text the inline path can render:
/// any `text/*` type, or a JSON/XML flavored subtype.
pub fn is_text_like(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.starts_with("text/") || media_type.contains("json") || media_type.contains("xml")
}

/// Pick the delivery path for one response.
pub fn classify(debug: bool, content_type: &str) -> DeliveryDecision {
    if debug && is_text_like(content_type) {
        DeliveryDecision::InlineText
    } else {
        DeliveryDecision::StreamedBody
    }
}

/// Output filename extension.
///
/// An explicit caller override wins; otherwise the content-type subtype
/// (stripped of any ";charset=..." suffix) is used, else "bin".
pub fn extension_for(content_type: &str, explicit: Option<&str>) -> String {
    if let Some(extension) = explicit {
        if !extension.is_empty() {
            return extension.to_string();
        }
    }

    content_type
        .split('/')
        .nth(1)
        .and_then(|subtype| subtype.split(';').next())
        .map(str::trim)
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or(FALLBACK_EXTENSION)
        .to_string()
}
