//! Projection of upstream metadata into outbound response headers.
//!
//! # Responsibilities
//! - Compute the output filename for forced downloads
//! - Set content-type and, when requested, content-disposition
//!
//! # Design Decisions
//! - Filename base precedence: name > quality > fixed "zmapi" label
//! - Caller-supplied filename parts are substituted into the disposition
//!   header literally, without quote escaping; values the header grammar
//!   cannot represent at all drop the disposition rather than the response

use axum::http::{header, HeaderMap, HeaderValue};

use crate::relay::classify::FALLBACK_CONTENT_TYPE;
use crate::relay::request::ProxyRequest;

/// Filename base used when neither `name` nor `quality` is supplied.
const FALLBACK_BASENAME: &str = "zmapi";

/// Output filename: `<base>_<timestamp>.<extension>`.
///
/// The timestamp is the request's arrival time in Unix milliseconds, so two
/// identical requests differ only here.
pub fn download_filename(request: &ProxyRequest, timestamp_ms: u128, extension: &str) -> String {
    let base = request
        .name
        .as_deref()
        .or(request.quality.as_deref())
        .unwrap_or(FALLBACK_BASENAME);

    format!("{}_{}.{}", base, timestamp_ms, extension)
}

/// Outbound header set for the streamed delivery path.
pub fn project(content_type: &str, request: &ProxyRequest, filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
    );

    if request.download {
        let disposition = format!("attachment; filename=\"{}\"", filename);
        match HeaderValue::from_str(&disposition) {
            Ok(value) => {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            Err(_) => {
                tracing::warn!(
                    filename,
                    "Filename not representable as a header value, skipping content-disposition"
                );
            }
        }
    }

    headers
}
