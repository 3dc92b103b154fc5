//! Translation of inbound query parameters into an upstream request.
//!
//! # Responsibilities
//! - Validate the target URL before any network I/O happens
//! - Parse the debug/download flags and filename hints
//! - Build the spoofed browser header set for the upstream fetch
//!
//! # Design Decisions
//! - Flags are truthy only when exactly "1"; any other value is off
//! - Referer/Origin come from the target URL's own origin, so the request
//!   looks like a same-site browser navigation

use axum::http::{header, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::config::UpstreamConfig;
use crate::relay::error::RelayError;

/// Raw query parameters accepted by the relay endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayParams {
    pub url: Option<String>,
    pub debug: Option<String>,
    pub download: Option<String>,
    pub extension: Option<String>,
    pub name: Option<String>,
    pub quality: Option<String>,
}

/// A validated relay request, built once per inbound request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// Absolute URL of the upstream resource.
    pub target: Url,
    /// Return text bodies inline instead of streaming them.
    pub debug: bool,
    /// Force a download via content-disposition.
    pub download: bool,
    /// Explicit output filename extension.
    pub extension: Option<String>,
    /// Output filename base, highest priority.
    pub name: Option<String>,
    /// Output filename base, used when `name` is absent.
    pub quality: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    value == Some("1")
}

impl ProxyRequest {
    /// Validate raw query parameters.
    ///
    /// Fails before any network I/O if the `url` parameter is missing or is
    /// not an absolute URL.
    pub fn from_params(params: RelayParams) -> Result<Self, RelayError> {
        let raw = params.url.ok_or(RelayError::MissingUrl)?;
        let target = Url::parse(&raw)?;

        Ok(Self {
            target,
            debug: flag(params.debug.as_deref()),
            download: flag(params.download.as_deref()),
            extension: params.extension,
            name: params.name,
            quality: params.quality,
        })
    }
}

/// Header set sent with the upstream fetch.
///
/// Presents a desktop-browser user-agent, plus Referer/Origin derived from
/// the target's own origin when enabled in config.
pub fn spoofed_headers(target: &Url, config: &UpstreamConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
        headers.insert(header::USER_AGENT, value);
    }

    if config.send_origin_headers {
        let origin = target.origin().ascii_serialization();
        if let Ok(value) = HeaderValue::from_str(&origin) {
            headers.insert(header::REFERER, value.clone());
            headers.insert(header::ORIGIN, value);
        }
    }

    headers
}
