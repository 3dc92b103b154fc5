//! HTTP server setup and the relay endpoint.
//!
//! # Responsibilities
//! - Create the Axum router with the single relay handler
//! - Wire up middleware (tracing, request ID, CORS decoration)
//! - Build the shared upstream client
//! - Serve with graceful shutdown
//!
//! # Responses
//! - Missing/invalid `url` parameter: 400 before any network I/O
//! - Upstream unreachable: 502 with a diagnostic body
//! - Otherwise: the upstream body, streamed or (debug) buffered inline;
//!   upstream status codes are not forwarded, the relay answers 200

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{RelayConfig, UpstreamConfig};
use crate::http::cors;
use crate::observability::metrics;
use crate::relay::classify::{classify, content_type_of, extension_for};
use crate::relay::headers::{download_filename, project};
use crate::relay::error::RelayResult;
use crate::relay::request::spoofed_headers;
use crate::relay::{DeliveryDecision, ProxyRequest, RelayParams, RelayStream};

/// Application state injected into the relay handler.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream: Arc<UpstreamConfig>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.upstream.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let state = AppState {
            client,
            upstream: Arc::new(config.upstream.clone()),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(relay_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        cors::decorate(router)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C or when the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler: one upstream fetch per inbound request.
async fn relay_handler(
    State(state): State<AppState>,
    Query(params): Query<RelayParams>,
) -> Response {
    let start_time = Instant::now();
    let arrival_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();

    let response = match relay(&state, params, arrival_ms).await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(error = %error, "Relay request failed");
            error.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}

async fn relay(
    state: &AppState,
    params: RelayParams,
    arrival_ms: u128,
) -> RelayResult<Response> {
    // Validate before any network I/O.
    let request = ProxyRequest::from_params(params)?;

    tracing::debug!(
        target = %request.target,
        debug = request.debug,
        download = request.download,
        "Fetching upstream resource"
    );

    let upstream = state
        .client
        .get(request.target.clone())
        .headers(spoofed_headers(&request.target, &state.upstream))
        .send()
        .await?;

    let content_type = content_type_of(upstream.headers());

    tracing::debug!(
        status = %upstream.status(),
        content_type = %content_type,
        "Upstream responded"
    );

    match classify(request.debug, &content_type) {
        DeliveryDecision::InlineText => {
            // Debug-only: the whole body is buffered in memory.
            let text = upstream.text().await?;

            let mut response = Response::new(Body::from(text));
            if let Ok(value) = HeaderValue::from_str(&content_type) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            Ok(response)
        }
        DeliveryDecision::StreamedBody => {
            let extension = extension_for(&content_type, request.extension.as_deref());
            let filename = download_filename(&request, arrival_ms, &extension);
            let headers = project(&content_type, &request, &filename);

            let relay_stream = RelayStream::new(upstream.bytes_stream().boxed());

            let mut response = Response::new(Body::from_stream(relay_stream));
            response.headers_mut().extend(headers);
            Ok(response)
        }
    }
}

/// Wait for Ctrl+C or a programmatic shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(error) = result {
                tracing::error!(error = %error, "Failed to install Ctrl+C handler");
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
