//! Incremental copy of the upstream body to the caller.
//!
//! # Responsibilities
//! - Forward upstream chunks without buffering the body
//! - Convert an upstream transport failure into stream termination
//! - Release the upstream connection when the caller disconnects
//!
//! # Design Decisions
//! - The adapter is handed to the response body, so when the caller goes
//!   away hyper drops it in the same scheduling step; dropping it drops the
//!   upstream stream and with it the upstream connection
//! - Once headers are on the wire a mid-body failure cannot change the
//!   status; the stream yields an error and the connection is cut, which
//!   the caller's HTTP stack surfaces as a truncated transfer
//! - Exactly one terminal outcome is recorded per transfer

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Bytes;
use futures_util::Stream;

use crate::observability::metrics;

/// Terminal state of one body transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The upstream body was copied to the caller in full.
    Drained,
    /// The upstream connection failed mid-body.
    UpstreamFailed,
    /// The caller disconnected before the body was fully copied.
    Cancelled,
}

/// Stream adapter that relays upstream chunks to the response body.
pub struct RelayStream<S> {
    upstream: S,
    bytes_forwarded: u64,
    outcome: Option<RelayOutcome>,
}

impl<S> RelayStream<S> {
    pub fn new(upstream: S) -> Self {
        Self {
            upstream,
            bytes_forwarded: 0,
            outcome: None,
        }
    }

    /// Bytes forwarded to the caller so far.
    pub fn bytes_forwarded(&self) -> u64 {
        self.bytes_forwarded
    }

    /// Terminal outcome, once the transfer has finished one way or another.
    pub fn outcome(&self) -> Option<RelayOutcome> {
        self.outcome
    }

    fn finish(&mut self, outcome: RelayOutcome) {
        self.outcome = Some(outcome);
        metrics::record_streamed_bytes(self.bytes_forwarded);
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.outcome.is_some() {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.upstream).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_forwarded += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(error))) => {
                tracing::warn!(
                    bytes_forwarded = this.bytes_forwarded,
                    error = %error,
                    "Upstream transfer interrupted, terminating response stream"
                );
                this.finish(RelayOutcome::UpstreamFailed);
                Poll::Ready(Some(Err(io::Error::new(io::ErrorKind::BrokenPipe, error))))
            }
            Poll::Ready(None) => {
                tracing::debug!(
                    bytes_forwarded = this.bytes_forwarded,
                    "Upstream body drained"
                );
                this.finish(RelayOutcome::Drained);
                Poll::Ready(None)
            }
        }
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(RelayOutcome::Cancelled);
            metrics::record_streamed_bytes(self.bytes_forwarded);
            tracing::info!(
                bytes_forwarded = self.bytes_forwarded,
                "Caller disconnected, cancelling upstream transfer"
            );
        }
    }
}
