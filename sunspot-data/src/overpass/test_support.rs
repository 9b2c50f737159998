//! Test doubles for the Overpass client.
//!
//! [`ScriptedTransport`] replays a fixed sequence of HTTP outcomes and records
//! when each request arrived, so retry timing can be asserted under a paused
//! Tokio clock. [`StubExecutor`] skips HTTP entirely and returns a canned
//! result.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::time::Instant;

use super::{OverpassExecutor, OverpassResponse, OverpassTransport, TransportResponse, UpstreamError};

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Answer with an HTTP status and body.
    Respond(TransportResponse),
    /// Fail without a response.
    Fail(UpstreamError),
    /// Never complete; exercises the per-attempt timeout.
    Hang,
}

impl Scripted {
    /// Shorthand for [`Scripted::Respond`].
    #[must_use]
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::Respond(TransportResponse::new(status, body))
    }
}

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Endpoint the request was sent to.
    pub endpoint: String,
    /// Query text.
    pub query: String,
    /// Tokio clock reading when the request arrived.
    pub at: Instant,
}

/// `OverpassTransport` replaying scripted outcomes in order.
///
/// Once the script runs out every request fails with a network error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Create a transport replaying `script`.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn next(&self, endpoint: &str, query: &str) -> Option<Scripted> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                endpoint: endpoint.to_owned(),
                query: query.to_owned(),
                at: Instant::now(),
            });
        }
        self.script.lock().ok().and_then(|mut script| script.pop_front())
    }
}

#[async_trait]
impl OverpassTransport for ScriptedTransport {
    async fn post(&self, endpoint: &str, query: &str) -> Result<TransportResponse, UpstreamError> {
        match self.next(endpoint, query) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(UpstreamError::Network {
                message: "script exhausted".to_owned(),
            }),
        }
    }
}

/// `OverpassExecutor` returning a fixed result.
#[derive(Debug)]
pub struct StubExecutor {
    result: Result<OverpassResponse, UpstreamError>,
    calls: AtomicUsize,
}

impl StubExecutor {
    /// Always succeed with `response`.
    #[must_use]
    pub const fn with_response(response: OverpassResponse) -> Self {
        Self {
            result: Ok(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// Parse `json` as the canned response.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if `json` is not an Overpass document.
    pub fn with_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::with_response)
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn with_error(error: UpstreamError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `execute` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OverpassExecutor for StubExecutor {
    async fn execute(&self, _query: &str) -> Result<OverpassResponse, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn replays_script_in_order() {
        let transport = ScriptedTransport::new([
            Scripted::respond(503, "busy"),
            Scripted::Fail(UpstreamError::Timeout),
        ]);
        let first = transport.post("https://a", "q").await;
        let second = transport.post("https://b", "q").await;
        let third = transport.post("https://c", "q").await;

        assert_eq!(first, Ok(TransportResponse::new(503, "busy")));
        assert_eq!(second, Err(UpstreamError::Timeout));
        assert!(matches!(third, Err(UpstreamError::Network { .. })));
        assert_eq!(transport.calls().len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn stub_executor_counts_calls() {
        let executor = StubExecutor::with_error(UpstreamError::FatalStatus { status: 400 });
        assert!(executor.execute("q").await.is_err());
        assert!(executor.execute("q").await.is_err());
        assert_eq!(executor.calls(), 2);
    }
}
