//! HTTP transport seam for the Overpass client.

use async_trait::async_trait;
use reqwest::Client;

use super::{TransportBuildError, UpstreamError};

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Construct a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Return `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Posts one Overpass query to one endpoint.
///
/// Implementations return `Ok` for any HTTP response, whatever its status,
/// and reserve `Err` for exchanges that produced no response at all.
#[async_trait]
pub trait OverpassTransport: Send + Sync {
    /// Send `query` to `endpoint`.
    async fn post(&self, endpoint: &str, query: &str) -> Result<TransportResponse, UpstreamError>;
}

/// `reqwest`-backed transport posting form-encoded `data=<query>`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport that sends `user_agent` with every request.
    ///
    /// Timeouts are enforced by the client, not here.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] if the TLS backend cannot initialise.
    pub fn new(user_agent: &str) -> Result<Self, TransportBuildError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

fn convert_reqwest_error(error: &reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        return UpstreamError::Timeout;
    }
    UpstreamError::Network {
        message: error.to_string(),
    }
}

#[async_trait]
impl OverpassTransport for ReqwestTransport {
    async fn post(&self, endpoint: &str, query: &str) -> Result<TransportResponse, UpstreamError> {
        let response = self
            .client
            .post(endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err))?;
        Ok(TransportResponse { status, body })
    }
}
