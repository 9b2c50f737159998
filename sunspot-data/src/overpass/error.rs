//! Error types for the Overpass client.

use thiserror::Error;

/// Failures observed while querying the Overpass API.
///
/// `Timeout`, `RetryableStatus`, `Network` and `Decode` describe a single
/// attempt and are retried by the client; callers only ever see
/// `FatalStatus` or `Exhausted`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The attempt exceeded the per-attempt timeout.
    #[error("Overpass request timed out")]
    Timeout,
    /// The mirror answered with a status worth retrying.
    #[error("Overpass mirror returned retryable status {status}")]
    RetryableStatus {
        /// HTTP status code.
        status: u16,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting Overpass: {message}")]
    Network {
        /// Transport-level detail.
        message: String,
    },
    /// A successful response carried a body that was not Overpass JSON.
    #[error("failed to decode Overpass response: {message}")]
    Decode {
        /// Decoder detail.
        message: String,
    },
    /// The mirror answered with a status that retrying will not fix.
    #[error("Overpass API returned status {status}")]
    FatalStatus {
        /// HTTP status code.
        status: u16,
    },
    /// Every attempt failed with a retryable error.
    #[error("Overpass API temporarily unavailable. Please try again later.")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
    },
}

impl UpstreamError {
    /// Return `true` when another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RetryableStatus { .. } | Self::Network { .. } | Self::Decode { .. }
        )
    }
}

/// Invalid [`OverpassClientConfig`](super::OverpassClientConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Failover needs at least two mirrors.
    #[error("at least two Overpass endpoints are required, got {count}")]
    TooFewEndpoints {
        /// Number of configured endpoints.
        count: usize,
    },
    /// An endpoint was not an absolute HTTP(S) URL.
    #[error("invalid Overpass endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Offending endpoint.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
    /// `max_attempts` was zero.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    /// `attempt_timeout` was zero.
    #[error("attempt_timeout must be greater than zero")]
    ZeroTimeout,
}

/// Failure to construct the HTTP transport.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {source}")]
pub struct TransportBuildError {
    /// Source error from `reqwest`.
    #[from]
    source: reqwest::Error,
}

/// Failure to construct an [`OverpassClient`](super::OverpassClient).
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP transport could not be built.
    #[error(transparent)]
    Transport(#[from] TransportBuildError),
}
