//! Mirror-rotating Overpass client.

use std::time::Duration;

use async_trait::async_trait;

use super::retry::{RETRYABLE_STATUSES, RetryDecision, RetryPolicy};
use super::{
    ClientBuildError, ConfigError, OverpassResponse, OverpassTransport, ReqwestTransport,
    TransportResponse, UpstreamError,
};

/// Public Overpass mirrors, tried in order.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "sunspot/0.1";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

/// Executes Overpass QL queries.
///
/// The seam between the orchestrator and the network; tests substitute
/// [`StubExecutor`](super::test_support::StubExecutor).
#[async_trait]
pub trait OverpassExecutor: Send + Sync {
    /// Run `query` and decode the response.
    async fn execute(&self, query: &str) -> Result<OverpassResponse, UpstreamError>;
}

/// Configuration for [`OverpassClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassClientConfig {
    /// Interchangeable mirrors; attempt `n` uses `endpoints[n % len]`.
    pub endpoints: Vec<String>,
    /// Attempts per call, including the first.
    pub max_attempts: u32,
    /// Backoff unit; the `n`-th failure waits `n * backoff_base`.
    pub backoff_base: Duration,
    /// Hard limit for a single attempt.
    pub attempt_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassClientConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_owned()).collect(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassClientConfig {
    /// Replace the mirror list.
    #[must_use]
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff unit.
    #[must_use]
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the configuration before use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for fewer than two endpoints, an endpoint that
    /// is not an absolute HTTP(S) URL, zero attempts or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.len() < 2 {
            return Err(ConfigError::TooFewEndpoints {
                count: self.endpoints.len(),
            });
        }
        for endpoint in &self.endpoints {
            validate_endpoint(endpoint)?;
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.attempt_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Retry policy derived from this configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_base, self.endpoints.len())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(endpoint).map_err(|err| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Overpass client with timeout, retry and mirror failover.
///
/// # Failure handling
///
/// Timeouts, network failures, undecodable bodies and the statuses in
/// [`RETRYABLE_STATUSES`] move on to the next mirror after a linear backoff.
/// Any other non-2xx status is returned at once as
/// [`UpstreamError::FatalStatus`]. When every attempt fails the caller gets
/// [`UpstreamError::Exhausted`]; the underlying error only reaches the log.
#[derive(Debug)]
pub struct OverpassClient<T> {
    transport: T,
    config: OverpassClientConfig,
    policy: RetryPolicy,
}

impl<T: OverpassTransport> OverpassClient<T> {
    /// Create a client over an explicit transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(transport: T, config: OverpassClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = config.retry_policy();
        Ok(Self {
            transport,
            config,
            policy,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassClientConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    async fn attempt(&self, endpoint: &str, query: &str) -> Result<OverpassResponse, UpstreamError> {
        let exchange = tokio::time::timeout(
            self.config.attempt_timeout,
            self.transport.post(endpoint, query),
        )
        .await
        .map_err(|_| UpstreamError::Timeout)??;
        classify(exchange)
    }
}

impl OverpassClient<ReqwestTransport> {
    /// Create a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn from_config(config: OverpassClientConfig) -> Result<Self, ClientBuildError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::new(transport, config)?)
    }
}

fn classify(response: TransportResponse) -> Result<OverpassResponse, UpstreamError> {
    if response.is_success() {
        return serde_json::from_str(&response.body).map_err(|err| UpstreamError::Decode {
            message: err.to_string(),
        });
    }
    if RETRYABLE_STATUSES.contains(&response.status) {
        return Err(UpstreamError::RetryableStatus {
            status: response.status,
        });
    }
    Err(UpstreamError::FatalStatus {
        status: response.status,
    })
}

#[async_trait]
impl<T: OverpassTransport> OverpassExecutor for OverpassClient<T> {
    async fn execute(&self, query: &str) -> Result<OverpassResponse, UpstreamError> {
        let mut state = self.policy.start();
        loop {
            let endpoint = self
                .config
                .endpoints
                .get(state.endpoint())
                .ok_or(UpstreamError::Exhausted {
                    attempts: state.attempt(),
                })?;
            log::debug!(
                "Overpass attempt {} of {} via {endpoint}",
                state.attempt() + 1,
                self.policy.max_attempts()
            );

            let error = match self.attempt(endpoint, query).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };
            log::debug!("Overpass attempt via {endpoint} failed: {error}");

            match state.on_failure(error) {
                RetryDecision::Retry { delay, .. } => tokio::time::sleep(delay).await,
                RetryDecision::Fail(error) => return Err(error),
            }
        }
    }
}
