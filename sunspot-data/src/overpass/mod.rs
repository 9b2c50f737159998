//! Resilient access to the Overpass API.
//!
//! The [`OverpassClient`] posts a query built by [`build_bbox_query`] to a
//! rotating list of mirror endpoints. Each attempt is bounded by a timeout;
//! transient failures are retried with linear backoff by a small
//! [`RetryPolicy`] state machine, while other HTTP errors are surfaced at
//! once.
//!
//! HTTP itself sits behind [`OverpassTransport`] so tests can script
//! responses without a network.
//!
//! # Example
//!
//! ```no_run
//! use sunspot_core::BoundingBox;
//! use sunspot_data::overpass::{
//!     OverpassClient, OverpassClientConfig, OverpassExecutor, build_bbox_query,
//! };
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverpassClientConfig::default()
//!     .with_attempt_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let client = OverpassClient::from_config(config)?;
//!
//! let bbox = BoundingBox::new(52.50, 13.38, 52.52, 13.42)?;
//! let response = client.execute(&build_bbox_query(&bbox)).await?;
//! println!("{} elements", response.elements.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod query;
mod response;
mod retry;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use client::{
    DEFAULT_ENDPOINTS, DEFAULT_USER_AGENT, OverpassClient, OverpassClientConfig, OverpassExecutor,
};
pub use error::{ClientBuildError, ConfigError, TransportBuildError, UpstreamError};
pub use query::{AMENITY_ALLOW_LIST, BUILDING_LEVELS_PATTERN, build_bbox_query};
pub use response::{Coordinates, ElementKind, OverpassResponse, RawElement};
pub use retry::{RETRYABLE_STATUSES, RetryDecision, RetryPolicy, RetryState};
pub use transport::{OverpassTransport, ReqwestTransport, TransportResponse};
