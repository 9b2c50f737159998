//! Cache orchestration for sunlight analysis.
//!
//! [`VenueService`] runs one pipeline per request: fetch live geodata, map it,
//! classify every venue against the sun and return. Fetched venues are
//! written to the [`VenueStore`] in the background. When the upstream client
//! fails the store is read instead, with no buildings to cast shadows.
//!
//! Responsibilities:
//! - Decide between live and cached data.
//! - Own the background write tasks.
//!
//! Boundaries:
//! - No HTTP routing; callers map [`ServiceError::status_code`] to a response.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sunspot_core::shadow::ShadowAnalyzer;
use sunspot_core::{
    AnalysisResult, BoundingBox, Building, SolarError, StoreError, Venue, VenueStore, sun_position,
};
use sunspot_data::{OverpassExecutor, UpstreamError, build_bbox_query, map_response};
use thiserror::Error;
use tokio_util::task::TaskTracker;

/// Status reported for every failure without a more specific upstream code.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Errors returned by [`VenueService`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The upstream client failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    /// The upstream client failed and the cached venues could not be read.
    #[error("venue cache unavailable after upstream failure ({upstream}): {source}")]
    CacheRead {
        /// Failure that triggered the fallback.
        upstream: UpstreamError,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// The sun position for the area could not be computed.
    #[error(transparent)]
    SunPosition(#[from] SolarError),
}

impl ServiceError {
    /// HTTP status a routing layer should answer with.
    ///
    /// A fatal upstream status passes through; everything else is `503`.
    ///
    /// # Examples
    /// ```
    /// use sunspot_data::UpstreamError;
    /// use sunspot_service::ServiceError;
    ///
    /// let err = ServiceError::Upstream(UpstreamError::FatalStatus { status: 400 });
    /// assert_eq!(err.status_code(), 400);
    /// let err = ServiceError::Upstream(UpstreamError::Exhausted { attempts: 3 });
    /// assert_eq!(err.status_code(), 503);
    /// ```
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Upstream(UpstreamError::FatalStatus { status })
            | Self::CacheRead {
                upstream: UpstreamError::FatalStatus { status },
                ..
            } => *status,
            _ => SERVICE_UNAVAILABLE,
        }
    }

    /// The upstream failure behind this error, if any.
    #[must_use]
    pub const fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            Self::Upstream(upstream) | Self::CacheRead { upstream, .. } => Some(upstream),
            Self::SunPosition(_) => None,
        }
    }
}

/// Live-first venue analysis with a write-through cache.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Utc;
/// use sunspot_core::BoundingBox;
/// use sunspot_data::{OverpassClient, OverpassClientConfig, SqliteVenueStore};
/// use sunspot_service::VenueService;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OverpassClient::from_config(OverpassClientConfig::default())?;
/// let store = Arc::new(SqliteVenueStore::open("sunspot.db")?);
/// let service = VenueService::new(client, store);
///
/// let bbox = BoundingBox::new(52.52, 13.40, 52.53, 13.42)?;
/// let result = service.analyze(&bbox, Utc::now()).await?;
/// service.drain_background_writes().await;
/// println!("{} venues", result.meta.venue_count);
/// # Ok(())
/// # }
/// ```
pub struct VenueService<E, S: ?Sized> {
    executor: E,
    store: Arc<S>,
    analyzer: ShadowAnalyzer,
    writes: TaskTracker,
}

impl<E, S: ?Sized> fmt::Debug for VenueService<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueService")
            .field("analyzer", &self.analyzer)
            .field("pending_writes", &self.writes.len())
            .finish_non_exhaustive()
    }
}

impl<E, S> VenueService<E, S>
where
    E: OverpassExecutor,
    S: VenueStore + ?Sized + 'static,
{
    /// Build a service from its collaborators.
    pub fn new(executor: E, store: Arc<S>) -> Self {
        Self {
            executor,
            store,
            analyzer: ShadowAnalyzer::default(),
            writes: TaskTracker::new(),
        }
    }

    /// Replace the shadow analyser.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: ShadowAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Upstream executor.
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Backing store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Classify the venues inside `bbox` at `timestamp`.
    ///
    /// Live data is preferred. Any upstream failure is logged and answered
    /// from the store; such results are marked [`AnalysisResult::from_cache`].
    /// An area the store has never seen yields an empty cached result.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CacheRead`] when both sources fail and
    /// [`ServiceError::SunPosition`] when the sun position cannot be computed.
    pub async fn analyze(
        &self,
        bbox: &BoundingBox,
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult, ServiceError> {
        match self.analyze_live(bbox, timestamp).await {
            Err(ServiceError::Upstream(upstream)) => {
                self.analyze_cached(bbox, timestamp, upstream).await
            }
            outcome => outcome,
        }
    }

    /// Classify live venues only, never consulting the store.
    ///
    /// Fetched venues are still persisted in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Upstream`] when the executor fails and
    /// [`ServiceError::SunPosition`] when classification fails.
    pub async fn analyze_live(
        &self,
        bbox: &BoundingBox,
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult, ServiceError> {
        let query = build_bbox_query(bbox);
        let response = self.executor.execute(&query).await?;
        let mapped = map_response(&response);
        log::debug!(
            "fetched {} venues and {} buildings",
            mapped.venues.len(),
            mapped.buildings.len()
        );
        self.persist_in_background(mapped.venues.clone());
        self.classify(bbox, mapped.venues, &mapped.buildings, timestamp)
    }

    async fn analyze_cached(
        &self,
        bbox: &BoundingBox,
        timestamp: DateTime<Utc>,
        upstream: UpstreamError,
    ) -> Result<AnalysisResult, ServiceError> {
        log::warn!("upstream unavailable, serving cached venues: {upstream}");
        let venues = match self.store.find_by_bbox(bbox).await {
            Ok(venues) => venues,
            Err(source) => return Err(ServiceError::CacheRead { upstream, source }),
        };
        if venues.is_empty() {
            log::warn!("venue cache holds nothing for {bbox:?}; answering with no venues");
        }
        Ok(self.classify(bbox, venues, &[], timestamp)?.from_cache())
    }

    fn classify(
        &self,
        bbox: &BoundingBox,
        mut venues: Vec<Venue>,
        buildings: &[Building],
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult, ServiceError> {
        let centre = bbox.centre();
        let sun = sun_position(centre.y, centre.x, timestamp)?;
        self.analyzer.analyze_all(&mut venues, buildings, &sun);
        Ok(AnalysisResult::new(venues, sun, timestamp, buildings.len()))
    }

    fn persist_in_background(&self, venues: Vec<Venue>) {
        if venues.is_empty() {
            return;
        }
        let store = Arc::clone(&self.store);
        self.writes.spawn(async move {
            if let Err(err) = store.upsert_many(&venues).await {
                log::warn!("background venue write failed: {err}");
            }
        });
    }

    /// Number of background writes still running.
    pub fn pending_background_writes(&self) -> usize {
        self.writes.len()
    }

    /// Wait for every background write spawned so far.
    ///
    /// The service keeps accepting requests afterwards.
    pub async fn drain_background_writes(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }
}

#[cfg(test)]
mod tests;
