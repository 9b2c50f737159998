//! Persistence port for venues.
//!
//! The store is the fallback source when the upstream geodata service is
//! unavailable. It is written in the background after every successful fetch
//! and read only on failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::{BoundingBox, Venue};

/// Errors raised by [`VenueStore`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be opened or reached.
    #[error("venue store unavailable: {message}")]
    Connection {
        /// Backend-specific detail.
        message: String,
    },
    /// A read or write failed.
    #[error("venue store query failed: {message}")]
    Query {
        /// Backend-specific detail.
        message: String,
    },
}

/// Keyed venue persistence with a bounding-box range query.
///
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Insert or replace venues keyed by [`Venue::id`].
    ///
    /// Applying the same collection twice leaves the store unchanged.
    /// [`Venue::sunlight_status`] is transient and never stored. An empty
    /// slice is a no-op.
    async fn upsert_many(&self, venues: &[Venue]) -> Result<(), StoreError>;

    /// Return every stored venue whose coordinates fall inside `bbox`
    /// (edges inclusive), ordered by id.
    async fn find_by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError>;
}

#[async_trait]
impl<S> VenueStore for std::sync::Arc<S>
where
    S: VenueStore + ?Sized,
{
    async fn upsert_many(&self, venues: &[Venue]) -> Result<(), StoreError> {
        (**self).upsert_many(venues).await
    }

    async fn find_by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError> {
        (**self).find_by_bbox(bbox).await
    }
}
