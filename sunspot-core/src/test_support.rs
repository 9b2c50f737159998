//! Test-only, in-memory `VenueStore` implementations used by unit and
//! behaviour tests across the workspace.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{BoundingBox, StoreError, Venue, VenueStore};

/// In-memory `VenueStore` keyed by venue id.
///
/// The store performs a linear scan and is intended only for small datasets.
#[derive(Debug, Default)]
pub struct MemoryVenueStore {
    venues: Mutex<BTreeMap<String, Venue>>,
    upserts: AtomicUsize,
}

impl MemoryVenueStore {
    /// Create a store pre-populated with `venues`.
    pub fn with_venues<I>(venues: I) -> Self
    where
        I: IntoIterator<Item = Venue>,
    {
        let map = venues
            .into_iter()
            .map(|mut venue| {
                venue.sunlight_status = None;
                (venue.id.clone(), venue)
            })
            .collect();
        Self {
            venues: Mutex::new(map),
            upserts: AtomicUsize::new(0),
        }
    }

    /// Snapshot of every stored venue, ordered by id.
    pub fn snapshot(&self) -> Vec<Venue> {
        self.venues
            .lock()
            .map(|guard| guard.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of completed `upsert_many` calls.
    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    fn poisoned() -> StoreError {
        StoreError::Connection {
            message: "memory store lock poisoned".to_owned(),
        }
    }
}

#[async_trait]
impl VenueStore for MemoryVenueStore {
    async fn upsert_many(&self, venues: &[Venue]) -> Result<(), StoreError> {
        {
            let mut guard = self.venues.lock().map_err(|_| Self::poisoned())?;
            for venue in venues {
                let mut stored = venue.clone();
                stored.sunlight_status = None;
                guard.insert(stored.id.clone(), stored);
            }
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError> {
        let guard = self.venues.lock().map_err(|_| Self::poisoned())?;
        Ok(guard
            .values()
            .filter(|venue| bbox.contains(venue.latitude, venue.longitude))
            .cloned()
            .collect())
    }
}

/// `VenueStore` whose every call fails with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingVenueStore {
    error: StoreError,
}

impl FailingVenueStore {
    /// Fail every call with `error`.
    pub const fn new(error: StoreError) -> Self {
        Self { error }
    }
}

impl Default for FailingVenueStore {
    fn default() -> Self {
        Self::new(StoreError::Connection {
            message: "store offline".to_owned(),
        })
    }
}

#[async_trait]
impl VenueStore for FailingVenueStore {
    async fn upsert_many(&self, _venues: &[Venue]) -> Result<(), StoreError> {
        Err(self.error.clone())
    }

    async fn find_by_bbox(&self, _bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError> {
        Err(self.error.clone())
    }
}
