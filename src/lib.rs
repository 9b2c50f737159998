//! Facade crate for the Sunspot sunlit-venue engine.
//!
//! This crate re-exports the core domain types and exposes the Overpass data
//! layer and the cache orchestrator behind feature flags.

#![forbid(unsafe_code)]

pub use sunspot_core::{
    AnalysisMeta, AnalysisResult, BoundingBox, BoundingBoxError, Building, BuildingError,
    OsmKind, SolarError, StoreError, SunPosition, SunlightStatus, Venue, VenueCategory,
    VenueStore, analyze, annotate_venues, sun_position,
};

#[cfg(feature = "data")]
pub use sunspot_data::{
    OverpassClient, OverpassClientConfig, OverpassExecutor, SqliteVenueStore, UpstreamError,
};

#[cfg(feature = "service")]
pub use sunspot_service::{ServiceError, VenueService};
