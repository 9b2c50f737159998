//! Core domain types for the Sunspot engine.
//!
//! These models answer one question: which venues inside a map area are in
//! direct sunlight right now. The crate holds the pure parts of that answer
//! (bounding boxes, venues, buildings, the solar ephemeris and the shadow
//! test) together with the [`VenueStore`] port used for persistence.
//!
//! Constructors return `Result` to surface invalid input early.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analysis;
pub mod bbox;
pub mod building;
pub mod geodesy;
pub mod shadow;
pub mod solar;
pub mod store;
pub mod venue;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use analysis::{AnalysisMeta, AnalysisResult};
pub use bbox::{BoundingBox, BoundingBoxError};
pub use building::{Building, BuildingError};
pub use shadow::{analyze, annotate_venues};
pub use solar::{SolarError, SunPosition, sun_position};
pub use store::{StoreError, VenueStore};
pub use venue::{OsmKind, SunlightStatus, Venue, VenueCategory};
