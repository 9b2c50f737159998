//! Data access for the Sunspot engine.
//!
//! Responsibilities:
//! - Build Overpass queries and execute them across mirror endpoints.
//! - Map raw OSM elements into the venues and buildings of `sunspot-core`.
//! - Persist venues in SQLite for offline fallback.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `sunspot-core`).
//! - Keep blocking I/O off async executors.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod mapper;
pub mod overpass;
pub mod store;

pub use mapper::{MappedElements, map_response, to_buildings, to_venues};
pub use overpass::{
    ClientBuildError, ConfigError, OverpassClient, OverpassClientConfig, OverpassExecutor,
    OverpassResponse, RawElement, ReqwestTransport, TransportBuildError, UpstreamError,
    build_bbox_query,
};
pub use store::SqliteVenueStore;
