//! Persistent `VenueStore` implementations.

mod sqlite;

pub use sqlite::SqliteVenueStore;
