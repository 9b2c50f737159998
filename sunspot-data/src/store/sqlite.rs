//! SQLite-backed venue store.
//!
//! One `venues` row per venue id. Writes are upserts inside a single
//! transaction; reads are a latitude/longitude range scan served by a
//! composite index. All SQLite work runs on Tokio's blocking pool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, Row, params};
use sunspot_core::{BoundingBox, StoreError, Venue, VenueCategory, VenueStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS venues (
    venue_id        TEXT PRIMARY KEY,
    osm_kind        TEXT,
    osm_id          INTEGER,
    name            TEXT NOT NULL,
    category        TEXT NOT NULL,
    latitude        REAL NOT NULL,
    longitude       REAL NOT NULL,
    address         TEXT,
    outdoor_seating INTEGER NOT NULL,
    phone           TEXT,
    website         TEXT,
    opening_hours   TEXT,
    last_synced     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS venues_lat_lon ON venues (latitude, longitude);
";

const UPSERT: &str = "
INSERT INTO venues (
    venue_id, osm_kind, osm_id, name, category, latitude, longitude,
    address, outdoor_seating, phone, website, opening_hours, last_synced
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
ON CONFLICT(venue_id) DO UPDATE SET
    osm_kind = excluded.osm_kind,
    osm_id = excluded.osm_id,
    name = excluded.name,
    category = excluded.category,
    latitude = excluded.latitude,
    longitude = excluded.longitude,
    address = excluded.address,
    outdoor_seating = excluded.outdoor_seating,
    phone = excluded.phone,
    website = excluded.website,
    opening_hours = excluded.opening_hours,
    last_synced = excluded.last_synced
";

const SELECT_IN_BBOX: &str = "
SELECT venue_id, name, category, latitude, longitude,
       address, outdoor_seating, phone, website, opening_hours
FROM venues
WHERE latitude BETWEEN ?1 AND ?2
  AND longitude BETWEEN ?3 AND ?4
ORDER BY venue_id
";

/// Read-write venue store backed by a single SQLite connection.
#[derive(Clone)]
pub struct SqliteVenueStore {
    connection: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl fmt::Debug for SqliteVenueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteVenueStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn query_error(err: &rusqlite::Error) -> StoreError {
    StoreError::Query {
        message: err.to_string(),
    }
}

fn join_error(err: &tokio::task::JoinError) -> StoreError {
    StoreError::Connection {
        message: format!("blocking store task failed: {err}"),
    }
}

impl SqliteVenueStore {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the file cannot be opened and
    /// [`StoreError::Query`] if the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|err| StoreError::Connection {
            message: format!("failed to open {}: {err}", path.display()),
        })?;
        Self::from_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// As for [`SqliteVenueStore::open`].
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|err| StoreError::Connection {
            message: err.to_string(),
        })?;
        Self::from_connection(connection, None)
    }

    fn from_connection(connection: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|err| query_error(&err))?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path,
        })
    }

    /// Database file, or `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn with_connection<F, T>(&self, work: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|_| StoreError::Connection {
                message: "SQLite connection lock poisoned".to_owned(),
            })?;
            work(&mut guard)
        })
        .await
        .map_err(|err| join_error(&err))?
    }
}

fn upsert_all(connection: &mut Connection, venues: &[Venue]) -> Result<(), rusqlite::Error> {
    let synced_at = Utc::now().to_rfc3339();
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare_cached(UPSERT)?;
        for venue in venues {
            statement.execute(params![
                venue.id,
                venue.osm_kind().map(|kind| kind.as_str()),
                venue.osm_id(),
                venue.name,
                venue.category.as_str(),
                venue.latitude,
                venue.longitude,
                venue.address,
                venue.outdoor_seating,
                venue.phone,
                venue.website,
                venue.opening_hours,
                synced_at,
            ])?;
        }
    }
    tx.commit()
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    let category: String = row.get(2)?;
    let category = category.parse::<VenueCategory>().map_err(|message| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    })?;
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        category,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        address: row.get(5)?,
        outdoor_seating: row.get(6)?,
        phone: row.get(7)?,
        website: row.get(8)?,
        opening_hours: row.get(9)?,
        sunlight_status: None,
    })
}

fn select_in_bbox(connection: &Connection, bbox: &BoundingBox) -> rusqlite::Result<Vec<Venue>> {
    let mut statement = connection.prepare_cached(SELECT_IN_BBOX)?;
    let rows = statement.query_map(
        params![bbox.south(), bbox.north(), bbox.west(), bbox.east()],
        venue_from_row,
    )?;
    rows.collect()
}

#[async_trait]
impl VenueStore for SqliteVenueStore {
    async fn upsert_many(&self, venues: &[Venue]) -> Result<(), StoreError> {
        if venues.is_empty() {
            return Ok(());
        }
        let venues = venues.to_vec();
        self.with_connection(move |connection| {
            upsert_all(connection, &venues).map_err(|err| query_error(&err))
        })
        .await
    }

    async fn find_by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError> {
        let bbox = *bbox;
        self.with_connection(move |connection| {
            select_in_bbox(connection, &bbox).map_err(|err| query_error(&err))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sunspot_core::{OsmKind, SunlightStatus};
    use tempfile::TempDir;

    #[fixture]
    fn venues() -> Vec<Venue> {
        let mut cafe = Venue::new(OsmKind::Node, 1, "Sonne", VenueCategory::Cafe, 52.51, 13.40);
        cafe.address = Some("Torstraße 12".to_owned());
        cafe.outdoor_seating = true;
        cafe.website = Some("https://sonne.example".to_owned());
        cafe.sunlight_status = Some(SunlightStatus::Sunny);
        let pub_on_edge = Venue::new(OsmKind::Way, 7, "Eck", VenueCategory::Pub, 52.50, 13.42);
        let far = Venue::new(OsmKind::Node, 9, "Fern", VenueCategory::Bar, 48.1, 11.5);
        vec![cafe, pub_on_edge, far]
    }

    fn bbox() -> BoundingBox {
        BoundingBox::new(52.50, 13.38, 52.52, 13.42).expect("valid bbox")
    }

    #[rstest]
    #[tokio::test]
    async fn round_trips_venue_attributes(venues: Vec<Venue>) {
        let store = SqliteVenueStore::open_in_memory().expect("open store");
        store.upsert_many(&venues).await.expect("upsert");

        let found = store.find_by_bbox(&bbox()).await.expect("query");

        let mut expected = venues[0].clone();
        expected.sunlight_status = None;
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], expected);
        assert_eq!(found[1].id, "way/7");
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_is_idempotent(venues: Vec<Venue>) {
        let store = SqliteVenueStore::open_in_memory().expect("open store");
        store.upsert_many(&venues).await.expect("first upsert");
        let first = store.find_by_bbox(&bbox()).await.expect("query");
        store.upsert_many(&venues).await.expect("second upsert");
        let second = store.find_by_bbox(&bbox()).await.expect("query");
        assert_eq!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn last_write_wins(venues: Vec<Venue>) {
        let store = SqliteVenueStore::open_in_memory().expect("open store");
        store.upsert_many(&venues).await.expect("upsert");
        let mut renamed = venues[0].clone();
        renamed.name = "Sonnendeck".to_owned();
        renamed.outdoor_seating = false;
        store
            .upsert_many(std::slice::from_ref(&renamed))
            .await
            .expect("upsert");

        let found = store.find_by_bbox(&bbox()).await.expect("query");
        assert_eq!(found[0].name, "Sonnendeck");
        assert!(!found[0].outdoor_seating);
        assert_eq!(found.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn stores_kind_and_id_columns(venues: Vec<Venue>) {
        let store = SqliteVenueStore::open_in_memory().expect("open store");
        store.upsert_many(&venues).await.expect("upsert");
        let columns = store
            .with_connection(|connection| {
                connection
                    .query_row(
                        "SELECT osm_kind, osm_id, last_synced FROM venues WHERE venue_id = 'way/7'",
                        [],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, i64>(1)?,
                                row.get::<_, String>(2)?,
                            ))
                        },
                    )
                    .map_err(|err| query_error(&err))
            })
            .await
            .expect("row");
        assert_eq!(columns.0, "way");
        assert_eq!(columns.1, 7);
        assert!(chrono::DateTime::parse_from_rfc3339(&columns.2).is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_upsert_is_noop() {
        let store = SqliteVenueStore::open_in_memory().expect("open store");
        store.upsert_many(&[]).await.expect("upsert");
        assert!(store.find_by_bbox(&bbox()).await.expect("query").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn persists_across_reopen(venues: Vec<Venue>) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("venues.db");
        {
            let store = SqliteVenueStore::open(&path).expect("open store");
            store.upsert_many(&venues).await.expect("upsert");
        }
        let reopened = SqliteVenueStore::open(&path).expect("reopen store");
        assert_eq!(reopened.path(), Some(path.as_path()));
        let found = reopened.find_by_bbox(&bbox()).await.expect("query");
        assert_eq!(found.len(), 2);
    }

    #[rstest]
    fn open_reports_unwritable_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("missing").join("venues.db");
        let err = SqliteVenueStore::open(&path).expect_err("open should fail");
        assert!(matches!(err, StoreError::Connection { .. }));
    }
}
