//! Buildings that may cast shadows.
//!
//! Buildings live for a single analysis run and are never persisted.

use geo::Coord;
use thiserror::Error;

/// Errors returned by [`Building::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildingError {
    /// The height was zero, negative or not finite.
    #[error("building {id} has invalid height {height}")]
    InvalidHeight {
        /// Identifier of the rejected building.
        id: String,
        /// Rejected height in metres.
        height: f64,
    },
}

/// A building reduced to a point and a height.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// `"<kind>/<raw id>"` of the source element.
    pub id: String,
    /// WGS84 latitude of the footprint centre.
    pub latitude: f64,
    /// WGS84 longitude of the footprint centre.
    pub longitude: f64,
    height_meters: f64,
}

impl Building {
    /// Validate and construct a building.
    ///
    /// # Errors
    ///
    /// Returns [`BuildingError::InvalidHeight`] unless `height_meters` is a
    /// finite positive number.
    ///
    /// # Examples
    /// ```
    /// use sunspot_core::Building;
    ///
    /// let building = Building::new("way/1", 52.5, 13.4, 12.0)?;
    /// assert_eq!(building.height_meters(), 12.0);
    /// assert!(Building::new("way/2", 52.5, 13.4, 0.0).is_err());
    /// # Ok::<(), sunspot_core::BuildingError>(())
    /// ```
    pub fn new(
        id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        height_meters: f64,
    ) -> Result<Self, BuildingError> {
        let id = id.into();
        if !height_meters.is_finite() || height_meters <= 0.0 {
            return Err(BuildingError::InvalidHeight {
                id,
                height: height_meters,
            });
        }
        Ok(Self {
            id,
            latitude,
            longitude,
            height_meters,
        })
    }

    /// Height in metres; always finite and positive.
    #[must_use]
    pub const fn height_meters(&self) -> f64 {
        self.height_meters
    }

    /// Position with `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}
