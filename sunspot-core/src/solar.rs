//! Sun position for a point on the ground.
//!
//! Positions come from the NREL Solar Position Algorithm without refraction
//! correction. The compass azimuth is kept alongside a south-referenced copy
//! in radians, which is what the shadow test consumes.

use chrono::{DateTime, Utc};
use solar_positioning::{spa, time::DeltaT};
use thiserror::Error;

use crate::geodesy::normalize_degrees;

/// Observer height above sea level; venues are treated as ground level.
const OBSERVER_ELEVATION_M: f64 = 0.0;

/// Errors raised by [`sun_position`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolarError {
    /// The ephemeris rejected the observer or the instant.
    #[error("solar position unavailable: {0}")]
    Ephemeris(#[from] solar_positioning::Error),
}

/// Sun position seen from a point on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SunPosition {
    /// Compass bearing of the sun in `[0, 360)`; 0 is north, clockwise.
    pub azimuth_degrees: f64,
    /// Elevation above the horizon in degrees; negative at night.
    pub altitude_degrees: f64,
    /// Azimuth measured clockwise from south, in `[-PI, PI)`.
    pub azimuth_radians: f64,
    /// Elevation above the horizon in radians.
    pub altitude_radians: f64,
}

impl SunPosition {
    /// Build a position from a compass azimuth and an elevation, in degrees.
    #[must_use]
    pub fn from_compass(azimuth_degrees: f64, altitude_degrees: f64) -> Self {
        let azimuth_degrees = normalize_degrees(azimuth_degrees);
        Self {
            azimuth_degrees,
            altitude_degrees,
            azimuth_radians: (azimuth_degrees - 180.0).to_radians(),
            altitude_radians: altitude_degrees.to_radians(),
        }
    }

    /// Return `true` while the sun is above the horizon.
    #[must_use]
    pub fn is_daytime(&self) -> bool {
        self.altitude_radians > 0.0
    }
}

/// Rotate a south-referenced azimuth (degrees) onto the compass.
///
/// ```
/// use sunspot_core::solar::compass_from_south;
///
/// assert_eq!(compass_from_south(0.0), 180.0);
/// assert_eq!(compass_from_south(-90.0), 90.0);
/// ```
#[must_use]
pub fn compass_from_south(south_degrees: f64) -> f64 {
    normalize_degrees(south_degrees + 180.0)
}

/// Compute the sun position for `latitude`/`longitude` (degrees) at `instant`.
///
/// # Errors
///
/// Returns [`SolarError::Ephemeris`] for coordinates outside the valid
/// latitude and longitude ranges, or an instant the ephemeris cannot date.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use sunspot_core::sun_position;
///
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// let sun = sun_position(48.1374, 11.5755, noon).unwrap();
/// assert!(sun.is_daytime());
/// assert!((0.0..360.0).contains(&sun.azimuth_degrees));
/// ```
pub fn sun_position(
    latitude: f64,
    longitude: f64,
    instant: DateTime<Utc>,
) -> Result<SunPosition, SolarError> {
    let delta_t = DeltaT::estimate_from_date_like(instant)?;
    let position = spa::solar_position(
        instant,
        latitude,
        longitude,
        OBSERVER_ELEVATION_M,
        delta_t,
        None,
    )?;
    Ok(SunPosition::from_compass(
        position.azimuth(),
        position.elevation_angle(),
    ))
}
