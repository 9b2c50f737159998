//! Point-and-height shadow test.
//!
//! A building shadows a venue when the venue lies inside the building's
//! shadow: close enough that the shadow reaches it and roughly in the
//! direction the shadow falls. Footprints are not modelled.

use geo::Coord;

use crate::geodesy::{angular_difference, haversine_distance, initial_bearing, normalize_degrees};
use crate::{Building, SunPosition, SunlightStatus, Venue};

/// Buildings further away than this are never considered.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 100.0;

/// Maximum angle between the shadow direction and the building-to-venue
/// bearing.
pub const DEFAULT_BEARING_TOLERANCE_DEG: f64 = 45.0;

/// Classifies venues against nearby buildings.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sunspot_core::{SunlightStatus, shadow::ShadowAnalyzer};
///
/// let analyzer = ShadowAnalyzer::default();
/// let status = analyzer.analyze(Coord { x: 0.0, y: 0.0 }, &[], 90.0, 0.5);
/// assert_eq!(status, SunlightStatus::Sunny);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowAnalyzer {
    search_radius_m: f64,
    bearing_tolerance_deg: f64,
}

impl Default for ShadowAnalyzer {
    fn default() -> Self {
        Self {
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            bearing_tolerance_deg: DEFAULT_BEARING_TOLERANCE_DEG,
        }
    }
}

impl ShadowAnalyzer {
    /// Override the candidate search radius in metres.
    #[must_use]
    pub const fn with_search_radius(mut self, metres: f64) -> Self {
        self.search_radius_m = metres;
        self
    }

    /// Override the bearing tolerance in degrees.
    #[must_use]
    pub const fn with_bearing_tolerance(mut self, degrees: f64) -> Self {
        self.bearing_tolerance_deg = degrees;
        self
    }

    /// Candidate search radius in metres.
    #[must_use]
    pub const fn search_radius_m(&self) -> f64 {
        self.search_radius_m
    }

    /// Bearing tolerance in degrees.
    #[must_use]
    pub const fn bearing_tolerance_deg(&self) -> f64 {
        self.bearing_tolerance_deg
    }

    /// Classify one venue location.
    ///
    /// The sun is below the horizon when `sun_altitude_rad <= 0`, in which
    /// case every venue is shaded regardless of buildings.
    #[must_use]
    pub fn analyze(
        &self,
        venue: Coord<f64>,
        buildings: &[Building],
        sun_azimuth_deg: f64,
        sun_altitude_rad: f64,
    ) -> SunlightStatus {
        if sun_altitude_rad <= 0.0 {
            return SunlightStatus::Shaded;
        }
        let shadow_direction = normalize_degrees(sun_azimuth_deg + 180.0);
        let tan_altitude = sun_altitude_rad.tan();

        let shadows = buildings
            .iter()
            .filter(|building| self.casts_shadow(building, venue, shadow_direction, tan_altitude))
            .take(2)
            .count();

        match shadows {
            0 => SunlightStatus::Sunny,
            1 => SunlightStatus::PartiallySunny,
            _ => SunlightStatus::Shaded,
        }
    }

    fn casts_shadow(
        &self,
        building: &Building,
        venue: Coord<f64>,
        shadow_direction: f64,
        tan_altitude: f64,
    ) -> bool {
        let origin = building.location();
        let distance = haversine_distance(origin, venue);
        if distance <= 0.0 || distance >= self.search_radius_m {
            return false;
        }
        let shadow_length = building.height_meters() / tan_altitude;
        if !shadow_length.is_finite() || shadow_length <= 0.0 || shadow_length <= distance {
            return false;
        }
        let bearing = initial_bearing(origin, venue);
        angular_difference(bearing, shadow_direction) < self.bearing_tolerance_deg
    }

    /// Assign a [`SunlightStatus`] to every venue in place.
    pub fn analyze_all(&self, venues: &mut [Venue], buildings: &[Building], sun: &SunPosition) {
        for venue in venues {
            venue.sunlight_status = Some(self.analyze(
                venue.location(),
                buildings,
                sun.azimuth_degrees,
                sun.altitude_radians,
            ));
        }
    }
}

/// Classify one venue with the default radius and tolerance.
#[must_use]
pub fn analyze(
    venue: Coord<f64>,
    buildings: &[Building],
    sun_azimuth_deg: f64,
    sun_altitude_rad: f64,
) -> SunlightStatus {
    ShadowAnalyzer::default().analyze(venue, buildings, sun_azimuth_deg, sun_altitude_rad)
}

/// Annotate `venues` in place with the default analyzer.
pub fn annotate_venues(venues: &mut [Venue], buildings: &[Building], sun: &SunPosition) {
    ShadowAnalyzer::default().analyze_all(venues, buildings, sun);
}
