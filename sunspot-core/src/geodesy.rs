//! Great-circle helpers on a spherical Earth.
//!
//! Coordinates use `x = longitude`, `y = latitude` in degrees. Every helper
//! measures on a sphere of [`EARTH_RADIUS_M`], not geo's default
//! `Haversine` radius of 6 371 008.8 m.

use geo::{Bearing, Coord, Destination, Distance, HaversineMeasure, Point};

/// Mean Earth radius used for all distance computations.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const SPHERE: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_M);

/// Haversine distance between two points in metres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sunspot_core::geodesy::haversine_distance;
///
/// let d = haversine_distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 });
/// assert!((d - 111_194.9).abs() < 1.0);
/// ```
#[must_use]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    SPHERE.distance(Point::from(from), Point::from(to))
}

/// Initial compass bearing from `from` towards `to`, in `[0, 360)` degrees.
#[must_use]
pub fn initial_bearing(from: Coord<f64>, to: Coord<f64>) -> f64 {
    normalize_degrees(SPHERE.bearing(Point::from(from), Point::from(to)))
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shorter angular distance between two bearings, in `[0, 180]`.
#[must_use]
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff)
}

/// Offset `origin` by `distance_m` metres along `bearing_deg`.
///
/// Used to place fixtures at exact distances and bearings.
#[must_use]
pub fn destination(origin: Coord<f64>, distance_m: f64, bearing_deg: f64) -> Coord<f64> {
    SPHERE
        .destination(Point::from(origin), bearing_deg, distance_m)
        .0
}
