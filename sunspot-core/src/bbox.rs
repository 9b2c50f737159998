//! Axis-aligned latitude/longitude rectangles.
//!
//! A [`BoundingBox`] is the unit of every query: the upstream geodata
//! request, the cached-venue lookup and the sun-position centroid all derive
//! from it.

use geo::Coord;
use thiserror::Error;

/// Errors returned by [`BoundingBox::new`] and [`BoundingBox::ensure_max_span`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// A coordinate was NaN or infinite.
    #[error("bounding box {field} must be a finite number")]
    NonFinite {
        /// Name of the offending edge.
        field: &'static str,
    },
    /// A latitude edge fell outside `[-90, 90]`.
    #[error("{field} latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Name of the offending edge.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A longitude edge fell outside `[-180, 180]`.
    #[error("{field} longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Name of the offending edge.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// `south` was not strictly less than `north`.
    #[error("south ({south}) must be less than north ({north})")]
    InvertedLatitude {
        /// Southern edge.
        south: f64,
        /// Northern edge.
        north: f64,
    },
    /// `west` was not strictly less than `east`.
    #[error("west ({west}) must be less than east ({east})")]
    InvertedLongitude {
        /// Western edge.
        west: f64,
        /// Eastern edge.
        east: f64,
    },
    /// The box is wider or taller than the caller allows.
    #[error("bounding box spans {span} degrees, exceeding the {max} degree limit")]
    SpanTooLarge {
        /// Largest of the latitude and longitude spans.
        span: f64,
        /// Configured limit.
        max: f64,
    },
}

/// A validated WGS84 rectangle in degrees.
///
/// Regions crossing the antimeridian are not modelled; callers must split
/// them into two boxes.
///
/// # Examples
/// ```
/// use sunspot_core::BoundingBox;
///
/// let bbox = BoundingBox::new(52.50, 13.38, 52.52, 13.42)?;
/// let centre = bbox.centre();
/// assert!((centre.y - 52.51).abs() < 1e-9);
/// assert!((centre.x - 13.40).abs() < 1e-9);
/// # Ok::<(), sunspot_core::BoundingBoxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl BoundingBox {
    /// Validate and construct a bounding box from its four edges.
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError`] when an edge is not finite, lies outside
    /// the valid WGS84 range, or when the box is empty or inverted.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        for (field, value) in [
            ("south", south),
            ("west", west),
            ("north", north),
            ("east", east),
        ] {
            if !value.is_finite() {
                return Err(BoundingBoxError::NonFinite { field });
            }
        }
        for (field, value) in [("south", south), ("north", north)] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(BoundingBoxError::LatitudeOutOfRange { field, value });
            }
        }
        for (field, value) in [("west", west), ("east", east)] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(BoundingBoxError::LongitudeOutOfRange { field, value });
            }
        }
        if south >= north {
            return Err(BoundingBoxError::InvertedLatitude { south, north });
        }
        if west >= east {
            return Err(BoundingBoxError::InvertedLongitude { west, east });
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Southern edge in degrees latitude.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Western edge in degrees longitude.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Northern edge in degrees latitude.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Eastern edge in degrees longitude.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Arithmetic midpoint (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn centre(&self) -> Coord<f64> {
        Coord {
            x: (self.west + self.east) / 2.0,
            y: (self.south + self.north) / 2.0,
        }
    }

    /// Return `true` when the point lies inside the box. Edges are inclusive.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// Reject boxes whose latitude or longitude span exceeds `max_degrees`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError::SpanTooLarge`] with the larger span.
    pub fn ensure_max_span(&self, max_degrees: f64) -> Result<(), BoundingBoxError> {
        let span = (self.north - self.south).max(self.east - self.west);
        if span > max_degrees {
            return Err(BoundingBoxError::SpanTooLarge {
                span,
                max: max_degrees,
            });
        }
        Ok(())
    }
}
