//! Overpass JSON response types.
//!
//! Only the fields the mapper reads are modelled; everything else in the
//! payload (`version`, `osm3s`, element metadata) is ignored.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use std::collections::HashMap;

use geo::Coord;
use serde::Deserialize;
use sunspot_core::OsmKind;

/// Top-level `[out:json]` document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OverpassResponse {
    /// Elements in the order Overpass returned them.
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// Element type tag. Unrecognised types deserialize as [`ElementKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `node`.
    Node,
    /// `way`.
    Way,
    /// `relation`.
    Relation,
    /// Any other type, such as `area` or `count`.
    #[serde(other)]
    Other,
}

impl ElementKind {
    /// Map onto the domain kind, if this is a real OSM element.
    #[must_use]
    pub const fn osm_kind(self) -> Option<OsmKind> {
        match self {
            Self::Node => Some(OsmKind::Node),
            Self::Way => Some(OsmKind::Way),
            Self::Relation => Some(OsmKind::Relation),
            Self::Other => None,
        }
    }
}

/// A `{lat, lon}` pair as used by `center` and `geometry`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl From<Coordinates> for Coord<f64> {
    fn from(value: Coordinates) -> Self {
        Self {
            x: value.lon,
            y: value.lat,
        }
    }
}

/// One element of an Overpass response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawElement {
    /// Element type.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// OSM identifier, unique per type.
    pub id: i64,
    /// Latitude; present on nodes.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude; present on nodes.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Centre point added by `out center`.
    #[serde(default)]
    pub center: Option<Coordinates>,
    /// Vertex list added by `out geom`.
    #[serde(default)]
    pub geometry: Vec<Coordinates>,
    /// Free-form OSM tags.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl RawElement {
    /// Direct coordinates, falling back to the `center` point.
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coord { x: lon, y: lat }),
            _ => self.center.map(Coord::from),
        }
    }

    /// Arithmetic mean of the `geometry` vertices, if any.
    #[must_use]
    pub fn geometry_centroid(&self) -> Option<Coord<f64>> {
        if self.geometry.is_empty() {
            return None;
        }
        let count = self.geometry.len() as f64;
        let (sum_lat, sum_lon) = self
            .geometry
            .iter()
            .fold((0.0, 0.0), |(lat, lon), point| (lat + point.lat, lon + point.lon));
        Some(Coord {
            x: sum_lon / count,
            y: sum_lat / count,
        })
    }
}
