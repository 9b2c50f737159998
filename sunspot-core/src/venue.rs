//! Venues and the enums describing them.
//!
//! A [`Venue`] is an outdoor-seating candidate derived from an OpenStreetMap
//! element. Its identifier, `"<kind>/<raw id>"`, is stable across re-fetches
//! and is the natural key for persistence.

use geo::Coord;

/// Amenity categories recognised as venues.
///
/// # Examples
/// ```
/// use sunspot_core::VenueCategory;
///
/// assert_eq!(VenueCategory::Biergarten.as_str(), "biergarten");
/// assert_eq!("pub".parse::<VenueCategory>(), Ok(VenueCategory::Pub));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VenueCategory {
    /// `amenity=bar`.
    Bar,
    /// `amenity=restaurant`.
    Restaurant,
    /// `amenity=cafe`.
    Cafe,
    /// `amenity=pub`.
    Pub,
    /// `amenity=biergarten`.
    Biergarten,
}

impl VenueCategory {
    /// Every recognised category, in query order.
    pub const ALL: [Self; 5] = [
        Self::Bar,
        Self::Restaurant,
        Self::Cafe,
        Self::Pub,
        Self::Biergarten,
    ];

    /// Return the OSM amenity value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Pub => "pub",
            Self::Biergarten => "biergarten",
        }
    }
}

impl std::fmt::Display for VenueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VenueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(Self::Bar),
            "restaurant" => Ok(Self::Restaurant),
            "cafe" => Ok(Self::Cafe),
            "pub" => Ok(Self::Pub),
            "biergarten" => Ok(Self::Biergarten),
            _ => Err(format!("unknown venue category '{s}'")),
        }
    }
}

/// Sunlight classification assigned by the shadow test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SunlightStatus {
    /// No nearby building shadows the venue.
    Sunny,
    /// Two or more buildings shadow the venue, or the sun is down.
    Shaded,
    /// Exactly one building shadows the venue.
    PartiallySunny,
}

impl SunlightStatus {
    /// Return the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Shaded => "shaded",
            Self::PartiallySunny => "partially_sunny",
        }
    }
}

impl std::fmt::Display for SunlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenStreetMap element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OsmKind {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of other elements.
    Relation,
}

impl OsmKind {
    /// Return the Overpass name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for OsmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OsmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            _ => Err(format!("unknown OSM element kind '{s}'")),
        }
    }
}

/// A bar, café or restaurant that may have outdoor seating.
///
/// # Examples
/// ```
/// use sunspot_core::{OsmKind, Venue, VenueCategory};
///
/// let venue = Venue::new(OsmKind::Node, 42, "Zur Sonne", VenueCategory::Pub, 52.5, 13.4);
/// assert_eq!(venue.id, "node/42");
/// assert_eq!(venue.osm_kind(), Some(OsmKind::Node));
/// assert_eq!(venue.osm_id(), Some(42));
/// assert!(venue.sunlight_status.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Venue {
    /// `"<kind>/<raw id>"`, e.g. `node/42`.
    pub id: String,
    /// Display name from the `name` tag.
    pub name: String,
    /// Amenity category.
    pub category: VenueCategory,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// `"<street> <house number>"` or just the street.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub address: Option<String>,
    /// Whether the venue declares outdoor seating.
    pub outdoor_seating: bool,
    /// Contact phone number.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub phone: Option<String>,
    /// Website URL.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub website: Option<String>,
    /// Raw `opening_hours` value.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub opening_hours: Option<String>,
    /// Exposure assigned by the shadow test; absent until analysed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sunlight_status: Option<SunlightStatus>,
}

impl Venue {
    /// Construct a venue with no optional attributes.
    #[must_use]
    pub fn new(
        kind: OsmKind,
        raw_id: i64,
        name: impl Into<String>,
        category: VenueCategory,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: format!("{kind}/{raw_id}"),
            name: name.into(),
            category,
            latitude,
            longitude,
            address: None,
            outdoor_seating: false,
            phone: None,
            website: None,
            opening_hours: None,
            sunlight_status: None,
        }
    }

    /// Position with `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Element kind encoded in the identifier, if well-formed.
    #[must_use]
    pub fn osm_kind(&self) -> Option<OsmKind> {
        let (kind, _) = self.id.split_once('/')?;
        kind.parse().ok()
    }

    /// Raw OSM identifier encoded in the identifier, if well-formed.
    #[must_use]
    pub fn osm_id(&self) -> Option<i64> {
        let (_, raw) = self.id.split_once('/')?;
        raw.parse().ok()
    }
}
