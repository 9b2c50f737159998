//! Conversion of raw Overpass elements into domain entities.
//!
//! Venues come from nodes and ways carrying an allow-listed `amenity` and a
//! name; buildings come from ways tagged `building`. Elements without
//! resolvable coordinates are skipped.

mod height;
mod tags;

use std::str::FromStr;

use sunspot_core::{Building, OsmKind, Venue, VenueCategory};

use crate::overpass::{AMENITY_ALLOW_LIST, ElementKind, OverpassResponse, RawElement};

pub use height::{
    DEFAULT_BUILDING_HEIGHT_M, FLOOR_HEIGHT_M, estimate_height, leading_levels, leading_number,
};
pub use tags::{ElementTags, keys};

/// Venues and buildings extracted from one response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedElements {
    /// Venues, in response order.
    pub venues: Vec<Venue>,
    /// Buildings, in response order.
    pub buildings: Vec<Building>,
}

/// Map a whole response.
#[must_use]
pub fn map_response(response: &OverpassResponse) -> MappedElements {
    MappedElements {
        venues: to_venues(&response.elements),
        buildings: to_buildings(&response.elements),
    }
}

fn allowed_category(amenity: &str) -> Option<VenueCategory> {
    VenueCategory::from_str(amenity)
        .ok()
        .filter(|category| AMENITY_ALLOW_LIST.contains(category))
}

fn to_venue(element: &RawElement) -> Option<Venue> {
    let kind = match element.kind {
        ElementKind::Node => OsmKind::Node,
        ElementKind::Way => OsmKind::Way,
        ElementKind::Relation | ElementKind::Other => return None,
    };
    let tags = ElementTags::new(&element.tags);
    let name = tags.name()?;
    let category = allowed_category(tags.amenity()?)?;
    let location = element.position()?;

    let mut venue = Venue::new(kind, element.id, name, category, location.y, location.x);
    venue.address = tags.address();
    venue.outdoor_seating = tags.outdoor_seating();
    venue.phone = tags.phone().map(str::to_owned);
    venue.website = tags.website().map(str::to_owned);
    venue.opening_hours = tags.opening_hours().map(str::to_owned);
    Some(venue)
}

/// Extract venues from `elements`.
///
/// # Examples
/// ```
/// use sunspot_data::{OverpassResponse, to_venues};
///
/// let response: OverpassResponse = serde_json::from_str(r#"{"elements": [
///     {"type": "node", "id": 5, "lat": 52.5, "lon": 13.4,
///      "tags": {"amenity": "cafe", "name": "Ecke"}}
/// ]}"#)?;
/// let venues = to_venues(&response.elements);
/// assert_eq!(venues[0].id, "node/5");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn to_venues(elements: &[RawElement]) -> Vec<Venue> {
    elements.iter().filter_map(to_venue).collect()
}

fn to_building(element: &RawElement) -> Option<Building> {
    if element.kind != ElementKind::Way {
        return None;
    }
    let tags = ElementTags::new(&element.tags);
    if !tags.is_building() {
        return None;
    }
    let location = element
        .position()
        .or_else(|| element.geometry_centroid())?;
    let id = format!("{}/{}", OsmKind::Way, element.id);
    match Building::new(id, location.y, location.x, estimate_height(&tags)) {
        Ok(building) => Some(building),
        Err(err) => {
            log::debug!("skipping building: {err}");
            None
        }
    }
}

/// Extract buildings from `elements`.
#[must_use]
pub fn to_buildings(elements: &[RawElement]) -> Vec<Building> {
    elements.iter().filter_map(to_building).collect()
}
