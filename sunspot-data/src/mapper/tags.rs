//! Typed lookup over an element's tag bag.

use std::collections::HashMap;

/// OSM tag keys the mapper reads. Every other key is ignored.
pub mod keys {
    /// Display name.
    pub const NAME: &str = "name";
    /// Point-of-interest category.
    pub const AMENITY: &str = "amenity";
    /// `yes` when the venue has outdoor seating.
    pub const OUTDOOR_SEATING: &str = "outdoor_seating";
    /// Street name.
    pub const STREET: &str = "addr:street";
    /// House number.
    pub const HOUSE_NUMBER: &str = "addr:housenumber";
    /// Phone number.
    pub const PHONE: &str = "phone";
    /// Phone number, `contact:` namespace.
    pub const CONTACT_PHONE: &str = "contact:phone";
    /// Website URL.
    pub const WEBSITE: &str = "website";
    /// Website URL, `contact:` namespace.
    pub const CONTACT_WEBSITE: &str = "contact:website";
    /// Opening hours in OSM syntax.
    pub const OPENING_HOURS: &str = "opening_hours";
    /// Marks an element as a building.
    pub const BUILDING: &str = "building";
    /// Height, usually in metres with optional unit.
    pub const HEIGHT: &str = "height";
    /// Height, `building:` namespace.
    pub const BUILDING_HEIGHT: &str = "building:height";
    /// Floors above ground.
    pub const BUILDING_LEVELS: &str = "building:levels";
    /// Floors above ground, short form.
    pub const LEVELS: &str = "levels";
}

/// Borrowed view over raw OSM tags.
///
/// Values that are empty or only whitespace count as absent.
#[derive(Debug, Clone, Copy)]
pub struct ElementTags<'a> {
    tags: &'a HashMap<String, String>,
}

impl<'a> ElementTags<'a> {
    /// Wrap a tag map.
    #[must_use]
    pub const fn new(tags: &'a HashMap<String, String>) -> Self {
        Self { tags }
    }

    /// Value of `key`, unless missing or blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Value of the first key in `keys` that is present.
    #[must_use]
    pub fn first_of(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates.iter().find_map(|key| self.get(key))
    }

    /// `name` tag.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.get(keys::NAME)
    }

    /// `amenity` tag.
    #[must_use]
    pub fn amenity(&self) -> Option<&'a str> {
        self.get(keys::AMENITY)
    }

    /// `true` only when `outdoor_seating=yes`.
    #[must_use]
    pub fn outdoor_seating(&self) -> bool {
        self.get(keys::OUTDOOR_SEATING) == Some("yes")
    }

    /// `"<street> <number>"`, the street alone, or nothing.
    ///
    /// A house number without a street is discarded.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        let street = self.get(keys::STREET)?;
        Some(match self.get(keys::HOUSE_NUMBER) {
            Some(number) => format!("{street} {number}"),
            None => street.to_owned(),
        })
    }

    /// `phone`, falling back to `contact:phone`.
    #[must_use]
    pub fn phone(&self) -> Option<&'a str> {
        self.first_of(&[keys::PHONE, keys::CONTACT_PHONE])
    }

    /// `website`, falling back to `contact:website`.
    #[must_use]
    pub fn website(&self) -> Option<&'a str> {
        self.first_of(&[keys::WEBSITE, keys::CONTACT_WEBSITE])
    }

    /// `opening_hours` tag.
    #[must_use]
    pub fn opening_hours(&self) -> Option<&'a str> {
        self.get(keys::OPENING_HOURS)
    }

    /// `true` when a `building` tag is present.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.get(keys::BUILDING).is_some()
    }

    /// `height`, falling back to `building:height`.
    #[must_use]
    pub fn height(&self) -> Option<&'a str> {
        self.first_of(&[keys::HEIGHT, keys::BUILDING_HEIGHT])
    }

    /// `building:levels`, falling back to `levels`.
    #[must_use]
    pub fn levels(&self) -> Option<&'a str> {
        self.first_of(&[keys::BUILDING_LEVELS, keys::LEVELS])
    }
}
