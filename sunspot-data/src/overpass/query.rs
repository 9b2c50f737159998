//! Overpass QL query construction.

use sunspot_core::{BoundingBox, VenueCategory};

/// Amenity values requested from Overpass and accepted by the mapper.
pub const AMENITY_ALLOW_LIST: [VenueCategory; 5] = VenueCategory::ALL;

/// `building:levels` values matching three or more floors.
pub const BUILDING_LEVELS_PATTERN: &str = "^([3-9]|[1-9][0-9]+)$";

/// Server-side timeout requested in the query header, in seconds.
const SERVER_TIMEOUT_SECS: u32 = 25;

/// Build the union query for venues and tall buildings inside `bbox`.
///
/// Overpass expects bounding boxes as `(south,west,north,east)`.
///
/// # Examples
/// ```
/// use sunspot_core::BoundingBox;
/// use sunspot_data::build_bbox_query;
///
/// let bbox = BoundingBox::new(52.5, 13.38, 52.52, 13.42)?;
/// let query = build_bbox_query(&bbox);
/// assert!(query.starts_with("[out:json]"));
/// assert!(query.contains("(52.5,13.38,52.52,13.42)"));
/// # Ok::<(), sunspot_core::BoundingBoxError>(())
/// ```
#[must_use]
pub fn build_bbox_query(bbox: &BoundingBox) -> String {
    let area = format!(
        "({},{},{},{})",
        bbox.south(),
        bbox.west(),
        bbox.north(),
        bbox.east()
    );
    let amenities = AMENITY_ALLOW_LIST
        .iter()
        .map(VenueCategory::as_str)
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "[out:json][timeout:{SERVER_TIMEOUT_SECS}];\n\
         (\n\
         \x20 node[\"amenity\"~\"^({amenities})$\"]{area};\n\
         \x20 way[\"building\"][\"height\"]{area};\n\
         \x20 way[\"building\"][\"building:levels\"~\"{BUILDING_LEVELS_PATTERN}\"]{area};\n\
         );\n\
         out center meta;"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn query() -> String {
        let bbox = BoundingBox::new(48.13, 11.56, 48.15, 11.6).expect("valid bbox");
        build_bbox_query(&bbox)
    }

    #[rstest]
    fn selects_allow_listed_amenities(query: String) {
        assert!(query.contains(
            r#"node["amenity"~"^(bar|restaurant|cafe|pub|biergarten)$"](48.13,11.56,48.15,11.6);"#
        ));
    }

    #[rstest]
    fn selects_buildings_with_height_or_levels(query: String) {
        assert!(query.contains(r#"way["building"]["height"](48.13,11.56,48.15,11.6);"#));
        assert!(query.contains(
            r#"way["building"]["building:levels"~"^([3-9]|[1-9][0-9]+)$"](48.13,11.56,48.15,11.6);"#
        ));
    }

    #[rstest]
    fn wraps_union_in_json_header_and_center_output(query: String) {
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.ends_with("out center meta;"));
        assert_eq!(query.matches("(48.13,11.56,48.15,11.6)").count(), 3);
    }

    #[rstest]
    fn is_deterministic(query: String) {
        let bbox = BoundingBox::new(48.13, 11.56, 48.15, 11.6).expect("valid bbox");
        assert_eq!(build_bbox_query(&bbox), query);
    }
}
