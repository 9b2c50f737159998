//! Building height estimation.
//!
//! Explicit heights win, then floor counts, then a default, so every
//! building gets a positive height.

use super::ElementTags;

/// Height assumed when a building carries no usable tag.
pub const DEFAULT_BUILDING_HEIGHT_M: f64 = 10.0;

/// Height of one floor when estimating from `building:levels`.
pub const FLOOR_HEIGHT_M: f64 = 3.0;

/// Parse the leading `digits[.digits]` of `value`, ignoring any unit suffix.
///
/// `"12.5m"` yields `12.5`, `"7 ft"` yields `7.0`, `"approx 9"` yields `None`.
#[must_use]
pub fn leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let integer_len = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if integer_len == 0 {
        return None;
    }
    let rest = trimmed.get(integer_len..).unwrap_or_default();
    let fraction_len = rest
        .strip_prefix('.')
        .map_or(0, |fraction| fraction.bytes().take_while(u8::is_ascii_digit).count());
    let end = if fraction_len > 0 {
        integer_len + 1 + fraction_len
    } else {
        integer_len
    };
    trimmed.get(..end)?.parse().ok()
}

/// Parse the leading integer of a floor count.
#[must_use]
pub fn leading_levels(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let len = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    trimmed.get(..len)?.parse().ok()
}

/// Estimate a building's height in metres from its tags.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use sunspot_data::mapper::{ElementTags, estimate_height};
///
/// let tags = HashMap::from([("building:levels".to_owned(), "4".to_owned())]);
/// assert_eq!(estimate_height(&ElementTags::new(&tags)), 12.0);
/// ```
#[must_use]
pub fn estimate_height(tags: &ElementTags<'_>) -> f64 {
    if let Some(height) = tags
        .height()
        .and_then(leading_number)
        .filter(|h| h.is_finite() && *h > 0.0)
    {
        return height;
    }
    if let Some(levels) = tags.levels().and_then(leading_levels).filter(|l| *l > 0) {
        return f64::from(levels) * FLOOR_HEIGHT_M;
    }
    DEFAULT_BUILDING_HEIGHT_M
}
