//! Result of one pipeline run.

use chrono::{DateTime, Utc};

use crate::{SunPosition, Venue};

/// Annotated venues and the sun position they were classified against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AnalysisResult {
    /// Venues with [`Venue::sunlight_status`] assigned.
    pub venues: Vec<Venue>,
    /// Sun position at the bounding-box centre.
    pub sun_position: SunPosition,
    /// Run metadata.
    pub meta: AnalysisMeta,
}

/// Metadata describing how an [`AnalysisResult`] was produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AnalysisMeta {
    /// Instant the analysis was computed for.
    pub timestamp: DateTime<Utc>,
    /// Number of buildings tested; zero when served from the cache.
    pub buildings_analyzed: usize,
    /// Number of venues returned.
    pub venue_count: usize,
    /// `Some(true)` when the venues came from the local store.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub from_cache: Option<bool>,
}

impl AnalysisResult {
    /// Assemble a result, deriving `venue_count` from `venues`.
    #[must_use]
    pub fn new(
        venues: Vec<Venue>,
        sun_position: SunPosition,
        timestamp: DateTime<Utc>,
        buildings_analyzed: usize,
    ) -> Self {
        let venue_count = venues.len();
        Self {
            venues,
            sun_position,
            meta: AnalysisMeta {
                timestamp,
                buildings_analyzed,
                venue_count,
                from_cache: None,
            },
        }
    }

    /// Mark the result as served from the local store.
    #[must_use]
    pub fn from_cache(mut self) -> Self {
        self.meta.from_cache = Some(true);
        self
    }

    /// Return `true` when the venues came from the local store.
    #[must_use]
    pub fn is_from_cache(&self) -> bool {
        self.meta.from_cache == Some(true)
    }
}
