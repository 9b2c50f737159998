//! Unit tests for the cache orchestrator.

use super::*;
use async_trait::async_trait;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use sunspot_core::test_support::{FailingVenueStore, MemoryVenueStore};
use sunspot_core::{OsmKind, SunlightStatus, VenueCategory};
use sunspot_data::overpass::test_support::StubExecutor;
use tokio::sync::Notify;

const LIVE_RESPONSE: &str = r#"{"elements": [
    {"type": "node", "id": 1, "lat": 52.525, "lon": 13.405,
     "tags": {"amenity": "cafe", "name": "Sonnendeck", "outdoor_seating": "yes"}},
    {"type": "node", "id": 2, "lat": 52.526, "lon": 13.406,
     "tags": {"amenity": "bar", "name": "Schatten"}},
    {"type": "way", "id": 20, "center": {"lat": 52.5251, "lon": 13.4051},
     "tags": {"building": "yes", "height": "30"}}
]}"#;

#[fixture]
fn bbox() -> BoundingBox {
    BoundingBox::new(52.52, 13.40, 52.53, 13.41).expect("valid bbox")
}

#[fixture]
fn daytime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0)
        .single()
        .expect("valid instant")
}

#[fixture]
fn night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 23, 0, 0)
        .single()
        .expect("valid instant")
}

fn live_executor() -> StubExecutor {
    StubExecutor::with_json(LIVE_RESPONSE).expect("valid response")
}

fn unavailable() -> StubExecutor {
    StubExecutor::with_error(UpstreamError::Exhausted { attempts: 3 })
}

fn cached_venues() -> Vec<Venue> {
    vec![
        Venue::new(OsmKind::Node, 7, "Eckcafé", VenueCategory::Cafe, 52.521, 13.401),
        Venue::new(OsmKind::Way, 8, "Hofbräu", VenueCategory::Biergarten, 52.529, 13.409),
        Venue::new(OsmKind::Node, 9, "Far away", VenueCategory::Pub, 48.1, 11.5),
    ]
}

/// Store whose writes block until the test opens the gate.
#[derive(Debug, Default)]
struct GatedStore {
    inner: MemoryVenueStore,
    gate: Notify,
}

#[async_trait]
impl VenueStore for GatedStore {
    async fn upsert_many(&self, venues: &[Venue]) -> Result<(), StoreError> {
        self.gate.notified().await;
        self.inner.upsert_many(venues).await
    }

    async fn find_by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Venue>, StoreError> {
        self.inner.find_by_bbox(bbox).await
    }
}

#[rstest]
#[case(ServiceError::Upstream(UpstreamError::FatalStatus { status: 400 }), 400)]
#[case(ServiceError::Upstream(UpstreamError::Exhausted { attempts: 3 }), 503)]
#[case(ServiceError::Upstream(UpstreamError::Timeout), 503)]
#[case(
    ServiceError::CacheRead {
        upstream: UpstreamError::FatalStatus { status: 404 },
        source: StoreError::Query { message: "locked".to_owned() },
    },
    404
)]
#[case(
    ServiceError::CacheRead {
        upstream: UpstreamError::Exhausted { attempts: 3 },
        source: StoreError::Query { message: "locked".to_owned() },
    },
    503
)]
fn maps_errors_to_status(#[case] error: ServiceError, #[case] expected: u16) {
    assert_eq!(error.status_code(), expected);
}

#[rstest]
#[tokio::test]
async fn live_fetch_classifies_and_persists(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let store = Arc::new(MemoryVenueStore::default());
    let service = VenueService::new(live_executor(), Arc::clone(&store));

    let result = service.analyze(&bbox, daytime).await.expect("live result");

    assert_eq!(result.meta.venue_count, 2);
    assert_eq!(result.meta.buildings_analyzed, 1);
    assert_eq!(result.meta.from_cache, None);
    assert_eq!(result.meta.timestamp, daytime);
    assert!(result.sun_position.is_daytime());
    assert!(result.venues.iter().all(|v| v.sunlight_status.is_some()));

    service.drain_background_writes().await;
    let stored = store.snapshot();
    let ids: Vec<_> = stored.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["node/1", "node/2"]);
    assert!(stored.iter().all(|v| v.sunlight_status.is_none()));
    assert_eq!(service.executor().calls(), 1);
}

#[rstest]
#[tokio::test]
async fn upstream_failure_serves_cached_venues(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let store = Arc::new(MemoryVenueStore::with_venues(cached_venues()));
    let service = VenueService::new(unavailable(), Arc::clone(&store));

    let result = service.analyze(&bbox, daytime).await.expect("cached result");

    assert!(result.is_from_cache());
    assert_eq!(result.meta.buildings_analyzed, 0);
    assert_eq!(result.meta.venue_count, 2);
    let ids: Vec<_> = result.venues.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["node/7", "way/8"]);
    assert!(
        result
            .venues
            .iter()
            .all(|v| v.sunlight_status == Some(SunlightStatus::Sunny))
    );
    assert_eq!(store.upsert_calls(), 0);
}

#[rstest]
#[tokio::test]
async fn empty_cache_answers_with_no_venues(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let service = VenueService::new(unavailable(), Arc::new(MemoryVenueStore::default()));

    let result = service.analyze(&bbox, daytime).await.expect("cached result");

    assert!(result.is_from_cache());
    assert!(result.venues.is_empty());
    assert_eq!(result.meta.venue_count, 0);
    assert_eq!(result.meta.buildings_analyzed, 0);
}

#[rstest]
fn sun_position_failures_carry_no_upstream(daytime: DateTime<Utc>) {
    let solar = sun_position(91.0, 13.4, daytime).expect_err("latitude out of range");
    let err = ServiceError::from(solar);

    assert_eq!(err.status_code(), SERVICE_UNAVAILABLE);
    assert_eq!(err.upstream(), None);
}

#[rstest]
#[tokio::test]
async fn cached_venues_are_shaded_at_night(bbox: BoundingBox, night: DateTime<Utc>) {
    let store = Arc::new(MemoryVenueStore::with_venues(cached_venues()));
    let service = VenueService::new(unavailable(), store);

    let result = service.analyze(&bbox, night).await.expect("cached result");

    assert!(!result.sun_position.is_daytime());
    assert!(
        result
            .venues
            .iter()
            .all(|v| v.sunlight_status == Some(SunlightStatus::Shaded))
    );
}

#[rstest]
#[tokio::test]
async fn fatal_status_still_falls_back(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let executor = StubExecutor::with_error(UpstreamError::FatalStatus { status: 400 });
    let store = Arc::new(MemoryVenueStore::with_venues(cached_venues()));
    let service = VenueService::new(executor, store);

    let result = service.analyze(&bbox, daytime).await.expect("cached result");
    assert!(result.is_from_cache());
}

#[rstest]
#[tokio::test]
async fn cache_read_failure_carries_both_errors(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let executor = StubExecutor::with_error(UpstreamError::FatalStatus { status: 400 });
    let service = VenueService::new(executor, Arc::new(FailingVenueStore::default()));

    let err = service
        .analyze(&bbox, daytime)
        .await
        .expect_err("both sources fail");

    assert_eq!(
        err,
        ServiceError::CacheRead {
            upstream: UpstreamError::FatalStatus { status: 400 },
            source: StoreError::Connection {
                message: "store offline".to_owned()
            },
        }
    );
    assert_eq!(err.status_code(), 400);
}

#[rstest]
#[tokio::test]
async fn live_only_analysis_skips_the_store(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let store = Arc::new(MemoryVenueStore::with_venues(cached_venues()));
    let service = VenueService::new(unavailable(), store);

    let err = service
        .analyze_live(&bbox, daytime)
        .await
        .expect_err("no fallback");
    assert_eq!(err.upstream(), Some(&UpstreamError::Exhausted { attempts: 3 }));
}

#[rstest]
#[tokio::test]
async fn analyze_returns_before_the_write_completes(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let store = Arc::new(GatedStore::default());
    let service = VenueService::new(live_executor(), Arc::clone(&store));

    let result = service.analyze(&bbox, daytime).await.expect("live result");

    assert_eq!(result.meta.venue_count, 2);
    assert_eq!(service.pending_background_writes(), 1);
    assert!(store.inner.snapshot().is_empty());

    store.gate.notify_one();
    service.drain_background_writes().await;

    assert_eq!(service.pending_background_writes(), 0);
    assert_eq!(store.inner.snapshot().len(), 2);
}

#[rstest]
#[tokio::test]
async fn failed_write_leaves_result_unchanged(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let healthy = VenueService::new(live_executor(), Arc::new(MemoryVenueStore::default()));
    let failing = VenueService::new(live_executor(), Arc::new(FailingVenueStore::default()));

    let expected = healthy.analyze(&bbox, daytime).await.expect("healthy result");
    let actual = failing.analyze(&bbox, daytime).await.expect("failing-store result");
    failing.drain_background_writes().await;

    assert_eq!(actual, expected);
    assert_eq!(failing.pending_background_writes(), 0);
}

#[rstest]
#[tokio::test]
async fn empty_live_response_spawns_no_write(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let executor = StubExecutor::with_json(r#"{"elements": []}"#).expect("valid response");
    let store = Arc::new(MemoryVenueStore::default());
    let service = VenueService::new(executor, Arc::clone(&store));

    let result = service.analyze(&bbox, daytime).await.expect("live result");
    service.drain_background_writes().await;

    assert_eq!(result.meta.venue_count, 0);
    assert!(!result.is_from_cache());
    assert_eq!(store.upsert_calls(), 0);
}

#[rstest]
#[tokio::test]
async fn service_is_reusable_after_draining(bbox: BoundingBox, daytime: DateTime<Utc>) {
    let store = Arc::new(MemoryVenueStore::default());
    let service = VenueService::new(live_executor(), Arc::clone(&store));

    service.analyze(&bbox, daytime).await.expect("first run");
    service.drain_background_writes().await;
    service.analyze(&bbox, daytime).await.expect("second run");
    service.drain_background_writes().await;

    assert_eq!(store.upsert_calls(), 2);
    assert_eq!(store.snapshot().len(), 2);
}
