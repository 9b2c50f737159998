//! Behaviour-driven step definitions driving the venues CLI scenarios.

use super::helpers::parse_venues;
use super::*;
use crate::venues::{DEFAULT_DATABASE, VenuesConfig};
use chrono::{TimeZone, Utc};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::path::PathBuf;
use sunspot_core::BoundingBoxError;

/// Aggregates venues CLI scenario state so each step only needs a single
/// world argument.
#[derive(Debug, Default)]
struct VenuesWorld {
    cli_args: RefCell<Vec<String>>,
    cli_result: RefCell<Option<Result<VenuesConfig, CliError>>>,
}

impl VenuesWorld {
    fn push(&self, flag: &str, value: &str) {
        let mut guard = self.cli_args.borrow_mut();
        if let Some(index) = guard.iter().position(|arg| arg == &format!("--{flag}")) {
            guard[index + 1] = value.to_owned();
        } else {
            guard.extend([format!("--{flag}"), value.to_owned()]);
        }
    }

    fn config(&self) -> VenuesConfig {
        self.cli_result
            .borrow()
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success")
            .clone()
    }
}

#[fixture]
fn world() -> VenuesWorld {
    VenuesWorld::default()
}

#[given("I pass all four bounding box edges")]
fn all_edges(#[from(world)] world: &VenuesWorld) {
    world.push(ARG_SOUTH, "52.52");
    world.push(ARG_WEST, "13.40");
    world.push(ARG_NORTH, "52.53");
    world.push(ARG_EAST, "13.41");
}

#[given("I pass every edge except east")]
fn all_but_east(#[from(world)] world: &VenuesWorld) {
    world.push(ARG_SOUTH, "52.52");
    world.push(ARG_WEST, "13.40");
    world.push(ARG_NORTH, "52.53");
}

#[given("I widen the box to a tenth of a degree")]
fn widen(#[from(world)] world: &VenuesWorld) {
    world.push(ARG_NORTH, "52.62");
}

#[given("I analyse 2 pm Berlin summer time on midsummer day")]
fn analyse_instant(#[from(world)] world: &VenuesWorld) {
    world.push(ARG_DATETIME, "2024-06-21T14:00:00+02:00");
}

#[when("I configure the venues command")]
fn configure(#[from(world)] world: &VenuesWorld) {
    let flags = world.cli_args.borrow().clone();
    let flags: Vec<&str> = flags.iter().map(String::as_str).collect();
    let outcome = parse_venues(&flags).and_then(VenuesConfig::try_from);
    world.cli_result.replace(Some(outcome));
}

#[then("the plan covers the requested bounding box")]
fn covers_bbox(#[from(world)] world: &VenuesWorld) {
    let bbox = world.config().bbox;
    assert!((bbox.south() - 52.52).abs() < 1e-12);
    assert!((bbox.west() - 13.40).abs() < 1e-12);
    assert!((bbox.north() - 52.53).abs() < 1e-12);
    assert!((bbox.east() - 13.41).abs() < 1e-12);
}

#[then("the plan uses the default cache file")]
fn default_cache(#[from(world)] world: &VenuesWorld) {
    assert_eq!(world.config().database, PathBuf::from(DEFAULT_DATABASE));
}

#[then("the CLI reports that the \"east\" flag is missing")]
fn reports_missing_east(#[from(world)] world: &VenuesWorld) {
    let borrowed = world.cli_result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_EAST);
            assert_eq!(*env, ENV_EAST);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the CLI reports that the bounding box is too large")]
fn reports_oversized(#[from(world)] world: &VenuesWorld) {
    let borrowed = world.cli_result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::InvalidBoundingBox(BoundingBoxError::SpanTooLarge { .. }) => {}
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the plan analyses 12:00 UTC")]
fn analyses_noon(#[from(world)] world: &VenuesWorld) {
    let expected = Utc
        .with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
        .single()
        .expect("valid instant");
    assert_eq!(world.config().timestamp, Some(expected));
}

macro_rules! register_venues_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/venues_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: VenuesWorld) {
            let _ = world;
        }
    };
}

register_venues_scenario!(cli_flag_selection, "selecting a bounding box via CLI flags");
register_venues_scenario!(rejecting_missing_edge, "rejecting a missing edge");
register_venues_scenario!(rejecting_oversized_box, "rejecting an oversized bounding box");
register_venues_scenario!(overriding_instant, "overriding the analysed instant");
