//! Behavioural tests for the shadow analysis engine.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};
use sunspot_core::geodesy::destination;
use sunspot_core::{Building, SunlightStatus, analyze};

const VENUE: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const EAST: f64 = 90.0;

/// World state for shadow scenarios.
#[derive(Debug, Default)]
struct ShadowWorld {
    buildings: RefCell<Vec<Building>>,
    sun: Cell<(f64, f64)>,
    status: Cell<Option<SunlightStatus>>,
}

impl ShadowWorld {
    fn add_building(&self, distance_m: f64, height_m: f64) {
        let mut buildings = self.buildings.borrow_mut();
        let id = format!("way/{}", buildings.len() + 1);
        let at = destination(VENUE, distance_m, EAST);
        buildings.push(Building::new(id, at.y, at.x, height_m).expect("valid building"));
    }
}

#[fixture]
fn world() -> ShadowWorld {
    ShadowWorld::default()
}

#[given("the morning sun in the east")]
fn morning_sun(world: &ShadowWorld) {
    world.sun.set((EAST, 30.0_f64.to_radians()));
}

#[given("the sun below the horizon")]
fn night(world: &ShadowWorld) {
    world.sun.set((EAST, -0.1));
}

#[given("a 20 metre building 30 metres east of the venue")]
fn building_at_thirty(world: &ShadowWorld) {
    world.add_building(30.0, 20.0);
}

#[given("a 20 metre building 25 metres east of the venue")]
fn building_at_twenty_five(world: &ShadowWorld) {
    world.add_building(25.0, 20.0);
}

#[given("a 20 metre building 150 metres east of the venue")]
fn building_out_of_range(world: &ShadowWorld) {
    world.add_building(150.0, 20.0);
}

#[when("the venue is analysed")]
fn run_analysis(world: &ShadowWorld) {
    let (azimuth, altitude) = world.sun.get();
    let status = analyze(VENUE, &world.buildings.borrow(), azimuth, altitude);
    world.status.set(Some(status));
}

#[then("the venue is partially sunny")]
fn partially_sunny(world: &ShadowWorld) {
    assert_eq!(world.status.get(), Some(SunlightStatus::PartiallySunny));
}

#[then("the venue is shaded")]
fn shaded(world: &ShadowWorld) {
    assert_eq!(world.status.get(), Some(SunlightStatus::Shaded));
}

#[then("the venue is sunny")]
fn sunny(world: &ShadowWorld) {
    assert_eq!(world.status.get(), Some(SunlightStatus::Sunny));
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/shadow_analysis.feature", name = $title)]
        fn $fn_name(world: ShadowWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    single_building_partial_sun,
    "a single tall building leaves the venue partially sunny"
);
register_scenario!(two_buildings_shade, "two tall buildings shade the venue");
register_scenario!(
    nothing_in_range_stays_sunny,
    "no building within range keeps the venue sunny"
);
register_scenario!(night_shades_all, "night shades every venue");
