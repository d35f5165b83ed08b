//! Property sweeps over routes, fuel and interception.
//!
//! Exercises: GeoPos → great_circle_route → interpolate, and
//! PursuitInput → solve_interception → consistency of the solution.
//!
//! Inputs come from a seeded RNG so failures are reproducible.

use geoscape_logic::fuel::{has_enough_fuel, has_enough_fuel_one_way};
use geoscape_logic::geometry::{angular_distance, GeoPos};
use geoscape_logic::intercept::{pursuit_destination, solve_interception, PursuitInput};
use geoscape_logic::route::{great_circle_route, interpolate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn random_pos(rng: &mut StdRng) -> GeoPos {
    GeoPos::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0))
}

// ── Geometry ───────────────────────────────────────────────────────────

#[test]
fn distance_is_symmetric_and_zero_on_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let a = random_pos(&mut rng);
        let b = random_pos(&mut rng);
        assert!((angular_distance(a, b) - angular_distance(b, a)).abs() < 1e-9);
        assert!(angular_distance(a, a) < 1e-6);
    }
}

#[test]
fn route_length_matches_arc_distance() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..300 {
        let a = random_pos(&mut rng);
        let b = random_pos(&mut rng);
        let route = great_circle_route(a, b);
        assert!(
            (route.total_distance() - angular_distance(a, b)).abs() < 1e-6,
            "{:?} -> {:?}",
            a,
            b
        );
        assert!(route.num_points() >= 1);
        assert!(route.num_points() <= geoscape_logic::constants::LINE_MAXPTS);
        assert!(angular_distance(route.destination().unwrap(), b) < 1e-6);
    }
}

#[test]
fn interpolate_is_idempotent_past_the_end() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..200 {
        let route = great_circle_route(random_pos(&mut rng), random_pos(&mut rng));
        let total = route.total_distance();
        let end = interpolate(&route, total);
        for extra in [0.0, 1.0, 100.0, 1.0e6] {
            assert_eq!(interpolate(&route, total + extra), end);
        }
    }
}

#[test]
fn interpolated_points_stay_on_the_globe() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let route = great_circle_route(random_pos(&mut rng), random_pos(&mut rng));
        let total = route.total_distance();
        for i in 0..=20 {
            let p = interpolate(&route, total * i as f64 / 20.0);
            assert!((-180.0..=180.0).contains(&p.lon), "{:?}", p);
            assert!((-90.0..=90.0).contains(&p.lat), "{:?}", p);
        }
    }
}

// ── Fuel ───────────────────────────────────────────────────────────────

#[test]
fn round_trip_implies_one_way() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..500 {
        let home = random_pos(&mut rng);
        let dest = random_pos(&mut rng);
        let fuel = rng.gen_range(0..200_000);
        if has_enough_fuel(home, dest, home, 800, fuel) {
            assert!(has_enough_fuel_one_way(home, dest, 800, fuel));
        }
    }
}

// ── Interception ───────────────────────────────────────────────────────

#[test]
fn interception_solutions_are_consistent() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut solved = 0;
    for _ in 0..3000 {
        let input = PursuitInput {
            shooter_pos: random_pos(&mut rng),
            shooter_speed: rng.gen_range(600..1500),
            target_pos: random_pos(&mut rng),
            target_speed: rng.gen_range(200..900),
            target_destination: Some(random_pos(&mut rng)),
        };
        let ratio = input.shooter_speed as f64 / input.target_speed as f64;
        if let Some(sol) = solve_interception(&input) {
            solved += 1;
            let shooter = angular_distance(input.shooter_pos, sol.point).to_radians();
            let target = angular_distance(input.target_pos, sol.point).to_radians();
            assert!(
                (shooter / ratio - target).abs() < 0.1,
                "a={:.3}: shooter arc {:.3} over ratio {:.3} vs target arc {:.3}",
                sol.target_arc,
                shooter,
                ratio,
                target
            );
            assert!(sol.target_arc >= 0.0 && sol.target_arc < std::f64::consts::TAU);
        } else {
            assert_eq!(pursuit_destination(&input), input.target_pos);
        }
        let dest = pursuit_destination(&input);
        assert!(dest.lon.is_finite() && dest.lat.is_finite());
    }
    assert!(solved > 1000, "only {} of 3000 scenarios produced an interception", solved);
}

#[test]
fn faster_pursuer_catches_target_heading_away() {
    let input = PursuitInput {
        shooter_pos: GeoPos::new(0.0, 0.0),
        shooter_speed: 800,
        target_pos: GeoPos::new(5.0, 0.0),
        target_speed: 400,
        target_destination: Some(GeoPos::new(20.0, 0.0)),
    };
    let sol = solve_interception(&input).expect("interception");
    assert!(sol.point.lat.abs() < 1e-6);
    assert!(sol.point.lon > 5.0 && sol.point.lon < 20.0);
}
