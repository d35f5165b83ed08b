//! Geoscape Headless Air Operations Harness
//!
//! Validates the aircraft catalog, the flight math and whole campaign
//! scenarios in-process. No UI, no rendering, no real clock.
//!
//! Usage:
//!   cargo run -p geoscape-simtest
//!   cargo run -p geoscape-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p geoscape-simtest

use geoscape_core::prelude::*;
use geoscape_logic::catalog::{AircraftCatalog, AircraftKind};
use geoscape_logic::constants::{
    AIRCRAFT_REFUEL_FACTOR, INTERCEPT_TOLERANCE, RADAR_AIRCRAFT_RANGE,
    RADAR_AIRCRAFT_TRACKING_RANGE,
};
use geoscape_logic::fuel::operation_range;
use geoscape_logic::geometry::{angular_distance, GeoPos};
use geoscape_logic::intercept::{solve_interception, PursuitInput};
use geoscape_logic::route::great_circle_route;
use geoscape_logic::status::AircraftStatus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Data files (same JSON the game loads) ───────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/aircraft_catalog.json");
const CONFIG_JSON: &str = include_str!("../../../data/campaign_config.json");

const SEED: u64 = 0x5eed_a1f0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Geoscape Air Operations Harness ===\n");

    let mut results = Vec::new();

    // 1. Aircraft catalog validation
    results.extend(validate_catalog(verbose));

    // 2. Campaign configuration
    results.extend(validate_config(verbose));

    // 3. Great-circle routes
    results.extend(validate_routes(verbose));

    // 4. Interception solver sweep
    results.extend(validate_interception(verbose));

    // 5. Mission flight scenario
    results.extend(validate_mission_flight(verbose));

    // 6. Antimatter refueling
    results.extend(validate_refueling(verbose));

    // 7. Pursuit scenario
    results.extend(validate_pursuit(verbose));

    // 8. Save/load round trip
    results.extend(validate_save_round_trip(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_catalog() -> Option<AircraftCatalog> {
    AircraftCatalog::from_json(CATALOG_JSON).ok()
}

/// Campaign with one well-equipped base at the origin.
fn scenario_campaign(catalog: AircraftCatalog) -> (Campaign, BaseId) {
    let mut campaign = Campaign::new(catalog, CampaignConfig::default());
    let base = campaign.add_base(
        Base::new("Alpha", GeoPos::new(0.0, 0.0))
            .with_hangars(4, 4)
            .with_quarters(40, 500),
    );
    (campaign, base)
}

fn catalog_missing() -> Vec<TestResult> {
    vec![TestResult {
        name: "catalog_available".into(),
        passed: false,
        detail: "aircraft catalog failed to load".into(),
    }]
}

// ── 1. Aircraft Catalog ─────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Aircraft Catalog ---");
    let mut results = Vec::new();

    let raw: Vec<serde_json::Value> = match serde_json::from_str(CATALOG_JSON) {
        Ok(v) => v,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let catalog = match AircraftCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_load".into(),
                passed: false,
                detail: format!("catalog error: {}", e),
            });
            return results;
        }
    };

    // Every entry survived validation
    results.push(TestResult {
        name: "catalog_all_entries_loaded".into(),
        passed: catalog.len() == raw.len() && !catalog.is_empty(),
        detail: format!("{} of {} entries loaded", catalog.len(), raw.len()),
    });

    let problems = catalog.sanity_check();
    if verbose {
        for p in &problems {
            println!("    {}", p);
        }
    }
    results.push(TestResult {
        name: "catalog_sanity".into(),
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            "no data problems".into()
        } else {
            format!("{} problems, first: {}", problems.len(), problems[0])
        },
    });

    // Each role is represented
    for kind in [AircraftKind::Transporter, AircraftKind::Interceptor, AircraftKind::Ufo] {
        let count = catalog.iter().filter(|t| t.kind == kind).count();
        results.push(TestResult {
            name: format!("catalog_has_{}", kind.type_string().to_lowercase()),
            passed: count > 0,
            detail: format!("{} {} templates", count, kind.type_string()),
        });
    }

    // Transporters carry a team; PHALANX craft can fly a round trip
    let no_team: Vec<_> = catalog
        .iter()
        .filter(|t| t.kind == AircraftKind::Transporter && t.max_team_size == 0)
        .map(|t| t.id.clone())
        .collect();
    results.push(TestResult {
        name: "catalog_transporters_have_seats".into(),
        passed: no_team.is_empty(),
        detail: if no_team.is_empty() {
            "all transporters seat a team".into()
        } else {
            format!("no seats: {:?}", no_team)
        },
    });

    let short_range: Vec<_> = catalog
        .iter()
        .filter(|t| t.kind != AircraftKind::Ufo)
        .filter(|t| operation_range(t.stats.speed, t.stats.fuel_size) < 1000)
        .map(|t| t.id.clone())
        .collect();
    results.push(TestResult {
        name: "catalog_operation_range".into(),
        passed: short_range.is_empty(),
        detail: if short_range.is_empty() {
            "every aircraft reaches at least 1000 km".into()
        } else {
            format!("short range: {:?}", short_range)
        },
    });

    results
}

// ── 2. Campaign Config ──────────────────────────────────────────────────

fn validate_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Campaign Config ---");
    let mut results = Vec::new();

    let config = match CampaignConfig::from_json(CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "config_matches_defaults".into(),
        passed: config == CampaignConfig::default(),
        detail: format!(
            "refuel x{}, radar {}/{}, {:?}",
            config.refuel_factor,
            config.aircraft_radar_range,
            config.aircraft_tracking_range,
            config.hangar_policy
        ),
    });

    results.push(TestResult {
        name: "config_game_constants".into(),
        passed: config.refuel_factor == AIRCRAFT_REFUEL_FACTOR
            && config.aircraft_radar_range == RADAR_AIRCRAFT_RANGE
            && config.aircraft_tracking_range == RADAR_AIRCRAFT_TRACKING_RANGE,
        detail: "refuel factor and radar ranges".into(),
    });

    results
}

// ── 3. Routes ───────────────────────────────────────────────────────────

fn validate_routes(_verbose: bool) -> Vec<TestResult> {
    println!("--- Great-Circle Routes ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SEED);

    let mut bad_length = 0;
    let mut bad_end = 0;
    let mut bad_seam = 0;
    let samples = 500;
    for _ in 0..samples {
        let from = random_pos(&mut rng);
        let to = random_pos(&mut rng);
        let route = great_circle_route(from, to);

        if (route.total_distance() - angular_distance(from, to)).abs() > 1e-6 {
            bad_length += 1;
        }
        if !route.destination().is_some_and(|d| angular_distance(d, to) < 1e-6) {
            bad_end += 1;
        }
        if route
            .points
            .windows(2)
            .any(|w| (w[1].lon - w[0].lon).abs() > 180.0)
        {
            bad_seam += 1;
        }
    }

    results.push(TestResult {
        name: "route_length".into(),
        passed: bad_length == 0,
        detail: format!("{}/{} routes match the arc length", samples - bad_length, samples),
    });
    results.push(TestResult {
        name: "route_destination".into(),
        passed: bad_end == 0,
        detail: format!("{}/{} routes end on target", samples - bad_end, samples),
    });
    results.push(TestResult {
        name: "route_no_seam_jumps".into(),
        passed: bad_seam == 0,
        detail: format!("{} routes jump across the date line", bad_seam),
    });

    // Identical endpoints
    let here = GeoPos::new(12.0, 34.0);
    let still = great_circle_route(here, here);
    results.push(TestResult {
        name: "route_identical_endpoints".into(),
        passed: still.num_points() == 1 && still.total_distance() == 0.0,
        detail: format!("{} points, {} degrees", still.num_points(), still.total_distance()),
    });

    results
}

fn random_pos(rng: &mut StdRng) -> GeoPos {
    GeoPos::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0))
}

// ── 4. Interception ─────────────────────────────────────────────────────

fn validate_interception(verbose: bool) -> Vec<TestResult> {
    println!("--- Interception Solver ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SEED ^ 0xff);

    let samples = 1000;
    let mut solved = 0;
    let mut inconsistent = 0;
    for _ in 0..samples {
        let input = PursuitInput {
            shooter_pos: random_pos(&mut rng),
            shooter_speed: rng.gen_range(900..2000),
            target_pos: random_pos(&mut rng),
            target_speed: rng.gen_range(300..900),
            target_destination: Some(random_pos(&mut rng)),
        };
        if let Some(sol) = solve_interception(&input) {
            solved += 1;
            let ratio = input.shooter_speed as f64 / input.target_speed as f64;
            let shooter = angular_distance(input.shooter_pos, sol.point).to_radians();
            let target = angular_distance(input.target_pos, sol.point).to_radians();
            if (shooter / ratio - target).abs() >= INTERCEPT_TOLERANCE {
                inconsistent += 1;
                if verbose {
                    println!("    inconsistent solution for {:?}", input);
                }
            }
        }
    }

    results.push(TestResult {
        name: "intercept_solutions_consistent".into(),
        passed: inconsistent == 0,
        detail: format!("{} solved, {} inconsistent", solved, inconsistent),
    });
    // A faster shooter should find a course in most random geometries
    results.push(TestResult {
        name: "intercept_mostly_solvable".into(),
        passed: solved * 2 > samples,
        detail: format!("{}/{} solved", solved, samples),
    });

    // Degenerate inputs
    let stopped = PursuitInput {
        shooter_pos: GeoPos::new(0.0, 0.0),
        shooter_speed: 1000,
        target_pos: GeoPos::new(10.0, 10.0),
        target_speed: 500,
        target_destination: None,
    };
    results.push(TestResult {
        name: "intercept_needs_destination".into(),
        passed: solve_interception(&stopped).is_none(),
        detail: "stationary target has no interception point".into(),
    });

    results
}

// ── 5. Mission Flight ───────────────────────────────────────────────────

fn validate_mission_flight(_verbose: bool) -> Vec<TestResult> {
    println!("--- Mission Flight ---");
    let mut results = Vec::new();
    let catalog = match load_catalog() {
        Some(c) => c,
        None => return catalog_missing(),
    };
    let (mut campaign, base) = scenario_campaign(catalog);

    let craft = match crewed_transport(&mut campaign, base, 130) {
        Some(c) => c,
        None => {
            results.push(TestResult {
                name: "mission_setup".into(),
                passed: false,
                detail: "could not build the scenario".into(),
            });
            return results;
        }
    };

    campaign.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    let launched = campaign.send_to_mission(craft, "mission_crash");
    results.push(TestResult {
        name: "mission_launch".into(),
        passed: launched == Ok(DispatchOutcome::Launched),
        detail: format!("{:?}", launched),
    });

    campaign.advance(30);
    let halfway = campaign.aircraft(craft).map(|a| (a.status(), a.position.lon));
    results.push(TestResult {
        name: "mission_halfway".into(),
        passed: matches!(halfway, Some((AircraftStatus::EnRouteToMission, lon)) if (lon - 5.0).abs() < 1e-6),
        detail: format!("{:?}", halfway),
    });

    campaign.advance(30);
    let status = campaign.aircraft(craft).map(|a| a.status());
    let events = campaign.drain_events();
    results.push(TestResult {
        name: "mission_arrival".into(),
        passed: status == Some(AircraftStatus::ReadyToDrop)
            && events.contains(&CampaignEvent::PauseRequested)
            && campaign.mission("mission_crash").is_some_and(|m| m.active),
        detail: format!("{:?}, {} events", status, events.len()),
    });

    campaign.return_to_base(craft);
    campaign.advance(60);
    campaign.advance(5000);
    let home = campaign.aircraft(craft).map(|a| (a.status(), a.fuel == a.stats.fuel_size));
    results.push(TestResult {
        name: "mission_return_and_refuel".into(),
        passed: home == Some((AircraftStatus::Home, true)),
        detail: format!(
            "{:?}, {} refuel messages",
            home,
            campaign.messages.count(MessageKind::AircraftRefueled)
        ),
    });

    // Exactly enough fuel, coarse ticks, nobody recalls the aircraft
    for dt in [7, 60] {
        let lowest = load_catalog().and_then(|catalog| unattended_round_trip(catalog, dt));
        results.push(TestResult {
            name: format!("mission_exact_fuel_dt{}", dt),
            passed: lowest.is_some_and(|f| f >= 0),
            detail: format!("lowest fuel {:?}", lowest),
        });
    }

    results
}

/// Fly a transport with exactly the round-trip fuel to a mission and back
/// in `dt` ticks. Returns the lowest fuel seen, or `None` if it never got
/// home.
fn unattended_round_trip(catalog: AircraftCatalog, dt: i32) -> Option<i32> {
    let (mut campaign, base) = scenario_campaign(catalog);
    // 20 degrees at speed 600
    let craft = crewed_transport(&mut campaign, base, 120)?;
    campaign.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    campaign.send_to_mission(craft, "mission_crash").ok()?;

    let mut lowest = i32::MAX;
    for _ in 0..1000 {
        campaign.advance(dt);
        let a = campaign.aircraft(craft)?;
        lowest = lowest.min(a.fuel);
        if a.is_in_base() {
            return Some(lowest);
        }
    }
    None
}

/// Firebird with one soldier aboard and `fuel` seconds in the tank.
fn crewed_transport(campaign: &mut Campaign, base: BaseId, fuel: i32) -> Option<AircraftId> {
    let craft = campaign.add_aircraft(base, "craft_drop_firebird").ok()?;
    let soldier = campaign.hire_employee("Sgt. Kowalski", EmployeeKind::Soldier, base)?;
    campaign.assign_team_member(craft, soldier).ok()?;
    campaign.aircraft_mut(craft)?.fuel = fuel;
    Some(craft)
}

// ── 6. Refueling ────────────────────────────────────────────────────────

fn validate_refueling(_verbose: bool) -> Vec<TestResult> {
    println!("--- Antimatter Refueling ---");
    let mut results = Vec::new();
    let catalog = match load_catalog() {
        Some(c) => c,
        None => return catalog_missing(),
    };
    let (mut campaign, base) = scenario_campaign(catalog);
    if let Some(b) = campaign.base_mut(base) {
        b.antimatter = 10;
    }
    let craft = match campaign.add_aircraft(base, "craft_inter_dragon") {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "refuel_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    if let Some(a) = campaign.aircraft_mut(craft) {
        a.fuel = 0;
        a.state = FlightState::Refueling;
    }

    for _ in 0..20 {
        campaign.advance(600);
    }
    let stuck = campaign.aircraft(craft).map(|a| (a.status(), a.fuel));
    results.push(TestResult {
        name: "refuel_stops_without_antimatter".into(),
        passed: matches!(stuck, Some((AircraftStatus::Refueling, fuel)) if fuel > 0)
            && campaign.base(base).is_some_and(|b| b.antimatter == 0),
        detail: format!("{:?}", stuck),
    });
    results.push(TestResult {
        name: "refuel_shortage_reported_once".into(),
        passed: campaign.messages.count(MessageKind::AircraftCannotRefuel) == 1,
        detail: format!(
            "{} shortage messages",
            campaign.messages.count(MessageKind::AircraftCannotRefuel)
        ),
    });

    if let Some(b) = campaign.base_mut(base) {
        b.antimatter = 100;
    }
    campaign.advance(3600);
    let done = campaign.aircraft(craft).map(|a| a.status());
    results.push(TestResult {
        name: "refuel_completes_after_resupply".into(),
        passed: done == Some(AircraftStatus::Home),
        detail: format!("{:?}", done),
    });

    results
}

// ── 7. Pursuit ──────────────────────────────────────────────────────────

fn validate_pursuit(verbose: bool) -> Vec<TestResult> {
    println!("--- Pursuit ---");
    let mut results = Vec::new();
    let catalog = match load_catalog() {
        Some(c) => c,
        None => return catalog_missing(),
    };
    let (mut campaign, base) = scenario_campaign(catalog);
    let mut rng = StdRng::seed_from_u64(SEED);

    let trials = 20;
    let mut engaged = 0;
    for i in 0..trials {
        let (craft, ufo) = match launch_pursuit(&mut campaign, base, &mut rng, i) {
            Some(s) => s,
            None => continue,
        };

        let mut caught = false;
        for _ in 0..720 {
            campaign.advance(10);
            if campaign
                .aircraft(craft)
                .is_some_and(|a| a.status() == AircraftStatus::Intercepting)
            {
                caught = true;
                break;
            }
        }
        if caught {
            engaged += 1;
        } else if verbose {
            println!("    trial {} never engaged", i);
        }
        campaign.destroy_ufo(ufo);
        let _ = campaign.delete_aircraft(craft);
    }

    results.push(TestResult {
        name: "pursuit_engages".into(),
        passed: engaged == trials,
        detail: format!("{}/{} pursuits reached their UFO", engaged, trials),
    });
    results.push(TestResult {
        name: "pursuit_cleanup".into(),
        passed: campaign.aircraft_count() == 0 && campaign.ufo_ids().is_empty(),
        detail: format!(
            "{} aircraft, {} UFOs left",
            campaign.aircraft_count(),
            campaign.ufo_ids().len()
        ),
    });

    results
}

/// Saracen with a pilot chasing a harvester that flies across the base area.
fn launch_pursuit(
    campaign: &mut Campaign,
    base: BaseId,
    rng: &mut StdRng,
    trial: usize,
) -> Option<(AircraftId, UfoId)> {
    let craft = campaign.add_aircraft(base, "craft_inter_saracen").ok()?;
    let pilot = campaign.hire_employee(format!("Pilot {}", trial), EmployeeKind::Pilot, base)?;
    campaign.assign_pilot(craft, pilot).ok()?;
    let start = GeoPos::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
    let ufo = campaign.spawn_ufo("craft_ufo_harvester", start).ok()?;
    let dest = GeoPos::new(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0));
    campaign.ufo_fly_to(ufo, dest);
    campaign.send_pursuing_ufo(craft, ufo).ok()?;
    Some((craft, ufo))
}

// ── 8. Save/Load ────────────────────────────────────────────────────────

fn validate_save_round_trip(_verbose: bool) -> Vec<TestResult> {
    println!("--- Save/Load ---");
    let mut results = Vec::new();
    let catalog = match load_catalog() {
        Some(c) => c,
        None => return catalog_missing(),
    };
    let (mut campaign, base) = scenario_campaign(catalog);

    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..3 {
        let _ = campaign.add_aircraft(base, "craft_inter_stiletto");
        let _ = campaign.spawn_random_ufo(&mut rng, "craft_ufo_scout");
    }
    if let Some(id) = campaign.aircraft_by_global_index(0) {
        let _ = campaign.send_to_position(id, GeoPos::new(8.0, 8.0));
    }
    campaign.advance(120);

    let before = match campaign.air_save_data() {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "save_snapshot".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut buf = Vec::new();
    let outcome = campaign
        .save_air(&mut buf)
        .and_then(|_| campaign.load_air(buf.as_slice()));
    results.push(TestResult {
        name: "save_load_ok".into(),
        passed: outcome.is_ok(),
        detail: format!("{} bytes, {:?}", buf.len(), outcome.err()),
    });

    let after = campaign.air_save_data().ok();
    results.push(TestResult {
        name: "save_load_identical".into(),
        passed: after.as_ref() == Some(&before),
        detail: format!(
            "{} aircraft, {} UFOs",
            before.aircraft.len(),
            before.ufos.len()
        ),
    });

    results
}
