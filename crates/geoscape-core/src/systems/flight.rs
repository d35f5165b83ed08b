//! Flight system - advances one PHALANX aircraft by one tick
//!
//! Everything here works on a single `Aircraft` plus a read-only snapshot of
//! the world around it (`FlightContext`). The campaign builds the snapshot,
//! runs the step, then applies the returned `FlightEvent`s to bases,
//! missions and the message log.

use geoscape_logic::constants::ARRIVAL_EPSILON;
use geoscape_logic::fuel::{compute_refuel, has_enough_fuel_one_way};
use geoscape_logic::geometry::{angular_distance, GeoPos};
use geoscape_logic::intercept::{pursuit_destination, PursuitInput};
use geoscape_logic::route::{Advance, RouteProgress};
use geoscape_logic::status::AircraftStatus;

use crate::components::{Aircraft, BaseId, FlightState, UfoId};

/// Where a pursued UFO is and where it is going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub pos: GeoPos,
    pub speed: i32,
    pub destination: Option<GeoPos>,
}

/// Read-only view of the world one aircraft needs for its tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightContext {
    /// Position of the home base.
    pub home: GeoPos,
    /// Antimatter stocked at the home base.
    pub antimatter_available: i32,
    pub refuel_factor: i32,
    /// Distance (degrees) at which a pursuer engages its target.
    pub engagement_range: f64,
    /// The pursued UFO, if the aircraft has one and it still exists.
    pub target: Option<TargetSnapshot>,
}

/// Something that happened to the aircraft during its tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightEvent {
    /// Arrived over the mission site and is now waiting to drop.
    ReachedMission(String),
    /// Landed at the home base and started refueling.
    ReturnedHome,
    /// Arrived at a free-flight destination and is now idle.
    ReachedPosition,
    /// Transfer flight time is over; the aircraft should join `BaseId`.
    TransferDue(BaseId),
    Refueled {
        antimatter_used: i32,
        /// Refueling stopped early for lack of antimatter.
        limited: bool,
        full: bool,
    },
    /// Close enough to the target to fight.
    Engaged(UfoId),
    /// Pursuit course recomputed toward the target.
    Repursued(UfoId),
    /// The target is gone; the aircraft turned home.
    TargetLost(UfoId),
    /// Not enough fuel to get home from here; the aircraft turned home.
    LowFuel,
}

/// Outcome of one aircraft tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightReport {
    /// Position changed.
    pub moved: bool,
    pub events: Vec<FlightEvent>,
}

/// Advance one aircraft by `dt` seconds.
///
/// An airborne aircraft that could not get home after spending this tick
/// is turned home before it moves, so it never runs dry on the way back
/// and never reaches a mission it cannot return from.
pub fn advance_aircraft(aircraft: &mut Aircraft, ctx: &FlightContext, dt: i32) -> FlightReport {
    let mut report = FlightReport::default();
    if dt <= 0 {
        return report;
    }

    if aircraft.is_on_geoscape()
        && aircraft.status() != AircraftStatus::Returning
        && !can_afford_tick(aircraft, ctx, dt)
    {
        report.events.push(FlightEvent::LowFuel);
        return_home(aircraft, ctx.home);
    }

    match aircraft.status() {
        AircraftStatus::Idle | AircraftStatus::ReadyToDrop | AircraftStatus::Intercepting => {
            aircraft.fuel -= dt;
        }
        AircraftStatus::Refueling => refuel(aircraft, ctx, dt, &mut report),
        AircraftStatus::Transferring => {
            if let FlightState::Transferring { destination, remaining } = &mut aircraft.state {
                *remaining -= dt as i64;
                if *remaining <= 0 {
                    report.events.push(FlightEvent::TransferDue(*destination));
                }
            }
        }
        status if status.is_on_geoscape() => fly(aircraft, dt, &mut report),
        _ => {}
    }

    pursue(aircraft, ctx, &mut report);
    weapon_upkeep(aircraft, dt);

    report
}

/// Whether the aircraft can carry on for `dt` seconds and still reach home
/// from wherever that leaves it.
pub fn can_afford_tick(aircraft: &Aircraft, ctx: &FlightContext, dt: i32) -> bool {
    let speed = aircraft.stats.speed;
    let (next, burn) = match aircraft.status() {
        // Interceptors in range stick to their target.
        AircraftStatus::Intercepting => {
            let pos = ctx
                .target
                .filter(|t| angular_distance(aircraft.position, t.pos) <= ctx.engagement_range)
                .map_or(aircraft.position, |t| t.pos);
            (pos, dt)
        }
        _ => match aircraft.state.route() {
            Some(route) => {
                let flown = route.seconds_to_arrival(speed).min(dt as i64);
                (route.projected(speed, flown), flown as i32)
            }
            None => (aircraft.position, dt),
        },
    };
    has_enough_fuel_one_way(next, ctx.home, speed, aircraft.fuel - burn)
}

/// Send an airborne aircraft back to its base. Aircraft not on the geoscape
/// are left alone. Returns whether the order was given.
pub fn return_home(aircraft: &mut Aircraft, home: GeoPos) -> bool {
    if !aircraft.is_on_geoscape() {
        return false;
    }
    aircraft.state = FlightState::Returning {
        route: RouteProgress::between(aircraft.position, home),
    };
    true
}

/// Course toward where the target will be, or where it is now when no
/// interception exists.
pub fn pursuit_route(from: GeoPos, speed: i32, target: &TargetSnapshot) -> RouteProgress {
    let dest = pursuit_destination(&PursuitInput {
        shooter_pos: from,
        shooter_speed: speed,
        target_pos: target.pos,
        target_speed: target.speed,
        target_destination: target.destination,
    });
    RouteProgress::between(from, dest)
}

// ── Helpers ──

fn fly(aircraft: &mut Aircraft, dt: i32, report: &mut FlightReport) {
    let speed = aircraft.stats.speed;
    let from = aircraft.position;

    // Only the seconds actually in the air burn fuel.
    let (step, flown) = match aircraft.state.route_mut() {
        Some(route) => {
            let flown = route.seconds_to_arrival(speed).min(dt as i64);
            (route.advance(speed, dt as i64), flown as i32)
        }
        None => {
            aircraft.fuel -= dt;
            return;
        }
    };
    aircraft.fuel -= flown;
    let to = step.position();
    aircraft.position = to;
    aircraft.update_direction(from, to);
    report.moved = true;

    if let Advance::Arrived(_) = step {
        arrive(aircraft, report);
    }
}

fn arrive(aircraft: &mut Aircraft, report: &mut FlightReport) {
    let state = std::mem::replace(&mut aircraft.state, FlightState::Idle);
    aircraft.state = match state {
        FlightState::EnRouteToMission { mission, .. } => {
            report.events.push(FlightEvent::ReachedMission(mission.clone()));
            FlightState::ReadyToDrop { mission }
        }
        FlightState::Returning { .. } => {
            report.events.push(FlightEvent::ReturnedHome);
            FlightState::Refueling
        }
        FlightState::Transit { .. } => {
            report.events.push(FlightEvent::ReachedPosition);
            FlightState::Idle
        }
        // Pursuit courses are re-solved by `pursue`.
        other => other,
    };
}

fn refuel(aircraft: &mut Aircraft, ctx: &FlightContext, dt: i32, report: &mut FlightReport) {
    let step = compute_refuel(
        aircraft.fuel,
        aircraft.stats.fuel_size,
        aircraft.stats.antimatter,
        ctx.antimatter_available,
        dt,
        ctx.refuel_factor,
    );
    aircraft.fuel = aircraft.fuel.max(0) + step.fuel_added;
    if step.full {
        aircraft.fuel = aircraft.stats.fuel_size;
        aircraft.state = FlightState::Home;
    }
    report.events.push(FlightEvent::Refueled {
        antimatter_used: step.antimatter_used,
        limited: step.limited,
        full: step.full,
    });
}

fn pursue(aircraft: &mut Aircraft, ctx: &FlightContext, report: &mut FlightReport) {
    let target = match aircraft.state.target() {
        Some(t) => t,
        None => return,
    };
    let snapshot = match ctx.target {
        Some(s) => s,
        None => {
            report.events.push(FlightEvent::TargetLost(target));
            return_home(aircraft, ctx.home);
            return;
        }
    };

    let speed = aircraft.stats.speed;
    let in_range = angular_distance(aircraft.position, snapshot.pos) <= ctx.engagement_range;
    let course_done = aircraft
        .state
        .route()
        .is_some_and(|r| r.remaining(speed) <= ARRIVAL_EPSILON);

    match aircraft.status() {
        AircraftStatus::PursuingUfo if in_range => {
            aircraft.state = FlightState::Intercepting { target };
            report.events.push(FlightEvent::Engaged(target));
        }
        AircraftStatus::PursuingUfo if course_done => {
            let route = pursuit_route(aircraft.position, speed, &snapshot);
            aircraft.state = FlightState::PursuingUfo { route, target };
            report.events.push(FlightEvent::Repursued(target));
        }
        AircraftStatus::Intercepting if in_range => {
            let from = aircraft.position;
            if !from.same_place(&snapshot.pos) {
                aircraft.position = snapshot.pos;
                aircraft.update_direction(from, snapshot.pos);
                report.moved = true;
            }
        }
        AircraftStatus::Intercepting => {
            let route = pursuit_route(aircraft.position, speed, &snapshot);
            aircraft.state = FlightState::PursuingUfo { route, target };
            report.events.push(FlightEvent::Repursued(target));
        }
        _ => {}
    }
}

fn weapon_upkeep(aircraft: &mut Aircraft, dt: i32) {
    let airborne = aircraft.is_on_geoscape();
    for weapon in &mut aircraft.weapons {
        if airborne && weapon.delay_next_shot > 0 {
            weapon.delay_next_shot = (weapon.delay_next_shot - dt).max(0);
        }
        if weapon.ammo_left <= 0 {
            weapon.reload();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Radar;
    use geoscape_logic::catalog::{AircraftKind, AircraftStats, AircraftTemplate, SizeClass};

    fn craft(speed: i32, fuel: i32) -> Aircraft {
        let template = AircraftTemplate {
            id: "craft_test".into(),
            name: "Test".into(),
            default_name: "Test".into(),
            kind: AircraftKind::Interceptor,
            size: SizeClass::Small,
            weapon_slots: vec![],
            electronics_slots: vec![],
            stats: AircraftStats {
                speed,
                fuel_size: fuel,
                damage: 100,
                ..Default::default()
            },
            price: 0,
            max_team_size: 0,
        };
        Aircraft::from_template(&template, BaseId(0), GeoPos::new(0.0, 0.0), Radar::default())
    }

    fn ctx() -> FlightContext {
        FlightContext {
            home: GeoPos::new(0.0, 0.0),
            antimatter_available: 0,
            refuel_factor: 16,
            engagement_range: 1.0,
            target: None,
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut a = craft(600, 100);
        a.state = FlightState::Idle;
        let before = a.clone();
        let report = advance_aircraft(&mut a, &ctx(), 0);
        assert_eq!(a, before);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_transit_arrival_goes_idle() {
        let mut a = craft(3600, 100_000);
        a.state = FlightState::Transit {
            route: RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(2.0, 0.0)),
        };
        let report = advance_aircraft(&mut a, &ctx(), 1);
        assert!(report.moved);
        assert!(report.events.is_empty());
        let report = advance_aircraft(&mut a, &ctx(), 1);
        assert_eq!(report.events, vec![FlightEvent::ReachedPosition]);
        assert_eq!(a.status(), AircraftStatus::Idle);
        assert!((a.position.lon - 2.0).abs() < 1e-9);
        assert_eq!(a.fuel, 100_000 - 2);
    }

    #[test]
    fn test_low_fuel_turns_home() {
        let mut a = craft(3600, 100_000);
        a.position = GeoPos::new(5.0, 0.0);
        a.fuel = 3;
        a.state = FlightState::Idle;
        let report = advance_aircraft(&mut a, &ctx(), 1);
        assert!(report.events.contains(&FlightEvent::LowFuel));
        assert_eq!(a.status(), AircraftStatus::Returning);
    }

    #[test]
    fn test_low_fuel_recall_comes_before_arrival() {
        // One more second reaches the site 2 degrees out, leaving 1 fuel
        // for the 2 degrees back.
        let mut a = craft(3600, 100_000);
        let mut route = RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(2.0, 0.0));
        a.position = route.advance(3600, 1).position();
        a.fuel = 2;
        a.state = FlightState::EnRouteToMission {
            route,
            mission: "mission_crash".into(),
        };
        let report = advance_aircraft(&mut a, &ctx(), 5);
        assert_eq!(report.events[0], FlightEvent::LowFuel);
        assert!(!report
            .events
            .iter()
            .any(|e| matches!(e, FlightEvent::ReachedMission(_))));
        assert_eq!(a.status(), AircraftStatus::Refueling);
        assert_eq!(a.fuel, 1);
    }

    #[test]
    fn test_arrival_burns_only_flown_seconds() {
        let mut a = craft(3600, 100_000);
        a.fuel = 10;
        a.state = FlightState::Transit {
            route: RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(2.0, 0.0)),
        };
        let report = advance_aircraft(&mut a, &ctx(), 60);
        assert_eq!(report.events, vec![FlightEvent::ReachedPosition]);
        assert_eq!(a.fuel, 8);
    }

    #[test]
    fn test_waiting_over_mission_turns_home_in_time() {
        // 10 degrees out at 1 degree per second: 10 fuel is just enough.
        let mut a = craft(3600, 100_000);
        a.position = GeoPos::new(10.0, 0.0);
        a.fuel = 15;
        a.state = FlightState::ReadyToDrop {
            mission: "mission_crash".into(),
        };
        let report = advance_aircraft(&mut a, &ctx(), 7);
        assert_eq!(report.events, vec![FlightEvent::LowFuel]);
        assert_eq!(a.status(), AircraftStatus::Returning);
        assert_eq!(a.fuel, 8);
        advance_aircraft(&mut a, &ctx(), 7);
        assert_eq!(a.status(), AircraftStatus::Refueling);
        assert_eq!(a.fuel, 5);
    }

    #[test]
    fn test_refuel_completes_to_home() {
        let mut a = craft(600, 1000);
        a.fuel = 990;
        a.state = FlightState::Refueling;
        let report = advance_aircraft(&mut a, &ctx(), 10);
        assert_eq!(a.fuel, 1000);
        assert_eq!(a.status(), AircraftStatus::Home);
        assert!(matches!(
            report.events[0],
            FlightEvent::Refueled { full: true, limited: false, .. }
        ));
    }

    #[test]
    fn test_transfer_counts_down_off_map() {
        let mut a = craft(600, 1000);
        a.state = FlightState::Transferring {
            destination: BaseId(1),
            remaining: 100,
        };
        let report = advance_aircraft(&mut a, &ctx(), 60);
        assert!(report.events.is_empty());
        assert_eq!(a.fuel, 1000);
        let report = advance_aircraft(&mut a, &ctx(), 60);
        assert_eq!(report.events, vec![FlightEvent::TransferDue(BaseId(1))]);
    }

    #[test]
    fn test_lost_target_returns_home() {
        let mut world = hecs::World::new();
        let ufo = UfoId(world.spawn((0u8,)));
        let mut a = craft(600, 100_000);
        a.state = FlightState::PursuingUfo {
            route: RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(5.0, 0.0)),
            target: ufo,
        };
        let report = advance_aircraft(&mut a, &ctx(), 1);
        assert!(report.events.contains(&FlightEvent::TargetLost(ufo)));
        assert_eq!(a.status(), AircraftStatus::Returning);
    }

    #[test]
    fn test_engages_within_range() {
        let mut world = hecs::World::new();
        let ufo = UfoId(world.spawn((0u8,)));
        let mut a = craft(600, 100_000);
        a.position = GeoPos::new(4.5, 0.0);
        a.state = FlightState::PursuingUfo {
            route: RouteProgress::between(GeoPos::new(4.5, 0.0), GeoPos::new(10.0, 0.0)),
            target: ufo,
        };
        let mut c = ctx();
        c.target = Some(TargetSnapshot {
            pos: GeoPos::new(5.0, 0.0),
            speed: 300,
            destination: Some(GeoPos::new(20.0, 0.0)),
        });
        let report = advance_aircraft(&mut a, &c, 1);
        assert!(report.events.contains(&FlightEvent::Engaged(ufo)));
        assert_eq!(a.state, FlightState::Intercepting { target: ufo });
    }
}
