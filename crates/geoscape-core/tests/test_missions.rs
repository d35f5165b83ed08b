//! End-to-end flights: missions, pursuit, low fuel, refueling and transfers.

use geoscape_core::prelude::*;
use geoscape_logic::catalog::AircraftCatalog;
use geoscape_logic::geometry::GeoPos;
use geoscape_logic::status::AircraftStatus;

const CATALOG_JSON: &str = include_str!("../../../data/aircraft_catalog.json");

fn campaign() -> (Campaign, BaseId) {
    let catalog = AircraftCatalog::from_json(CATALOG_JSON).unwrap();
    let mut c = Campaign::new(catalog, CampaignConfig::default());
    let base = c.add_base(
        Base::new("Alpha", GeoPos::new(0.0, 0.0))
            .with_hangars(4, 4)
            .with_quarters(40, 500),
    );
    (c, base)
}

fn status(c: &Campaign, id: AircraftId) -> AircraftStatus {
    c.aircraft(id).unwrap().status()
}

/// A transporter with one soldier aboard and the given fuel.
fn crewed_transport(c: &mut Campaign, base: BaseId, fuel: i32) -> AircraftId {
    let id = c.add_aircraft(base, "craft_drop_firebird").unwrap();
    let soldier = c.hire_employee("Ann", EmployeeKind::Soldier, base).unwrap();
    c.assign_team_member(id, soldier).unwrap();
    c.aircraft_mut(id).unwrap().fuel = fuel;
    id
}

/// An interceptor with a pilot.
fn piloted_interceptor(c: &mut Campaign, base: BaseId) -> AircraftId {
    let id = c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    let pilot = c.hire_employee("Bo", EmployeeKind::Pilot, base).unwrap();
    c.assign_pilot(id, pilot).unwrap();
    id
}

#[test]
fn mission_flight_reaches_drop_point() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 130);
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));

    assert_eq!(c.send_to_mission(craft, "mission_crash"), Ok(DispatchOutcome::Launched));
    assert_eq!(status(&c, craft), AircraftStatus::EnRouteToMission);

    c.advance(30);
    assert_eq!(status(&c, craft), AircraftStatus::EnRouteToMission);
    assert!((c.aircraft(craft).unwrap().position.lon - 5.0).abs() < 1e-6);

    c.advance(30);
    assert_eq!(status(&c, craft), AircraftStatus::ReadyToDrop);
    assert!(c.mission("mission_crash").unwrap().active);
    assert_eq!(c.aircraft(craft).unwrap().fuel, 70);

    let events = c.drain_events();
    assert!(events.contains(&CampaignEvent::MissionReached {
        aircraft: craft,
        mission: "mission_crash".into(),
    }));
    assert!(events.contains(&CampaignEvent::PauseRequested));
    assert!(events.contains(&CampaignEvent::RadarOverlayDirty));
    assert!(c.drain_events().is_empty());
}

/// Send a crewed transport to a mission 10 degrees out and let it fly with
/// nobody recalling it. Returns the lowest fuel seen and whether the
/// mission site was reached.
fn unattended_round_trip(fuel: i32, dt: i32) -> (i32, bool) {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, fuel);
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    c.send_to_mission(craft, "mission_crash").unwrap();

    let mut lowest = fuel;
    let mut reached = false;
    for _ in 0..1000 {
        c.advance(dt);
        lowest = lowest.min(c.aircraft(craft).unwrap().fuel);
        reached |= c
            .drain_events()
            .iter()
            .any(|e| matches!(e, CampaignEvent::MissionReached { .. }));
        if c.aircraft(craft).unwrap().is_in_base() {
            break;
        }
    }
    assert!(c.aircraft(craft).unwrap().is_in_base(), "fuel {} dt {} never came home", fuel, dt);
    (lowest, reached)
}

#[test]
fn round_trip_fuel_never_goes_negative() {
    // 20 degrees there and back at speed 600 take exactly 120 seconds.
    for fuel in [120, 121, 125, 140] {
        for dt in [1, 7, 60] {
            let (lowest, reached) = unattended_round_trip(fuel, dt);
            assert!(lowest >= 0, "fuel {} dt {} went down to {}", fuel, dt, lowest);
            assert!(reached, "fuel {} dt {} never reached the mission", fuel, dt);
        }
    }
}

#[test]
fn exactly_enough_fuel_is_accepted() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 120);
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    assert_eq!(c.send_to_mission(craft, "mission_crash"), Ok(DispatchOutcome::Launched));

    let short = crewed_transport(&mut c, base, 119);
    assert_eq!(
        c.send_to_mission(short, "mission_crash"),
        Err(DispatchError::InsufficientFuel)
    );
}

#[test]
fn low_fuel_recall_preempts_mission_arrival() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 130);
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    c.send_to_mission(craft, "mission_crash").unwrap();
    c.advance(56);
    c.drain_events();

    // 4 more seconds reach the site, but 58 fuel cannot fly the 60 back.
    c.aircraft_mut(craft).unwrap().fuel = 62;
    c.advance(7);

    assert_eq!(status(&c, craft), AircraftStatus::Returning);
    assert!(!c.mission("mission_crash").unwrap().active);
    let events = c.drain_events();
    assert!(!events.iter().any(|e| matches!(e, CampaignEvent::MissionReached { .. })));
    assert!(!events.contains(&CampaignEvent::PauseRequested));
    assert_eq!(c.messages.count(MessageKind::AircraftLowFuel), 1);

    for _ in 0..20 {
        c.advance(7);
        assert!(c.aircraft(craft).unwrap().fuel >= 0);
    }
    assert!(c.aircraft(craft).unwrap().is_in_base());
}

#[test]
fn refused_mission_changes_nothing() {
    let (mut c, base) = campaign();
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));

    let empty = c.add_aircraft(base, "craft_drop_firebird").unwrap();
    assert_eq!(c.send_to_mission(empty, "mission_crash"), Err(DispatchError::NoCrew));

    let thirsty = crewed_transport(&mut c, base, 100);
    let before = (*c.aircraft(thirsty).unwrap()).clone();
    assert_eq!(
        c.send_to_mission(thirsty, "mission_crash"),
        Err(DispatchError::InsufficientFuel)
    );
    assert_eq!(*c.aircraft(thirsty).unwrap(), before);
    assert_eq!(c.messages.count(MessageKind::InsufficientFuel), 1);

    assert_eq!(
        c.send_to_mission(thirsty, "mission_nowhere"),
        Err(DispatchError::UnknownMission("mission_nowhere".into()))
    );
}

#[test]
fn base_under_attack_defends_in_place() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 72000);
    c.add_mission(Mission::new("mission_base_attack", GeoPos::new(0.0, 0.0)));
    c.base_mut(base).unwrap().under_attack = true;

    assert_eq!(
        c.send_to_mission(craft, "mission_base_attack"),
        Ok(DispatchOutcome::DefendingBase)
    );
    assert_eq!(status(&c, craft), AircraftStatus::Home);
    assert!(c.mission("mission_base_attack").unwrap().active);
    assert!(c.drain_events().contains(&CampaignEvent::BaseDefenseLaunched {
        base,
        mission: "mission_base_attack".into(),
    }));
}

#[test]
fn return_and_refuel_cycle() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 130);
    c.add_mission(Mission::new("mission_crash", GeoPos::new(10.0, 0.0)));
    c.send_to_mission(craft, "mission_crash").unwrap();
    c.advance(60);
    c.collect_item(craft, "plasma_rifle", 3);
    assert!(c.collect_aliens(craft, "taman", 1, 2));
    assert!(c.collect_aliens(craft, "taman", 0, 1));

    assert!(c.return_to_base(craft));
    assert_eq!(status(&c, craft), AircraftStatus::Returning);
    c.advance(60);
    assert_eq!(status(&c, craft), AircraftStatus::Refueling);
    assert_eq!(c.bases[0].item_count("plasma_rifle"), 3);
    assert!(c.aircraft(craft).unwrap().item_cargo.is_empty());
    assert!(c.aircraft(craft).unwrap().alien_cargo.is_empty());
    assert_eq!(c.bases[0].aliens["taman"], AlienStock { alive: 1, dead: 3 });
    assert!(c.drain_events().contains(&CampaignEvent::AircraftReturnedHome {
        aircraft: craft,
        base,
    }));

    c.advance(5000);
    let a = c.aircraft(craft).unwrap();
    assert_eq!(a.status(), AircraftStatus::Home);
    assert_eq!(a.fuel, a.stats.fuel_size);
    drop(a);
    assert_eq!(c.messages.count(MessageKind::AircraftRefueled), 1);
    assert_eq!(
        c.messages.last().unwrap().text,
        "Craft Firebird has refueled at Alpha."
    );
    assert!(!c.return_to_base(craft));
}

#[test]
fn low_fuel_sends_aircraft_home_once() {
    let (mut c, base) = campaign();
    let craft = piloted_interceptor(&mut c, base);
    c.aircraft_mut(craft).unwrap().fuel = 200;

    c.send_to_position(craft, GeoPos::new(30.0, 0.0)).unwrap();
    let mut turned_at = None;
    for tick in 0..150 {
        c.advance(1);
        if status(&c, craft) == AircraftStatus::Returning {
            turned_at = Some(tick);
            break;
        }
    }
    let tick = turned_at.expect("aircraft never turned home");
    assert!(tick > 90, "turned home too early at tick {}", tick);
    assert_eq!(c.messages.count(MessageKind::AircraftLowFuel), 1);

    for _ in 0..150 {
        c.advance(1);
    }
    assert!(c.aircraft(craft).unwrap().is_in_base());
    assert_eq!(c.messages.count(MessageKind::AircraftLowFuel), 1);
}

#[test]
fn antimatter_shortage_is_reported_once() {
    let (mut c, base) = campaign();
    c.base_mut(base).unwrap().antimatter = 10;
    let craft = c.add_aircraft(base, "craft_inter_dragon").unwrap();
    {
        let a = c.aircraft_mut(craft).unwrap();
        a.fuel = 0;
        a.state = FlightState::Refueling;
    }

    for _ in 0..20 {
        c.advance(600);
    }
    let a = c.aircraft(craft).unwrap();
    assert_eq!(a.status(), AircraftStatus::Refueling);
    assert!(a.fuel > 0 && a.fuel < a.stats.fuel_size);
    drop(a);
    assert_eq!(c.bases[0].antimatter, 0);
    assert_eq!(c.messages.count(MessageKind::AircraftCannotRefuel), 1);

    c.base_mut(base).unwrap().antimatter = 100;
    c.advance(3600);
    assert_eq!(status(&c, craft), AircraftStatus::Home);
    assert_eq!(c.messages.count(MessageKind::AircraftRefueled), 1);
}

#[test]
fn pursuit_ends_in_interception() {
    let (mut c, base) = campaign();
    let craft = piloted_interceptor(&mut c, base);
    let ufo = c.spawn_ufo("craft_ufo_harvester", GeoPos::new(5.0, 5.0)).unwrap();
    c.ufo_fly_to(ufo, GeoPos::new(5.0, 40.0));

    c.send_pursuing_ufo(craft, ufo).unwrap();
    assert_eq!(status(&c, craft), AircraftStatus::PursuingUfo);

    let mut engaged = false;
    for _ in 0..500 {
        c.advance(10);
        if status(&c, craft) == AircraftStatus::Intercepting {
            engaged = true;
            break;
        }
    }
    assert!(engaged, "pursuer never reached its target");
    assert_eq!(c.aircraft(craft).unwrap().state.target(), Some(ufo));

    assert!(c.destroy_ufo(ufo));
    assert_eq!(status(&c, craft), AircraftStatus::Returning);
    assert!(c.ufo(ufo).is_none());
}

#[test]
fn pursuit_needs_pilot() {
    let (mut c, base) = campaign();
    let craft = c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    let ufo = c.spawn_ufo("craft_ufo_scout", GeoPos::new(5.0, 5.0)).unwrap();
    assert_eq!(c.send_pursuing_ufo(craft, ufo), Err(DispatchError::NoPilot));
    assert!(!c.can_intercept(craft));
    assert_eq!(status(&c, craft), AircraftStatus::Home);
}

#[test]
fn vanished_ufo_calls_off_pursuit() {
    let (mut c, base) = campaign();
    let craft = piloted_interceptor(&mut c, base);
    let ufo = c.spawn_ufo("craft_ufo_scout", GeoPos::new(20.0, 10.0)).unwrap();
    c.ufo_fly_to(ufo, GeoPos::new(60.0, 10.0));
    c.send_pursuing_ufo(craft, ufo).unwrap();
    c.advance(10);

    c.ufo_disappear(ufo);
    assert_eq!(status(&c, craft), AircraftStatus::Returning);
    assert!(!c.ufo(ufo).unwrap().detected);
}

#[test]
fn removed_mission_recalls_transport() {
    let (mut c, base) = campaign();
    let craft = crewed_transport(&mut c, base, 72000);
    c.add_mission(Mission::new("mission_terror", GeoPos::new(20.0, 20.0)));
    c.send_to_mission(craft, "mission_terror").unwrap();
    assert!(c.reserve_team(craft, "mission_terror"));
    c.advance(60);

    assert!(c.remove_mission("mission_terror").is_some());
    let a = c.aircraft(craft).unwrap();
    assert_eq!(a.status(), AircraftStatus::Returning);
    assert!(a.team_reservation.is_none());
}

#[test]
fn transfer_moves_aircraft_and_crew() {
    let (mut c, alpha) = campaign();
    let beta = c.add_base(
        Base::new("Beta", GeoPos::new(10.0, 0.0))
            .with_hangars(2, 2)
            .with_quarters(20, 100),
    );
    let craft = crewed_transport(&mut c, alpha, 72000);
    let soldier = c.aircraft(craft).unwrap().team_members().next().unwrap();

    c.transfer_to_base(craft, beta).unwrap();
    assert_eq!(status(&c, craft), AircraftStatus::Transferring);
    assert!(!c.aircraft(craft).unwrap().is_on_geoscape());

    // 10 degrees at speed 600 takes about 60 seconds.
    c.advance(30);
    assert_eq!(status(&c, craft), AircraftStatus::Transferring);
    c.advance(40);

    let a = c.aircraft(craft).unwrap();
    assert_eq!(a.status(), AircraftStatus::Home);
    assert_eq!(a.home_base, beta);
    assert!(a.position.same_place(&GeoPos::new(10.0, 0.0)));
    drop(a);
    assert!(c.bases[0].aircraft.is_empty());
    assert_eq!(c.bases[1].aircraft, vec![craft]);
    assert_eq!(c.employees.get(soldier).unwrap().base, beta);
    assert_eq!(c.bases[1].quarters.cur, 1);
    assert_eq!(c.bases[1].hangars.large.cur, 1);
    assert_eq!(c.bases[0].hangars.large.cur, 0);
    assert_eq!(c.messages.count(MessageKind::AircraftTransferred), 1);
}

#[test]
fn transfer_requires_parked_aircraft() {
    let (mut c, alpha) = campaign();
    let beta = c.add_base(Base::new("Beta", GeoPos::new(10.0, 0.0)).with_hangars(2, 2));
    let craft = piloted_interceptor(&mut c, alpha);
    c.send_to_position(craft, GeoPos::new(1.0, 1.0)).unwrap();
    assert!(matches!(
        c.transfer_to_base(craft, beta),
        Err(FleetError::NotInBase)
    ));
    assert!(matches!(
        c.transfer_to_base(craft, alpha),
        Err(FleetError::SameBase)
    ));
}
