//! Fleet bookkeeping: global indices, hangars, deletion and re-homing.

use geoscape_core::prelude::*;
use geoscape_logic::catalog::{AircraftCatalog, AircraftKind, SizeClass};
use geoscape_logic::geometry::GeoPos;
use geoscape_logic::hangar::HangarError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CATALOG_JSON: &str = include_str!("../../../data/aircraft_catalog.json");

fn campaign_with(config: CampaignConfig) -> (Campaign, BaseId) {
    let catalog = AircraftCatalog::from_json(CATALOG_JSON).unwrap();
    let mut c = Campaign::new(catalog, config);
    let base = c.add_base(
        Base::new("Alpha", GeoPos::new(0.0, 0.0))
            .with_hangars(10, 4)
            .with_quarters(40, 500),
    );
    (c, base)
}

fn campaign() -> (Campaign, BaseId) {
    campaign_with(CampaignConfig::default())
}

#[test]
fn global_indices_stay_dense_after_delete() {
    let (mut c, base) = campaign();
    let ids: Vec<AircraftId> = (0..5)
        .map(|_| c.add_aircraft(base, "craft_inter_stiletto").unwrap())
        .collect();
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(c.global_index(*id), Some(i));
    }

    c.delete_aircraft(ids[2]).unwrap();

    assert_eq!(c.aircraft_count(), 4);
    assert!(c.aircraft(ids[2]).is_none());
    assert_eq!(c.global_index(ids[2]), None);
    assert_eq!(c.global_index(ids[3]), Some(2));
    assert_eq!(c.aircraft_by_global_index(3), Some(ids[4]));
    assert_eq!(c.aircraft_by_global_index(4), None);
    assert_eq!(c.bases[0].aircraft.len(), 4);
    assert_eq!(c.bases[0].hangars.small.cur, 4);
    assert!(c
        .drain_events()
        .contains(&CampaignEvent::AircraftRemoved { aircraft: ids[2] }));
}

#[test]
fn refuse_policy_rejects_full_hangar() {
    let config = CampaignConfig {
        hangar_policy: HangarPolicy::Refuse,
        ..CampaignConfig::default()
    };
    let catalog = AircraftCatalog::from_json(CATALOG_JSON).unwrap();
    let mut c = Campaign::new(catalog, config);
    let base = c.add_base(Base::new("Alpha", GeoPos::new(0.0, 0.0)).with_hangars(2, 0));

    c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    assert!(matches!(
        c.add_aircraft(base, "craft_inter_stiletto"),
        Err(FleetError::HangarAssignmentFailed(HangarError::HangarFull))
    ));
    assert!(matches!(
        c.add_aircraft(base, "craft_drop_firebird"),
        Err(FleetError::HangarAssignmentFailed(HangarError::NoOperationalHangar))
    ));
    assert_eq!(c.aircraft_count(), 2);
    assert_eq!(c.bases[0].hangars.small.cur, 2);
}

#[test]
fn default_policy_parks_unhoused_aircraft() {
    let catalog = AircraftCatalog::from_json(CATALOG_JSON).unwrap();
    let mut c = Campaign::new(catalog, CampaignConfig::default());
    let base = c.add_base(Base::new("Alpha", GeoPos::new(0.0, 0.0)).with_hangars(2, 0));

    for _ in 0..2 {
        c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    }
    let extra = c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    assert_eq!(c.aircraft(extra).unwrap().hangar, None);
    assert_eq!(c.bases[0].hangars.small.cur, 2);
    assert_eq!(c.aircraft_count(), 3);
}

#[test]
fn add_aircraft_rejects_unknown_input() {
    let (mut c, base) = campaign();
    assert!(matches!(
        c.add_aircraft(base, "craft_nonexistent"),
        Err(FleetError::TemplateNotFound(_))
    ));
    assert!(matches!(
        c.add_aircraft(BaseId(7), "craft_inter_stiletto"),
        Err(FleetError::UnknownBase(BaseId(7)))
    ));
    assert_eq!(c.aircraft_count(), 0);
}

#[test]
fn new_aircraft_gets_radar_and_announcement() {
    let (mut c, base) = campaign();
    let id = c.add_aircraft(base, "craft_inter_saracen").unwrap();
    let a = c.aircraft(id).unwrap();
    assert_eq!(a.radar.range, 5);
    assert_eq!(a.radar.tracking_range, 7);
    assert_eq!(a.fuel, a.stats.fuel_size);
    assert_eq!(a.status(), geoscape_logic::status::AircraftStatus::Home);
    drop(a);
    assert_eq!(c.messages.last().unwrap().text, "A new Saracen is ready in Alpha");
}

#[test]
fn deleting_current_aircraft_selects_next() {
    let (mut c, base) = campaign();
    let first = c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    let second = c.add_aircraft(base, "craft_drop_firebird").unwrap();
    assert_eq!(c.bases[0].current_aircraft, Some(first));

    c.delete_aircraft(first).unwrap();
    assert_eq!(c.bases[0].current_aircraft, Some(second));
    c.delete_aircraft(second).unwrap();
    assert_eq!(c.bases[0].current_aircraft, None);
    assert!(matches!(
        c.delete_aircraft(second),
        Err(FleetError::UnknownAircraft(_))
    ));
}

#[test]
fn delete_keeps_crew_but_destroy_loses_it() {
    let (mut c, base) = campaign();
    let kept = c.add_aircraft(base, "craft_drop_firebird").unwrap();
    let lost = c.add_aircraft(base, "craft_drop_firebird").unwrap();

    let a = c.hire_employee("Ann", EmployeeKind::Soldier, base).unwrap();
    let b = c.hire_employee("Bo", EmployeeKind::Soldier, base).unwrap();
    let d = c.hire_employee("Di", EmployeeKind::Soldier, base).unwrap();
    c.assign_team_member(kept, a).unwrap();
    c.assign_team_member(lost, b).unwrap();
    c.assign_team_member(lost, d).unwrap();
    assert!(c.give_item(d, "assault_rifle", 2));
    assert_eq!(c.bases[0].storage_capacity.cur, 2);

    c.delete_aircraft(kept).unwrap();
    assert!(c.employees.get(a).is_some());
    assert_eq!(c.employee_aircraft(a), None);

    c.destroy_aircraft(lost).unwrap();
    assert!(c.employees.get(b).is_none());
    assert!(c.employees.get(d).is_none());
    assert_eq!(c.employees.len(), 1);
    assert_eq!(c.bases[0].quarters.cur, 1);
    assert_eq!(c.bases[0].item_count("assault_rifle"), 0);
    assert_eq!(c.bases[0].storage_capacity.cur, 0);
    assert_eq!(c.aircraft_count(), 0);
}

#[test]
fn rehome_checks_destination() {
    let (mut c, alpha) = campaign();
    let craft = c.add_aircraft(alpha, "craft_drop_firebird").unwrap();

    let bare = c.add_base(Base::new("Bare", GeoPos::new(5.0, 0.0)));
    let cramped = c.add_base(Base::new("Cramped", GeoPos::new(5.0, 5.0)).with_hangars(0, 1));
    c.add_aircraft(cramped, "craft_drop_raptor").unwrap();
    let crowded = c.add_base(
        Base::new("Crowded", GeoPos::new(5.0, -5.0))
            .with_hangars(0, 2)
            .with_quarters(5, 100),
    );
    let remote = c.add_base(
        Base::new("Remote", GeoPos::new(90.0, 0.0))
            .with_hangars(0, 2)
            .with_quarters(20, 100),
    );
    c.aircraft_mut(craft).unwrap().fuel = 100;

    assert!(matches!(
        c.move_to_new_home_base(craft, alpha),
        Err(FleetError::SameBase)
    ));
    assert!(matches!(
        c.check_move_to_base(craft, bare),
        Err(FleetError::NoOperationalHangar)
    ));
    assert!(matches!(
        c.check_move_to_base(craft, cramped),
        Err(FleetError::HangarFull)
    ));
    assert!(matches!(
        c.check_move_to_base(craft, crowded),
        Err(FleetError::InsufficientCrewQuarters)
    ));
    assert!(matches!(
        c.move_to_new_home_base(craft, remote),
        Err(FleetError::OutOfRange)
    ));
    assert_eq!(c.aircraft(craft).unwrap().home_base, alpha);
    assert_eq!(c.bases[0].aircraft, vec![craft]);
}

#[test]
fn rehome_checks_storage_for_team_equipment() {
    let (mut c, alpha) = campaign();
    let craft = c.add_aircraft(alpha, "craft_drop_firebird").unwrap();
    let soldier = c.hire_employee("Ann", EmployeeKind::Soldier, alpha).unwrap();
    c.assign_team_member(craft, soldier).unwrap();
    c.give_item(soldier, "heavy_laser", 5);

    let depot = c.add_base(
        Base::new("Depot", GeoPos::new(5.0, 0.0))
            .with_hangars(0, 2)
            .with_quarters(20, 4),
    );
    assert_eq!(c.storage_room(craft), 5);
    assert!(matches!(
        c.check_move_to_base(craft, depot),
        Err(FleetError::InsufficientStorage)
    ));
}

#[test]
fn rehome_moves_crew_and_equipment() {
    let (mut c, alpha) = campaign();
    let other = c.add_aircraft(alpha, "craft_inter_stiletto").unwrap();
    let craft = c.add_aircraft(alpha, "craft_drop_firebird").unwrap();
    let soldier = c.hire_employee("Ann", EmployeeKind::Soldier, alpha).unwrap();
    c.assign_team_member(craft, soldier).unwrap();
    c.give_item(soldier, "medikit", 1);

    let beta = c.add_base(
        Base::new("Beta", GeoPos::new(5.0, 0.0))
            .with_hangars(0, 2)
            .with_quarters(20, 100),
    );
    c.move_to_new_home_base(craft, beta).unwrap();

    assert_eq!(c.aircraft(craft).unwrap().home_base, beta);
    assert_eq!(c.global_index(craft), Some(1));
    assert_eq!(c.bases[0].aircraft, vec![other]);
    assert_eq!(c.bases[1].aircraft, vec![craft]);
    assert_eq!(c.bases[1].current_aircraft, Some(craft));
    assert_eq!(c.bases[0].hangars.large.cur, 0);
    assert_eq!(c.bases[1].hangars.large.cur, 1);

    assert_eq!(c.employees.get(soldier).unwrap().base, beta);
    assert_eq!(c.employee_aircraft(soldier), Some(craft));
    assert_eq!(c.bases[0].quarters.cur, 0);
    assert_eq!(c.bases[1].quarters.cur, 1);
    assert_eq!(c.bases[0].item_count("medikit"), 0);
    assert_eq!(c.bases[1].item_count("medikit"), 1);

    assert!(c.drain_events().contains(&CampaignEvent::AircraftRehomed {
        aircraft: craft,
        from: alpha,
        to: beta,
    }));
}

#[test]
fn base_lookups() {
    let (mut c, base) = campaign();
    let a = c.add_aircraft(base, "craft_inter_stiletto").unwrap();
    let b = c.add_aircraft(base, "craft_drop_firebird").unwrap();
    let d = c.add_aircraft(base, "craft_inter_dragon").unwrap();

    assert_eq!(c.count_type_in_base(base, AircraftKind::Interceptor), 2);
    assert_eq!(c.count_type_in_base(base, AircraftKind::Transporter), 1);
    assert_eq!(c.aircraft_in_base_by_index(base, 1), Some(b));
    assert_eq!(c.aircraft_in_base_by_index(base, 9), None);
    assert_eq!(c.aircraft_in_base_by_index_safe(base, 2), Some(d));
    assert_eq!(c.aircraft_in_base_by_index_safe(base, 9), Some(a));
    assert_eq!(c.aircraft_in_base_by_index_safe(BaseId(3), 0), None);
}

/// Hangar counters of `base` against the aircraft it actually owns.
fn assert_hangars_match_fleet(c: &Campaign, base: BaseId, policy: HangarPolicy, step: usize) {
    let b = c.base(base).unwrap();
    for size in [SizeClass::Small, SizeClass::Large] {
        let owned = b
            .aircraft
            .iter()
            .filter(|id| c.aircraft(**id).unwrap().size == size)
            .count() as u32;
        let cap = b.hangars.get(size);
        if policy == HangarPolicy::Refuse {
            assert_eq!(cap.cur, owned, "{} {:?} at step {}", b.name, size, step);
        }
        assert_eq!(cap.cur, owned.min(cap.max), "{} {:?} at step {}", b.name, size, step);
    }
}

fn random_fleet_changes(policy: HangarPolicy, seed: u64) {
    let config = CampaignConfig {
        hangar_policy: policy,
        ..CampaignConfig::default()
    };
    let catalog = AircraftCatalog::from_json(CATALOG_JSON).unwrap();
    let mut c = Campaign::new(catalog, config);
    let bases = [
        c.add_base(
            Base::new("Alpha", GeoPos::new(0.0, 0.0))
                .with_hangars(3, 2)
                .with_quarters(100, 5000),
        ),
        c.add_base(
            Base::new("Beta", GeoPos::new(5.0, 5.0))
                .with_hangars(2, 3)
                .with_quarters(100, 5000),
        ),
        c.add_base(
            Base::new("Gamma", GeoPos::new(-5.0, 3.0))
                .with_hangars(4, 0)
                .with_quarters(100, 5000),
        ),
    ];
    let templates = [
        "craft_inter_stiletto",
        "craft_inter_saracen",
        "craft_drop_firebird",
        "craft_drop_raptor",
    ];

    let mut rng = StdRng::seed_from_u64(seed);
    for step in 0..400 {
        let count = c.aircraft_count();
        match rng.gen_range(0..3) {
            0 => {
                let base = bases[rng.gen_range(0..bases.len())];
                let template = templates[rng.gen_range(0..templates.len())];
                let _ = c.add_aircraft(base, template);
            }
            1 if count > 0 => {
                let id = c.aircraft_by_global_index(rng.gen_range(0..count)).unwrap();
                c.delete_aircraft(id).unwrap();
            }
            _ if count > 0 => {
                let id = c.aircraft_by_global_index(rng.gen_range(0..count)).unwrap();
                let dest = bases[rng.gen_range(0..bases.len())];
                let _ = c.move_to_new_home_base(id, dest);
            }
            _ => {}
        }
        for base in bases {
            assert_hangars_match_fleet(&c, base, policy, step);
        }
    }

    for base in bases {
        let tracked = c.base(base).unwrap().hangars;
        c.recompute_hangars(base);
        assert_eq!(c.base(base).unwrap().hangars, tracked);
    }
    let owned: usize = bases.iter().map(|b| c.base(*b).unwrap().aircraft.len()).sum();
    assert_eq!(owned, c.aircraft_count());
}

#[test]
fn hangar_counters_follow_random_fleet_changes() {
    random_fleet_changes(HangarPolicy::Refuse, 42);
    random_fleet_changes(HangarPolicy::AllowUnhoused, 7);
}
