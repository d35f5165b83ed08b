//! Campaign engine - owns the air-operations world and runs its ticks

use std::collections::{BTreeMap, HashSet};

use hecs::World;
use rand::Rng;

use geoscape_logic::catalog::{AircraftCatalog, CatalogError};
use geoscape_logic::geometry::GeoPos;
use geoscape_logic::route::RouteProgress;

use crate::components::*;
use crate::config::CampaignConfig;
use crate::employees::{CarriedItem, EmployeeKind, EmployeeRoster};
use crate::messages::{CampaignEvent, MessageKind, MessageLog};
use crate::systems::*;

/// Air operations of one campaign.
///
/// Aircraft and UFOs are entities in `world`; everything else (bases,
/// missions, employees) is plain campaign data. The global aircraft order
/// is the order aircraft were added, compacted on removal.
pub struct Campaign {
    /// ECS world holding `Aircraft` and `Ufo` entities
    pub world: World,
    pub catalog: AircraftCatalog,
    pub config: CampaignConfig,
    pub bases: Vec<Base>,
    pub employees: EmployeeRoster,
    pub missions: BTreeMap<String, Mission>,
    pub date: CampaignDate,
    pub messages: MessageLog,

    events: Vec<CampaignEvent>,
    pub(crate) aircraft_order: Vec<AircraftId>,
    pub(crate) ufo_order: Vec<UfoId>,
}

impl Campaign {
    pub fn new(catalog: AircraftCatalog, config: CampaignConfig) -> Self {
        Self {
            world: World::new(),
            catalog,
            config,
            bases: Vec::new(),
            employees: EmployeeRoster::new(),
            missions: BTreeMap::new(),
            date: CampaignDate::default(),
            messages: MessageLog::new(),
            events: Vec::new(),
            aircraft_order: Vec::new(),
            ufo_order: Vec::new(),
        }
    }

    // ============================================================================
    // BASES, MISSIONS, EMPLOYEES
    // ============================================================================

    pub fn add_base(&mut self, base: Base) -> BaseId {
        self.bases.push(base);
        BaseId(self.bases.len() - 1)
    }

    pub fn base(&self, id: BaseId) -> Option<&Base> {
        self.bases.get(id.0)
    }

    pub fn base_mut(&mut self, id: BaseId) -> Option<&mut Base> {
        self.bases.get_mut(id.0)
    }

    pub fn add_mission(&mut self, mission: Mission) {
        self.missions.insert(mission.id.clone(), mission);
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.get(id)
    }

    /// Remove a mission and send home every aircraft flying to it.
    pub fn remove_mission(&mut self, id: &str) -> Option<Mission> {
        let mission = self.missions.remove(id)?;
        self.notify_mission_removed(id);
        Some(mission)
    }

    /// Hire an employee living at `base`. `None` when the base is unknown or
    /// its quarters are full.
    pub fn hire_employee(
        &mut self,
        name: impl Into<String>,
        kind: EmployeeKind,
        base: BaseId,
    ) -> Option<Ucn> {
        let b = self.bases.get_mut(base.0)?;
        if b.quarters.is_full() {
            return None;
        }
        b.quarters.cur += 1;
        Some(self.employees.hire(name, kind, base))
    }

    /// Put an item in an employee's inventory; it counts against the storage
    /// of the employee's base.
    pub fn give_item(&mut self, ucn: Ucn, item: &str, size: u32) -> bool {
        let employee = match self.employees.get_mut(ucn) {
            Some(e) => e,
            None => return false,
        };
        employee.inventory.push(CarriedItem {
            item: item.to_string(),
            size,
        });
        let base = employee.base;
        if let Some(b) = self.bases.get_mut(base.0) {
            b.store_item(item, 1, size);
        }
        true
    }

    /// Dismiss an employee: leave any aircraft, free the quarters and take
    /// the carried equipment out of base storage.
    pub fn fire_employee(&mut self, ucn: Ucn) -> bool {
        if let Some(aircraft) = self.employee_aircraft(ucn) {
            let _ = self.remove_crew_member(aircraft, ucn);
        }
        let employee = match self.employees.fire(ucn) {
            Some(e) => e,
            None => return false,
        };
        if let Some(b) = self.bases.get_mut(employee.base.0) {
            b.quarters.cur = b.quarters.cur.saturating_sub(1);
            for carried in &employee.inventory {
                b.store_item(&carried.item, -1, carried.size);
            }
        }
        log::debug!("fire_employee: {} ({}) dismissed", employee.name, ucn);
        true
    }

    // ============================================================================
    // ENTITY ACCESS
    // ============================================================================

    pub fn aircraft(&self, id: AircraftId) -> Option<hecs::Ref<'_, Aircraft>> {
        self.world.get::<&Aircraft>(id.0).ok()
    }

    pub fn aircraft_mut(&mut self, id: AircraftId) -> Option<&mut Aircraft> {
        self.world.query_one_mut::<&mut Aircraft>(id.0).ok()
    }

    pub fn ufo(&self, id: UfoId) -> Option<hecs::Ref<'_, Ufo>> {
        self.world.get::<&Ufo>(id.0).ok()
    }

    pub fn ufo_mut(&mut self, id: UfoId) -> Option<&mut Ufo> {
        self.world.query_one_mut::<&mut Ufo>(id.0).ok()
    }

    /// All aircraft in global order.
    pub fn aircraft_ids(&self) -> &[AircraftId] {
        &self.aircraft_order
    }

    pub fn ufo_ids(&self) -> &[UfoId] {
        &self.ufo_order
    }

    pub fn aircraft_count(&self) -> usize {
        self.aircraft_order.len()
    }

    // ============================================================================
    // EVENTS AND MESSAGES
    // ============================================================================

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<CampaignEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[CampaignEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: CampaignEvent) {
        self.events.push(event);
    }

    pub(crate) fn post(&mut self, kind: MessageKind, title: &str, text: String) {
        self.messages
            .push(&self.config.notifications, kind, title, text, self.date);
    }

    // ============================================================================
    // UFOS
    // ============================================================================

    /// Put a grounded UFO of the given template on the map.
    pub fn spawn_ufo(&mut self, template_id: &str, pos: GeoPos) -> Result<UfoId, CatalogError> {
        let template = self.catalog.get(template_id)?;
        let ufo = Ufo::from_template(template, pos);
        let id = UfoId(self.world.spawn((ufo,)));
        self.ufo_order.push(id);
        Ok(id)
    }

    /// A UFO at a random position flying to another random position.
    pub fn spawn_random_ufo<R: Rng>(
        &mut self,
        rng: &mut R,
        template_id: &str,
    ) -> Result<UfoId, CatalogError> {
        let from = GeoPos::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0));
        let to = GeoPos::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0));
        let id = self.spawn_ufo(template_id, from)?;
        self.ufo_fly_to(id, to);
        Ok(id)
    }

    /// Start a UFO flying toward `dest`.
    pub fn ufo_fly_to(&mut self, id: UfoId, dest: GeoPos) -> bool {
        match self.ufo_mut(id) {
            Some(ufo) => {
                ufo.route = Some(RouteProgress::between(ufo.position, dest));
                ufo.landed = false;
                true
            }
            None => false,
        }
    }

    /// The UFO dropped off radar; pursuers give up.
    pub fn ufo_disappear(&mut self, id: UfoId) {
        if let Some(ufo) = self.ufo_mut(id) {
            ufo.detected = false;
        }
        self.notify_ufo_disappeared(id);
    }

    /// Shot down or otherwise gone for good.
    pub fn destroy_ufo(&mut self, id: UfoId) -> bool {
        self.notify_ufo_removed(id, true);
        self.ufo_order.retain(|u| *u != id);
        self.world.despawn(id.0).is_ok()
    }

    // ============================================================================
    // TICK
    // ============================================================================

    /// Advance the campaign clock by `dt` seconds.
    pub fn advance(&mut self, dt: i32) {
        if dt <= 0 {
            return;
        }
        self.date.advance(dt as i64);
        self.run_ufos(dt);
        self.run_aircraft(dt);
    }

    /// Move UFOs; landed UFOs shake off their pursuers.
    pub fn run_ufos(&mut self, dt: i32) {
        let (arrived, _) = ufo_flight_system(&mut self.world, dt);
        for id in arrived {
            let has_mission = match self.ufo_mut(id) {
                Some(ufo) => {
                    ufo.landed = ufo.mission.is_some();
                    ufo.landed
                }
                None => continue,
            };
            if has_mission {
                log::info!("UFO {:?} landed", id);
                self.emit(CampaignEvent::UfoLanded { ufo: id });
                self.notify_ufo_disappeared(id);
            }
        }
    }

    /// Advance every aircraft of every base, in base order.
    pub fn run_aircraft(&mut self, dt: i32) {
        if dt <= 0 {
            return;
        }
        let mut any_moved = false;
        let mut done: HashSet<AircraftId> = HashSet::new();

        for b in 0..self.bases.len() {
            let ids = self.bases[b].aircraft.clone();
            for id in ids {
                if !done.insert(id) {
                    continue;
                }
                let ctx = match self.flight_context(id) {
                    Some(c) => c,
                    None => continue,
                };
                let report = match self.aircraft_mut(id) {
                    Some(aircraft) => advance_aircraft(aircraft, &ctx, dt),
                    None => continue,
                };
                any_moved |= report.moved;
                for event in report.events {
                    self.apply_flight_event(id, event);
                }
            }
        }

        if any_moved {
            self.emit(CampaignEvent::RadarOverlayDirty);
        }
    }

    fn flight_context(&self, id: AircraftId) -> Option<FlightContext> {
        let aircraft = self.aircraft(id)?;
        let base = self.bases.get(aircraft.home_base.0)?;
        let target = aircraft.state.target().and_then(|t| {
            self.ufo(t).map(|ufo| TargetSnapshot {
                pos: ufo.position,
                speed: ufo.stats.speed,
                destination: ufo.destination(),
            })
        });
        Some(FlightContext {
            home: base.pos,
            antimatter_available: base.antimatter,
            refuel_factor: self.config.refuel_factor,
            engagement_range: self.config.engagement_range,
            target,
        })
    }

    fn apply_flight_event(&mut self, id: AircraftId, event: FlightEvent) {
        let (name, home) = match self.aircraft(id) {
            Some(a) => (a.name.clone(), a.home_base),
            None => return,
        };
        let base_name = self
            .bases
            .get(home.0)
            .map(|b| b.name.clone())
            .unwrap_or_default();

        match event {
            FlightEvent::ReachedMission(mission) => {
                if let Some(m) = self.missions.get_mut(&mission) {
                    m.active = true;
                }
                self.post(
                    MessageKind::MissionReached,
                    "Notice",
                    format!("Craft {} has arrived at its mission site.", name),
                );
                self.emit(CampaignEvent::MissionReached { aircraft: id, mission });
                self.emit(CampaignEvent::PauseRequested);
            }
            FlightEvent::ReturnedHome => {
                self.unload_cargo(id, home);
                if let Some(a) = self.aircraft_mut(id) {
                    a.notify_sent.clear(NoticeKind::LowFuel);
                }
                self.emit(CampaignEvent::AircraftReturnedHome { aircraft: id, base: home });
            }
            FlightEvent::Refueled {
                antimatter_used,
                limited,
                full,
            } => {
                if let Some(b) = self.bases.get_mut(home.0) {
                    b.consume_antimatter(antimatter_used);
                }
                if limited {
                    let first = self
                        .aircraft_mut(id)
                        .is_some_and(|a| a.notify_sent.fire(NoticeKind::CannotRefuel));
                    if first {
                        self.post(
                            MessageKind::AircraftCannotRefuel,
                            "Notice",
                            format!(
                                "Craft {} couldn't be completely refueled at {}. Not enough antimatter.",
                                name, base_name
                            ),
                        );
                    }
                }
                if full {
                    if let Some(a) = self.aircraft_mut(id) {
                        a.notify_sent.clear(NoticeKind::CannotRefuel);
                    }
                    self.post(
                        MessageKind::AircraftRefueled,
                        "Notice",
                        format!("Craft {} has refueled at {}.", name, base_name),
                    );
                }
            }
            FlightEvent::LowFuel => {
                let first = self
                    .aircraft_mut(id)
                    .is_some_and(|a| a.notify_sent.fire(NoticeKind::LowFuel));
                if first {
                    self.post(
                        MessageKind::AircraftLowFuel,
                        "Notice",
                        format!("Craft {} is low on fuel and must return to base.", name),
                    );
                }
            }
            FlightEvent::TransferDue(dest) => self.finish_transfer(id, home, dest),
            FlightEvent::ReachedPosition => {
                log::debug!("{} reached its destination", name);
            }
            FlightEvent::Engaged(ufo) => {
                log::info!("{} engages UFO {:?}", name, ufo);
            }
            FlightEvent::Repursued(ufo) => {
                log::debug!("{} recomputed its course to UFO {:?}", name, ufo);
            }
            FlightEvent::TargetLost(ufo) => {
                log::info!("{} lost UFO {:?} and returns to {}", name, ufo, base_name);
            }
        }
    }

    /// Put collected items and aliens into the home base.
    fn unload_cargo(&mut self, id: AircraftId, home: BaseId) {
        let (items, aliens) = match self.aircraft_mut(id) {
            Some(a) => (
                std::mem::take(&mut a.item_cargo),
                std::mem::take(&mut a.alien_cargo),
            ),
            None => return,
        };
        let base = match self.bases.get_mut(home.0) {
            Some(b) => b,
            None => return,
        };
        for cargo in items {
            base.store_item(&cargo.item, cargo.amount, 1);
        }
        for cargo in aliens {
            base.store_aliens(&cargo.team_def, cargo.alive, cargo.dead);
        }
    }

    fn finish_transfer(&mut self, id: AircraftId, from: BaseId, dest: BaseId) {
        match self.move_to_new_home_base(id, dest) {
            Ok(()) => {
                let (name, dest_name) = match (self.aircraft(id), self.bases.get(dest.0)) {
                    (Some(a), Some(b)) => (a.name.clone(), b.name.clone()),
                    _ => return,
                };
                self.post(
                    MessageKind::AircraftTransferred,
                    "Transfer",
                    format!("Craft {} has been transferred to {}.", name, dest_name),
                );
            }
            Err(e) => {
                log::warn!("transfer of {:?} to base {} failed: {}", id, dest.0, e);
                let home_pos = self.bases.get(from.0).map(|b| b.pos);
                if let (Some(a), Some(pos)) = (self.aircraft_mut(id), home_pos) {
                    a.position = pos;
                    a.state = FlightState::Home;
                }
            }
        }
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::new(AircraftCatalog::new(), CampaignConfig::default())
    }
}
