//! Fleet management - creating, removing and relocating aircraft, plus the
//! index lookups the base screens use.

use geoscape_logic::catalog::AircraftKind;
use geoscape_logic::fuel::has_enough_fuel_one_way;
use geoscape_logic::hangar::{assign_to_hangar, can_assign, recompute_all};

use crate::components::*;
use crate::config::HangarPolicy;
use crate::engine::Campaign;
use crate::error::FleetError;
use crate::messages::{CampaignEvent, MessageKind};

impl Campaign {
    // ============================================================================
    // LIFECYCLE
    // ============================================================================

    /// Build a new aircraft from a template and park it in `base`.
    pub fn add_aircraft(&mut self, base: BaseId, template_id: &str) -> Result<AircraftId, FleetError> {
        let template = self.catalog.get(template_id)?.clone();
        let b = self.bases.get(base.0).ok_or(FleetError::UnknownBase(base))?;
        if b.aircraft.len() >= self.config.max_aircraft_per_base {
            return Err(FleetError::BaseFull);
        }

        let mut hangars = b.hangars;
        let hangar = match assign_to_hangar(&mut hangars, &b.hangar_buildings, template.size) {
            Ok(class) => Some(class),
            Err(e) => match self.config.hangar_policy {
                HangarPolicy::Refuse => return Err(FleetError::HangarAssignmentFailed(e)),
                HangarPolicy::AllowUnhoused => {
                    log::warn!(
                        "add_aircraft: no free hangar for {} in {} ({})",
                        template.id,
                        b.name,
                        e
                    );
                    None
                }
            },
        };

        let radar = Radar {
            range: self.config.aircraft_radar_range,
            tracking_range: self.config.aircraft_tracking_range,
        };
        let mut aircraft = Aircraft::from_template(&template, base, b.pos, radar);
        aircraft.hangar = hangar;
        let base_name = b.name.clone();

        let id = AircraftId(self.world.spawn((aircraft,)));
        let b = &mut self.bases[base.0];
        b.hangars = hangars;
        b.aircraft.push(id);
        if b.current_aircraft.is_none() {
            b.current_aircraft = Some(id);
        }
        self.aircraft_order.push(id);

        log::info!("add_aircraft: {} added to {}", template.id, base_name);
        self.post(
            MessageKind::NewAircraft,
            "Notice",
            format!("A new {} is ready in {}", template.name, base_name),
        );
        Ok(id)
    }

    /// Remove an aircraft. Its crew stays employed at the base; its
    /// equipment is discarded.
    pub fn delete_aircraft(&mut self, id: AircraftId) -> Result<(), FleetError> {
        let (home, airborne) = match self.aircraft(id) {
            Some(a) => (a.home_base, a.is_on_geoscape()),
            None => return Err(FleetError::UnknownAircraft(id)),
        };
        self.emit(CampaignEvent::AircraftRemoved { aircraft: id });

        self.remove_all_crew(id).map_err(|_| FleetError::UnknownAircraft(id))?;
        if let Some(a) = self.aircraft_mut(id) {
            a.release_equipment();
        }

        self.aircraft_order.retain(|a| *a != id);
        if let Some(b) = self.bases.get_mut(home.0) {
            detach_from_base(b, id);
        }
        // Already checked above.
        let _ = self.world.despawn(id.0);
        self.recompute_hangars(home);

        if airborne {
            self.emit(CampaignEvent::RadarOverlayDirty);
        }
        log::debug!("delete_aircraft: {:?} removed from base {}", id, home.0);
        Ok(())
    }

    /// Remove an aircraft lost in combat, together with everyone aboard.
    pub fn destroy_aircraft(&mut self, id: AircraftId) -> Result<(), FleetError> {
        let crew: Vec<Ucn> = match self.aircraft(id) {
            Some(a) => a.team_members().chain(a.pilot).collect(),
            None => return Err(FleetError::UnknownAircraft(id)),
        };
        for ucn in crew.into_iter().rev() {
            self.fire_employee(ucn);
        }
        self.delete_aircraft(id)
    }

    /// Re-home an aircraft. Its crew and their equipment move along; hangar
    /// counters of both bases are rebuilt.
    pub fn move_to_new_home_base(&mut self, id: AircraftId, dest: BaseId) -> Result<(), FleetError> {
        let (src, status) = match self.aircraft(id) {
            Some(a) => (a.home_base, a.status()),
            None => return Err(FleetError::UnknownAircraft(id)),
        };
        if src == dest {
            return Err(FleetError::SameBase);
        }
        let dest_pos = self.base(dest).ok_or(FleetError::UnknownBase(dest))?.pos;

        // A finished transfer lands the aircraft at the destination first.
        if status == geoscape_logic::status::AircraftStatus::Transferring {
            if let Some(a) = self.aircraft_mut(id) {
                a.position = dest_pos;
                a.state = FlightState::Home;
            }
        }
        self.check_move_to_base(id, dest)?;

        let crew: Vec<Ucn> = match self.aircraft(id) {
            Some(a) => a.team_members().chain(a.pilot).collect(),
            None => return Err(FleetError::UnknownAircraft(id)),
        };
        for ucn in crew {
            self.move_employee(ucn, src, dest);
        }

        detach_from_base(&mut self.bases[src.0], id);
        let d = &mut self.bases[dest.0];
        d.aircraft.push(id);
        if d.current_aircraft.is_none() {
            d.current_aircraft = Some(id);
        }
        if let Some(a) = self.aircraft_mut(id) {
            a.home_base = dest;
        }
        self.recompute_hangars(src);
        self.recompute_hangars(dest);

        self.emit(CampaignEvent::AircraftRehomed {
            aircraft: id,
            from: src,
            to: dest,
        });
        log::info!("move_to_new_home_base: {:?} now based at {}", id, dest.0);
        Ok(())
    }

    /// Checks `move_to_new_home_base` runs, without changing anything.
    pub fn check_move_to_base(&self, id: AircraftId, dest: BaseId) -> Result<(), FleetError> {
        let a = self.aircraft(id).ok_or(FleetError::UnknownAircraft(id))?;
        let d = self.base(dest).ok_or(FleetError::UnknownBase(dest))?;

        can_assign(&d.hangars, &d.hangar_buildings, a.size)?;
        let crew = (a.max_team_size() + usize::from(a.has_pilot())) as u32;
        if d.quarters.cur + crew > d.quarters.max {
            return Err(FleetError::InsufficientCrewQuarters);
        }
        if a.max_team_size() > 0 && d.storage_capacity.cur + self.storage_room(id) > d.storage_capacity.max {
            return Err(FleetError::InsufficientStorage);
        }
        if !has_enough_fuel_one_way(a.position, d.pos, a.stats.speed, a.fuel) {
            return Err(FleetError::OutOfRange);
        }
        Ok(())
    }

    /// Rebuild a base's hangar counters from its aircraft list.
    pub fn recompute_hangars(&mut self, base: BaseId) {
        let b = match self.bases.get_mut(base.0) {
            Some(b) => b,
            None => return,
        };
        let sizes: Vec<(AircraftId, _)> = b
            .aircraft
            .iter()
            .filter_map(|id| self.world.get::<&Aircraft>(id.0).ok().map(|a| (*id, a.size)))
            .collect();
        let placed = recompute_all(
            &mut b.hangars,
            &b.hangar_buildings,
            sizes.iter().map(|(_, size)| *size),
        );
        for ((id, _), hangar) in sizes.iter().zip(placed) {
            if let Ok(a) = self.world.query_one_mut::<&mut Aircraft>(id.0) {
                if hangar.is_none() {
                    log::warn!("recompute_hangars: {} has no hangar slot in base {}", a.name, base.0);
                }
                a.hangar = hangar;
            }
        }
    }

    // ============================================================================
    // LOOKUPS
    // ============================================================================

    /// Position of an aircraft in the global order.
    pub fn global_index(&self, id: AircraftId) -> Option<usize> {
        self.aircraft_order.iter().position(|a| *a == id)
    }

    pub fn aircraft_by_global_index(&self, index: usize) -> Option<AircraftId> {
        self.aircraft_order.get(index).copied()
    }

    /// Aircraft at `index` of a base's list.
    pub fn aircraft_in_base_by_index(&self, base: BaseId, index: usize) -> Option<AircraftId> {
        self.base(base)?.aircraft.get(index).copied()
    }

    /// Like `aircraft_in_base_by_index`, but falls back to the base's first
    /// aircraft when the index is out of range.
    pub fn aircraft_in_base_by_index_safe(&self, base: BaseId, index: usize) -> Option<AircraftId> {
        let b = self.base(base)?;
        b.aircraft.get(index).or_else(|| b.aircraft.first()).copied()
    }

    /// Aircraft of `kind` owned by a base.
    pub fn count_type_in_base(&self, base: BaseId, kind: AircraftKind) -> usize {
        self.base(base).map_or(0, |b| {
            b.aircraft
                .iter()
                .filter(|id| self.aircraft(**id).is_some_and(|a| a.kind == kind))
                .count()
        })
    }

    /// Add collected items to an aircraft's cargo hold.
    pub fn collect_item(&mut self, id: AircraftId, item: &str, amount: i32) -> bool {
        self.aircraft_mut(id)
            .is_some_and(|a| a.collect_item(item, amount))
    }

    /// Add aliens picked up at a mission site to an aircraft's hold.
    pub fn collect_aliens(&mut self, id: AircraftId, team_def: &str, alive: i32, dead: i32) -> bool {
        self.aircraft_mut(id)
            .is_some_and(|a| a.collect_aliens(team_def, alive, dead))
    }

    /// Whether the aircraft could be sent after a UFO right now: it has a
    /// pilot and its base has a matching hangar.
    pub fn can_intercept(&self, id: AircraftId) -> bool {
        let a = match self.aircraft(id) {
            Some(a) => a,
            None => return false,
        };
        a.has_pilot()
            && self
                .base(a.home_base)
                .is_some_and(|b| b.has_operational_hangar(a.size))
    }

    // ── Helpers ──

    fn move_employee(&mut self, ucn: Ucn, src: BaseId, dest: BaseId) {
        let inventory = match self.employees.get(ucn) {
            Some(e) => e.inventory.clone(),
            None => return,
        };
        if let Some(s) = self.bases.get_mut(src.0) {
            s.quarters.cur = s.quarters.cur.saturating_sub(1);
            for carried in &inventory {
                s.store_item(&carried.item, -1, carried.size);
            }
        }
        if let Some(d) = self.bases.get_mut(dest.0) {
            d.quarters.cur += 1;
            for carried in &inventory {
                d.store_item(&carried.item, 1, carried.size);
            }
        }
        self.employees.transfer_to_base(ucn, dest);
    }
}

/// Drop an aircraft from a base list, fixing the current selection.
fn detach_from_base(base: &mut Base, id: AircraftId) {
    base.aircraft.retain(|a| *a != id);
    if base.current_aircraft == Some(id) {
        base.current_aircraft = base.aircraft.first().copied();
    }
}
