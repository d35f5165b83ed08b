//! Dispatch - orders that send aircraft somewhere, and the notifications
//! that cancel them when a mission or UFO goes away.
//!
//! Orders validate everything first. A refused order returns an error and
//! leaves the aircraft exactly as it was.

use geoscape_logic::constants::SECONDS_PER_HOUR;
use geoscape_logic::fuel::has_enough_fuel;
use geoscape_logic::geometry::{angular_distance, GeoPos};
use geoscape_logic::intercept::{pursuit_destination, PursuitInput};
use geoscape_logic::route::RouteProgress;

use crate::components::*;
use crate::engine::Campaign;
use crate::error::{DispatchError, FleetError};
use crate::messages::{CampaignEvent, MessageKind};
use crate::systems::return_home;

/// How a mission order was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The aircraft took off toward the mission.
    Launched,
    /// The home base is under attack; the aircraft defends it in place.
    DefendingBase,
}

/// Fields of an aircraft that orders look at.
struct Snapshot {
    name: String,
    home: BaseId,
    pos: GeoPos,
    speed: i32,
    fuel: i32,
    in_base: bool,
    on_geoscape: bool,
}

impl Campaign {
    /// Send a transport with its team to a mission site.
    pub fn send_to_mission(
        &mut self,
        id: AircraftId,
        mission: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let target = self
            .mission(mission)
            .ok_or_else(|| DispatchError::UnknownMission(mission.to_string()))?
            .pos;
        let a = self.snapshot(id)?;
        if !a.in_base && !a.on_geoscape {
            return Err(DispatchError::NotAvailable);
        }
        let team_size = self.aircraft(id).map_or(0, |c| c.team_size());
        if team_size == 0 {
            return Err(DispatchError::NoCrew);
        }
        let base = self.base(a.home).ok_or(DispatchError::UnknownBase(a.home))?;
        let (home_pos, under_attack) = (base.pos, base.under_attack);

        if under_attack && a.in_base {
            if let Some(m) = self.missions.get_mut(mission) {
                m.active = true;
            }
            if let Some(craft) = self.aircraft_mut(id) {
                craft.reload_weapons();
            }
            log::info!("send_to_mission: {} defends its base", a.name);
            self.emit(CampaignEvent::BaseDefenseLaunched {
                base: a.home,
                mission: mission.to_string(),
            });
            return Ok(DispatchOutcome::DefendingBase);
        }

        if !has_enough_fuel(a.pos, target, home_pos, a.speed, a.fuel) {
            self.post(
                MessageKind::InsufficientFuel,
                "Notice",
                format!("Craft {} has not enough fuel to reach the mission.", a.name),
            );
            return Err(DispatchError::InsufficientFuel);
        }

        if let Some(craft) = self.aircraft_mut(id) {
            if a.in_base {
                craft.reload_weapons();
            }
            craft.state = FlightState::EnRouteToMission {
                route: RouteProgress::between(a.pos, target),
                mission: mission.to_string(),
            };
        }
        log::info!("send_to_mission: {} launched to {}", a.name, mission);
        Ok(DispatchOutcome::Launched)
    }

    /// Send an interceptor after a UFO. The course leads to where the UFO
    /// will be; when that is out of reach but the UFO itself is not, the
    /// course leads to where it is now.
    pub fn send_pursuing_ufo(&mut self, id: AircraftId, ufo: UfoId) -> Result<(), DispatchError> {
        let (ufo_pos, ufo_speed, ufo_dest) = match self.ufo(ufo) {
            Some(u) => (u.position, u.stats.speed, u.destination()),
            None => return Err(DispatchError::UnknownUfo),
        };
        let a = self.snapshot(id)?;
        if !a.in_base && !a.on_geoscape {
            return Err(DispatchError::NotAvailable);
        }
        let (has_pilot, size) = match self.aircraft(id) {
            Some(c) => (c.has_pilot(), c.size),
            None => return Err(DispatchError::UnknownAircraft(id)),
        };
        let base = self.base(a.home).ok_or(DispatchError::UnknownBase(a.home))?;
        if !base.has_operational_hangar(size) {
            return Err(DispatchError::NoOperationalHangar);
        }
        if !has_pilot {
            return Err(DispatchError::NoPilot);
        }
        let home_pos = base.pos;

        let mut dest = pursuit_destination(&PursuitInput {
            shooter_pos: a.pos,
            shooter_speed: a.speed,
            target_pos: ufo_pos,
            target_speed: ufo_speed,
            target_destination: ufo_dest,
        });
        if !has_enough_fuel(a.pos, dest, home_pos, a.speed, a.fuel) {
            if has_enough_fuel(a.pos, ufo_pos, home_pos, a.speed, a.fuel) {
                dest = ufo_pos;
            } else {
                self.post(
                    MessageKind::InsufficientFuel,
                    "Notice",
                    format!("Craft {} has not enough fuel to intercept UFO.", a.name),
                );
                return Err(DispatchError::InsufficientFuel);
            }
        }

        if let Some(craft) = self.aircraft_mut(id) {
            if a.in_base {
                craft.reload_weapons();
            }
            craft.state = FlightState::PursuingUfo {
                route: RouteProgress::between(a.pos, dest),
                target: ufo,
            };
        }
        log::info!("send_pursuing_ufo: {} intercepts UFO {:?}", a.name, ufo);
        Ok(())
    }

    /// Fly to a point on the map and wait there.
    pub fn send_to_position(&mut self, id: AircraftId, pos: GeoPos) -> Result<(), DispatchError> {
        let a = self.snapshot(id)?;
        if !a.in_base && !a.on_geoscape {
            return Err(DispatchError::NotAvailable);
        }
        let home_pos = self
            .base(a.home)
            .ok_or(DispatchError::UnknownBase(a.home))?
            .pos;
        if !has_enough_fuel(a.pos, pos, home_pos, a.speed, a.fuel) {
            self.post(
                MessageKind::InsufficientFuel,
                "Notice",
                format!("Craft {} has not enough fuel to reach this position.", a.name),
            );
            return Err(DispatchError::InsufficientFuel);
        }
        if let Some(craft) = self.aircraft_mut(id) {
            craft.state = FlightState::Transit {
                route: RouteProgress::between(a.pos, pos),
            };
        }
        Ok(())
    }

    /// Start relocating a parked aircraft to another base. It leaves the map
    /// and joins the new base once the flight time has passed.
    pub fn transfer_to_base(&mut self, id: AircraftId, dest: BaseId) -> Result<(), FleetError> {
        let (home, in_base, speed) = match self.aircraft(id) {
            Some(a) => (a.home_base, a.is_in_base(), a.stats.speed),
            None => return Err(FleetError::UnknownAircraft(id)),
        };
        if home == dest {
            return Err(FleetError::SameBase);
        }
        if !in_base {
            return Err(FleetError::NotInBase);
        }
        self.check_move_to_base(id, dest)?;

        let from = self.base(home).ok_or(FleetError::UnknownBase(home))?.pos;
        let to = self.base(dest).ok_or(FleetError::UnknownBase(dest))?.pos;
        let remaining = transfer_time(angular_distance(from, to), speed);
        if let Some(a) = self.aircraft_mut(id) {
            a.state = FlightState::Transferring {
                destination: dest,
                remaining,
            };
        }
        self.emit(CampaignEvent::RadarOverlayDirty);
        log::info!("transfer_to_base: {:?} to base {} in {}s", id, dest.0, remaining);
        Ok(())
    }

    /// Order an airborne aircraft home. Returns false when it is not on the
    /// map.
    pub fn return_to_base(&mut self, id: AircraftId) -> bool {
        let home = match self.aircraft(id).and_then(|a| self.base(a.home_base).map(|b| b.pos)) {
            Some(pos) => pos,
            None => return false,
        };
        self.aircraft_mut(id).is_some_and(|a| return_home(a, home))
    }

    // ============================================================================
    // NOTIFICATIONS
    // ============================================================================

    /// A mission was removed: aircraft heading to or waiting over it go
    /// home, and team reservations for it are dropped.
    pub fn notify_mission_removed(&mut self, mission: &str) {
        for id in self.aircraft_order.clone() {
            let (flies_there, reserved) = match self.aircraft(id) {
                Some(a) => (
                    a.state.mission() == Some(mission),
                    a.team_reservation.as_deref() == Some(mission),
                ),
                None => continue,
            };
            if reserved {
                if let Some(a) = self.aircraft_mut(id) {
                    a.team_reservation = None;
                }
            }
            if flies_there {
                log::info!("mission {} removed; {:?} returns to base", mission, id);
                self.return_to_base(id);
            }
        }
    }

    /// A UFO left the game. Pursuers go home.
    pub fn notify_ufo_removed(&mut self, ufo: UfoId, destroyed: bool) {
        let pursuers = self.pursuers_of(ufo);
        for id in pursuers {
            log::info!(
                "UFO {:?} {}; {:?} returns to base",
                ufo,
                if destroyed { "destroyed" } else { "removed" },
                id
            );
            self.return_to_base(id);
        }
    }

    /// A UFO is no longer visible. Pursuers go home.
    pub fn notify_ufo_disappeared(&mut self, ufo: UfoId) {
        for id in self.pursuers_of(ufo) {
            log::debug!("UFO {:?} lost from radar; {:?} returns to base", ufo, id);
            self.return_to_base(id);
        }
    }

    // ── Helpers ──

    fn pursuers_of(&self, ufo: UfoId) -> Vec<AircraftId> {
        self.aircraft_order
            .iter()
            .copied()
            .filter(|id| self.aircraft(*id).is_some_and(|a| a.state.target() == Some(ufo)))
            .collect()
    }

    fn snapshot(&self, id: AircraftId) -> Result<Snapshot, DispatchError> {
        let a = self.aircraft(id).ok_or(DispatchError::UnknownAircraft(id))?;
        Ok(Snapshot {
            name: a.name.clone(),
            home: a.home_base,
            pos: a.position,
            speed: a.stats.speed,
            fuel: a.fuel,
            in_base: a.is_in_base(),
            on_geoscape: a.is_on_geoscape(),
        })
    }
}

/// Seconds needed to fly `distance` degrees at `speed`, rounded up.
pub fn transfer_time(distance: f64, speed: i32) -> i64 {
    if speed <= 0 {
        return 0;
    }
    (distance * SECONDS_PER_HOUR as f64 / speed as f64).ceil() as i64
}
