//! Save/Load for the air layer
//!
//! Uses bincode for compact binary serialization. Entities are flattened
//! into plain records: handles become list indices, crew become UCNs, and
//! the flight state becomes a symbolic status name plus optional payload
//! fields. Bases, employees and missions are saved by their own owners and
//! must already be present when air state is loaded.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use geoscape_logic::catalog::{AircraftKind, AircraftStats, ItemWeight, SizeClass, SlotPosition};
use geoscape_logic::geometry::{GeoPos, Vec3};
use geoscape_logic::route::RouteProgress;
use geoscape_logic::status::AircraftStatus;

use crate::components::*;
use crate::engine::Campaign;
use crate::error::SaveError;

/// Version number for the air save format (increment when format changes)
pub const AIR_SAVE_VERSION: u32 = 1;

/// Serializable snapshot of all aircraft and UFOs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirSaveData {
    pub version: u32,
    pub date: CampaignDate,
    /// Aircraft in global order; the position in this list is the global index.
    pub aircraft: Vec<AircraftSave>,
    pub ufos: Vec<UfoSave>,
}

/// One equipment slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSave {
    pub position: SlotPosition,
    pub size: ItemWeight,
    pub item: Option<String>,
    pub ammo: Option<String>,
    pub ammo_left: i32,
    pub ammo_capacity: i32,
    pub ammo_range: f64,
    pub delay_next_shot: i32,
    pub installation_time: i32,
    pub next_item: Option<String>,
}

/// One PHALANX aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSave {
    pub global_index: u32,
    pub template_id: String,
    pub name: String,
    pub kind: AircraftKind,
    pub size: SizeClass,
    pub stats: AircraftStats,
    /// Symbolic status name (see `AircraftStatus::save_name`).
    pub status: String,
    pub fuel: i32,
    pub damage: i32,
    /// Longitude, latitude, altitude.
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub route: Option<RouteProgress>,
    pub mission: Option<String>,
    /// Pursued UFO as an index into `AirSaveData::ufos`.
    pub target: Option<u32>,
    pub transfer_destination: Option<u32>,
    pub transfer_remaining: i64,
    pub weapons: Vec<SlotSave>,
    pub electronics: Vec<SlotSave>,
    pub shield: SlotSave,
    pub team: Vec<Option<Ucn>>,
    pub pilot: Option<Ucn>,
    pub team_reservation: Option<String>,
    /// (item id, amount)
    pub item_cargo: Vec<(String, i32)>,
    /// (team definition, alive, dead)
    pub alien_cargo: Vec<(String, i32, i32)>,
    pub radar_range: i32,
    pub radar_tracking_range: i32,
    pub homebase: u32,
    pub hangar: Option<SizeClass>,
    pub notified_cannot_refuel: bool,
    pub notified_low_fuel: bool,
}

/// One UFO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UfoSave {
    pub template_id: String,
    pub name: String,
    pub stats: AircraftStats,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub route: Option<RouteProgress>,
    pub damage: i32,
    pub mission: Option<String>,
    pub detected: bool,
    pub landed: bool,
    pub last_spotted: Option<CampaignDate>,
}

impl From<&AircraftSlot> for SlotSave {
    fn from(s: &AircraftSlot) -> Self {
        Self {
            position: s.position,
            size: s.size,
            item: s.item.clone(),
            ammo: s.ammo.clone(),
            ammo_left: s.ammo_left,
            ammo_capacity: s.ammo_capacity,
            ammo_range: s.ammo_range,
            delay_next_shot: s.delay_next_shot,
            installation_time: s.installation_time,
            next_item: s.next_item.clone(),
        }
    }
}

impl From<SlotSave> for AircraftSlot {
    fn from(s: SlotSave) -> Self {
        Self {
            position: s.position,
            size: s.size,
            item: s.item,
            ammo: s.ammo,
            ammo_left: s.ammo_left,
            ammo_capacity: s.ammo_capacity,
            ammo_range: s.ammo_range,
            delay_next_shot: s.delay_next_shot,
            installation_time: s.installation_time,
            next_item: s.next_item,
        }
    }
}

fn pos_to_array(p: GeoPos) -> [f64; 3] {
    [p.lon, p.lat, 0.0]
}

fn array_to_pos(a: [f64; 3]) -> GeoPos {
    GeoPos::new(a[0], a[1])
}

impl Campaign {
    /// Save every aircraft and UFO to a writer
    pub fn save_air<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        let data = self.air_save_data()?;
        bincode::serialize_into(writer, &data)?;
        Ok(())
    }

    /// Replace every aircraft and UFO with the contents of a save. On error
    /// the campaign is left untouched.
    pub fn load_air<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let data: AirSaveData = bincode::deserialize_from(reader)?;
        if data.version != AIR_SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: AIR_SAVE_VERSION,
                found: data.version,
            });
        }
        self.restore_air(data)
    }

    /// Flatten the air layer into save records.
    pub fn air_save_data(&self) -> Result<AirSaveData, SaveError> {
        let ufos: Vec<UfoSave> = self
            .ufo_order
            .iter()
            .filter_map(|id| self.ufo(*id))
            .map(|u| UfoSave {
                template_id: u.template_id.clone(),
                name: u.name.clone(),
                stats: u.stats,
                position: pos_to_array(u.position),
                direction: u.direction.to_array(),
                route: u.route.clone(),
                damage: u.damage,
                mission: u.mission.clone(),
                detected: u.detected,
                landed: u.landed,
                last_spotted: u.last_spotted,
            })
            .collect();

        let mut aircraft = Vec::with_capacity(self.aircraft_order.len());
        for (index, id) in self.aircraft_order.iter().enumerate() {
            let a = self
                .aircraft(*id)
                .ok_or_else(|| SaveError::Inconsistent(format!("aircraft {} has no entity", index)))?;
            let target = match a.state.target() {
                Some(t) => self.ufo_order.iter().position(|u| *u == t).map(|i| i as u32),
                None => None,
            };
            let (transfer_destination, transfer_remaining) = match a.state {
                FlightState::Transferring { destination, remaining } => {
                    (Some(destination.0 as u32), remaining)
                }
                _ => (None, 0),
            };
            aircraft.push(AircraftSave {
                global_index: index as u32,
                template_id: a.template_id.clone(),
                name: a.name.clone(),
                kind: a.kind,
                size: a.size,
                stats: a.stats,
                status: a.status().save_name().to_string(),
                fuel: a.fuel,
                damage: a.damage,
                position: pos_to_array(a.position),
                direction: a.direction.to_array(),
                route: a.state.route().cloned(),
                mission: a.state.mission().map(str::to_string),
                target,
                transfer_destination,
                transfer_remaining,
                weapons: a.weapons.iter().map(SlotSave::from).collect(),
                electronics: a.electronics.iter().map(SlotSave::from).collect(),
                shield: SlotSave::from(&a.shield),
                team: a.team.clone(),
                pilot: a.pilot,
                team_reservation: a.team_reservation.clone(),
                item_cargo: a.item_cargo.iter().map(|c| (c.item.clone(), c.amount)).collect(),
                alien_cargo: a
                    .alien_cargo
                    .iter()
                    .map(|c| (c.team_def.clone(), c.alive, c.dead))
                    .collect(),
                radar_range: a.radar.range,
                radar_tracking_range: a.radar.tracking_range,
                homebase: a.home_base.0 as u32,
                hangar: a.hangar,
                notified_cannot_refuel: a.notify_sent.cannot_refuel,
                notified_low_fuel: a.notify_sent.low_fuel,
            });
        }

        Ok(AirSaveData {
            version: AIR_SAVE_VERSION,
            date: self.date,
            aircraft,
            ufos,
        })
    }

    fn restore_air(&mut self, mut data: AirSaveData) -> Result<(), SaveError> {
        data.aircraft.sort_by_key(|a| a.global_index);

        // Validate and build everything before touching the world.
        let ufos: Vec<Ufo> = data.ufos.into_iter().map(ufo_from_save).collect();
        let mut built = Vec::with_capacity(data.aircraft.len());
        for save in data.aircraft {
            built.push(self.aircraft_from_save(save, ufos.len())?);
        }

        for id in std::mem::take(&mut self.aircraft_order) {
            let _ = self.world.despawn(id.0);
        }
        for id in std::mem::take(&mut self.ufo_order) {
            let _ = self.world.despawn(id.0);
        }
        for base in &mut self.bases {
            base.aircraft.clear();
            base.current_aircraft = None;
        }

        for ufo in ufos {
            let id = UfoId(self.world.spawn((ufo,)));
            self.ufo_order.push(id);
        }
        for (mut aircraft, target) in built {
            if let (Some(t), FlightState::PursuingUfo { target: slot, .. })
            | (Some(t), FlightState::Intercepting { target: slot }) = (target, &mut aircraft.state)
            {
                *slot = self.ufo_order[t];
            }
            let home = aircraft.home_base;
            let id = AircraftId(self.world.spawn((aircraft,)));
            self.aircraft_order.push(id);
            let base = &mut self.bases[home.0];
            base.aircraft.push(id);
            if base.current_aircraft.is_none() {
                base.current_aircraft = Some(id);
            }
        }
        for b in 0..self.bases.len() {
            self.recompute_hangars(BaseId(b));
        }

        self.date = data.date;
        log::info!(
            "Loaded {} aircraft and {} UFOs",
            self.aircraft_order.len(),
            self.ufo_order.len()
        );
        Ok(())
    }

    /// Rebuild one aircraft. The pursued UFO comes back as an index to be
    /// resolved once the UFOs are spawned.
    fn aircraft_from_save(
        &self,
        save: AircraftSave,
        ufo_count: usize,
    ) -> Result<(Aircraft, Option<usize>), SaveError> {
        let home = BaseId(save.homebase as usize);
        if self.base(home).is_none() {
            return Err(SaveError::Inconsistent(format!(
                "aircraft '{}' refers to unknown base {}",
                save.name, save.homebase
            )));
        }
        let status = AircraftStatus::from_save_name(&save.status).ok_or_else(|| {
            SaveError::Inconsistent(format!("unknown aircraft status '{}'", save.status))
        })?;
        let target = match save.target {
            Some(t) if (t as usize) < ufo_count => Some(t as usize),
            Some(t) => {
                return Err(SaveError::Inconsistent(format!("unknown UFO index {}", t)));
            }
            None => None,
        };

        let route = save.route;
        let mission = save.mission;
        let missing = |what: &str| {
            SaveError::Inconsistent(format!(
                "aircraft '{}' with status '{}' has no {}",
                save.name, save.status, what
            ))
        };
        // Placeholder target; replaced with the spawned UFO's handle.
        let placeholder = UfoId(hecs::Entity::DANGLING);
        let state = match status {
            AircraftStatus::None | AircraftStatus::Home => FlightState::Home,
            AircraftStatus::Refueling => FlightState::Refueling,
            AircraftStatus::Idle => FlightState::Idle,
            AircraftStatus::Transit => FlightState::Transit {
                route: route.ok_or_else(|| missing("route"))?,
            },
            AircraftStatus::Returning => FlightState::Returning {
                route: route.ok_or_else(|| missing("route"))?,
            },
            AircraftStatus::EnRouteToMission => FlightState::EnRouteToMission {
                route: route.ok_or_else(|| missing("route"))?,
                mission: mission.ok_or_else(|| missing("mission"))?,
            },
            AircraftStatus::ReadyToDrop => FlightState::ReadyToDrop {
                mission: mission.ok_or_else(|| missing("mission"))?,
            },
            AircraftStatus::PursuingUfo => {
                target.ok_or_else(|| missing("target"))?;
                FlightState::PursuingUfo {
                    route: route.ok_or_else(|| missing("route"))?,
                    target: placeholder,
                }
            }
            AircraftStatus::Intercepting => {
                target.ok_or_else(|| missing("target"))?;
                FlightState::Intercepting { target: placeholder }
            }
            AircraftStatus::Transferring => {
                let dest = save
                    .transfer_destination
                    .filter(|d| (*d as usize) < self.bases.len())
                    .ok_or_else(|| missing("transfer destination"))?;
                FlightState::Transferring {
                    destination: BaseId(dest as usize),
                    remaining: save.transfer_remaining,
                }
            }
        };

        let team = save
            .team
            .into_iter()
            .map(|seat| {
                seat.filter(|ucn| {
                    let known = self.employees.get(*ucn).is_some();
                    if !known {
                        log::warn!("load_air: dropping unknown crew member {} from '{}'", ucn, save.name);
                    }
                    known
                })
            })
            .collect();
        let pilot = save.pilot.filter(|ucn| self.employees.get(*ucn).is_some());

        let aircraft = Aircraft {
            template_id: save.template_id,
            name: save.name,
            kind: save.kind,
            size: save.size,
            stats: save.stats,
            position: array_to_pos(save.position),
            direction: Vec3::from_array(save.direction),
            fuel: save.fuel,
            damage: save.damage,
            state,
            home_base: home,
            hangar: save.hangar,
            team,
            pilot,
            team_reservation: save.team_reservation,
            weapons: save.weapons.into_iter().map(AircraftSlot::from).collect(),
            electronics: save.electronics.into_iter().map(AircraftSlot::from).collect(),
            shield: save.shield.into(),
            item_cargo: save
                .item_cargo
                .into_iter()
                .map(|(item, amount)| ItemCargo { item, amount })
                .collect(),
            alien_cargo: save
                .alien_cargo
                .into_iter()
                .map(|(team_def, alive, dead)| AlienCargo { team_def, alive, dead })
                .collect(),
            radar: Radar {
                range: save.radar_range,
                tracking_range: save.radar_tracking_range,
            },
            notify_sent: NotifyLatches {
                cannot_refuel: save.notified_cannot_refuel,
                low_fuel: save.notified_low_fuel,
            },
        };
        Ok((aircraft, target))
    }
}

fn ufo_from_save(save: UfoSave) -> Ufo {
    Ufo {
        template_id: save.template_id,
        name: save.name,
        stats: save.stats,
        position: array_to_pos(save.position),
        direction: Vec3::from_array(save.direction),
        route: save.route,
        damage: save.damage,
        mission: save.mission,
        detected: save.detected,
        landed: save.landed,
        last_spotted: save.last_spotted,
    }
}
