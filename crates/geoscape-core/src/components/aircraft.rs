//! PHALANX aircraft components: flight state, equipment slots, cargo, crew.

use geoscape_logic::catalog::{
    AircraftKind, AircraftStats, AircraftTemplate, ItemWeight, SizeClass, SlotLayout, SlotPosition,
};
use geoscape_logic::constants::MAX_CARGO;
use geoscape_logic::fuel::remaining_range_degrees;
use geoscape_logic::geometry::{GeoPos, Vec3};
use geoscape_logic::hangar::HangarClass;
use geoscape_logic::route::RouteProgress;
use geoscape_logic::status::AircraftStatus;

use super::common::{BaseId, Ucn, UfoId};

// ============================================================================
// FLIGHT STATE
// ============================================================================

/// What the aircraft is doing, with the data that only makes sense in that
/// state. Only travelling states carry a route.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightState {
    Home,
    Refueling,
    Idle,
    Transit { route: RouteProgress },
    EnRouteToMission { route: RouteProgress, mission: String },
    PursuingUfo { route: RouteProgress, target: UfoId },
    ReadyToDrop { mission: String },
    Intercepting { target: UfoId },
    /// Off the map until `remaining` seconds have passed.
    Transferring { destination: BaseId, remaining: i64 },
    Returning { route: RouteProgress },
}

impl FlightState {
    pub fn status(&self) -> AircraftStatus {
        match self {
            FlightState::Home => AircraftStatus::Home,
            FlightState::Refueling => AircraftStatus::Refueling,
            FlightState::Idle => AircraftStatus::Idle,
            FlightState::Transit { .. } => AircraftStatus::Transit,
            FlightState::EnRouteToMission { .. } => AircraftStatus::EnRouteToMission,
            FlightState::PursuingUfo { .. } => AircraftStatus::PursuingUfo,
            FlightState::ReadyToDrop { .. } => AircraftStatus::ReadyToDrop,
            FlightState::Intercepting { .. } => AircraftStatus::Intercepting,
            FlightState::Transferring { .. } => AircraftStatus::Transferring,
            FlightState::Returning { .. } => AircraftStatus::Returning,
        }
    }

    pub fn route(&self) -> Option<&RouteProgress> {
        match self {
            FlightState::Transit { route }
            | FlightState::EnRouteToMission { route, .. }
            | FlightState::PursuingUfo { route, .. }
            | FlightState::Returning { route } => Some(route),
            _ => None,
        }
    }

    pub fn route_mut(&mut self) -> Option<&mut RouteProgress> {
        match self {
            FlightState::Transit { route }
            | FlightState::EnRouteToMission { route, .. }
            | FlightState::PursuingUfo { route, .. }
            | FlightState::Returning { route } => Some(route),
            _ => None,
        }
    }

    /// UFO being chased or engaged.
    pub fn target(&self) -> Option<UfoId> {
        match self {
            FlightState::PursuingUfo { target, .. } | FlightState::Intercepting { target } => {
                Some(*target)
            }
            _ => None,
        }
    }

    /// Mission flown to or waited over.
    pub fn mission(&self) -> Option<&str> {
        match self {
            FlightState::EnRouteToMission { mission, .. } | FlightState::ReadyToDrop { mission } => {
                Some(mission)
            }
            _ => None,
        }
    }
}

// ============================================================================
// EQUIPMENT
// ============================================================================

/// A weapon, electronics or shield slot. Slots hold item ids only; the
/// aircraft owning the slot is whoever holds the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftSlot {
    pub position: SlotPosition,
    pub size: ItemWeight,
    pub item: Option<String>,
    pub ammo: Option<String>,
    pub ammo_left: i32,
    /// Rounds per full magazine of the loaded ammo.
    pub ammo_capacity: i32,
    /// Weapon range of the loaded ammo (degrees).
    pub ammo_range: f64,
    /// Seconds until the weapon can fire again.
    pub delay_next_shot: i32,
    /// Hours until a freshly mounted item is operational.
    pub installation_time: i32,
    /// Item queued to replace the current one.
    pub next_item: Option<String>,
}

impl AircraftSlot {
    pub fn empty(position: SlotPosition, size: ItemWeight) -> Self {
        Self {
            position,
            size,
            item: None,
            ammo: None,
            ammo_left: 0,
            ammo_capacity: 0,
            ammo_range: 0.0,
            delay_next_shot: 0,
            installation_time: 0,
            next_item: None,
        }
    }

    pub fn from_layout(layout: &SlotLayout) -> Self {
        let mut slot = Self::empty(layout.position, layout.size);
        slot.item = layout.item.clone();
        slot
    }

    pub fn shield() -> Self {
        Self::empty(SlotPosition::RearCenter, ItemWeight::Heavy)
    }

    /// Mount an item; it becomes usable after `installation_time` hours.
    pub fn install(&mut self, item: impl Into<String>, installation_time: i32) {
        self.item = Some(item.into());
        self.installation_time = installation_time.max(0);
        self.ammo = None;
        self.ammo_left = 0;
        self.ammo_capacity = 0;
        self.ammo_range = 0.0;
    }

    /// Load ammunition and fill the magazine.
    pub fn load_ammo(&mut self, ammo: impl Into<String>, capacity: i32, range: f64) {
        self.ammo = Some(ammo.into());
        self.ammo_capacity = capacity.max(0);
        self.ammo_left = self.ammo_capacity;
        self.ammo_range = range;
    }

    /// Refill the magazine of the loaded ammo, if any.
    pub fn reload(&mut self) {
        if self.ammo.is_some() {
            self.ammo_left = self.ammo_capacity;
        }
    }

    /// Empty the slot. Items are not returned to any storage.
    pub fn release(&mut self) {
        *self = Self::empty(self.position, self.size);
    }

    pub fn is_operational(&self) -> bool {
        self.item.is_some() && self.installation_time <= 0
    }
}

/// Sorted, de-duplicated ranges of every armed weapon.
pub fn weapon_ranges(slots: &[AircraftSlot]) -> Vec<f64> {
    let mut ranges: Vec<f64> = slots
        .iter()
        .filter(|s| s.is_operational() && s.ammo.is_some())
        .map(|s| s.ammo_range)
        .collect();
    ranges.sort_by(|a, b| a.total_cmp(b));
    ranges.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
    ranges
}

/// Radar carried by an aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Radar {
    pub range: i32,
    pub tracking_range: i32,
}

// ============================================================================
// CARGO
// ============================================================================

/// Items collected after a mission.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCargo {
    pub item: String,
    pub amount: i32,
}

/// Aliens collected after a mission.
#[derive(Debug, Clone, PartialEq)]
pub struct AlienCargo {
    pub team_def: String,
    pub alive: i32,
    pub dead: i32,
}

// ============================================================================
// NOTIFICATION LATCHES
// ============================================================================

/// One-shot player notices that must not repeat every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    CannotRefuel,
    LowFuel,
}

/// Latches for the one-shot notices of one aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyLatches {
    pub cannot_refuel: bool,
    pub low_fuel: bool,
}

impl NotifyLatches {
    /// Set the latch; returns true if it was not already set.
    pub fn fire(&mut self, kind: NoticeKind) -> bool {
        let latch = self.latch_mut(kind);
        let first = !*latch;
        *latch = true;
        first
    }

    pub fn clear(&mut self, kind: NoticeKind) {
        *self.latch_mut(kind) = false;
    }

    pub fn is_set(&self, kind: NoticeKind) -> bool {
        match kind {
            NoticeKind::CannotRefuel => self.cannot_refuel,
            NoticeKind::LowFuel => self.low_fuel,
        }
    }

    fn latch_mut(&mut self, kind: NoticeKind) -> &mut bool {
        match kind {
            NoticeKind::CannotRefuel => &mut self.cannot_refuel,
            NoticeKind::LowFuel => &mut self.low_fuel,
        }
    }
}

// ============================================================================
// AIRCRAFT
// ============================================================================

/// A PHALANX aircraft owned by a base.
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    /// Id of the template this aircraft was built from.
    pub template_id: String,
    pub name: String,
    pub kind: AircraftKind,
    pub size: SizeClass,
    pub stats: AircraftStats,
    pub position: GeoPos,
    /// Unit heading vector, updated as the aircraft moves.
    pub direction: Vec3,
    /// Seconds of flight left.
    pub fuel: i32,
    /// Current hit points.
    pub damage: i32,
    pub state: FlightState,
    pub home_base: BaseId,
    /// Hangar slot held at the home base, if housed.
    pub hangar: Option<HangarClass>,
    /// Team seats; length is the template's team size.
    pub team: Vec<Option<Ucn>>,
    pub pilot: Option<Ucn>,
    /// Mission the current team is reserved for.
    pub team_reservation: Option<String>,
    pub weapons: Vec<AircraftSlot>,
    pub electronics: Vec<AircraftSlot>,
    pub shield: AircraftSlot,
    pub item_cargo: Vec<ItemCargo>,
    pub alien_cargo: Vec<AlienCargo>,
    pub radar: Radar,
    pub notify_sent: NotifyLatches,
}

impl Aircraft {
    /// Fresh aircraft at `home_pos`: full tank, undamaged, empty crew.
    pub fn from_template(
        template: &AircraftTemplate,
        home_base: BaseId,
        home_pos: GeoPos,
        radar: Radar,
    ) -> Self {
        Self {
            template_id: template.id.clone(),
            name: template.default_name.clone(),
            kind: template.kind,
            size: template.size,
            stats: template.stats,
            position: home_pos,
            direction: Vec3::new(1.0, 0.0, 0.0),
            fuel: template.stats.fuel_size,
            damage: template.stats.damage,
            state: FlightState::Home,
            home_base,
            hangar: None,
            team: vec![None; template.max_team_size],
            pilot: None,
            team_reservation: None,
            weapons: template.weapon_slots.iter().map(AircraftSlot::from_layout).collect(),
            electronics: template
                .electronics_slots
                .iter()
                .map(AircraftSlot::from_layout)
                .collect(),
            shield: AircraftSlot::shield(),
            item_cargo: Vec::new(),
            alien_cargo: Vec::new(),
            radar,
            notify_sent: NotifyLatches::default(),
        }
    }

    pub fn status(&self) -> AircraftStatus {
        self.state.status()
    }

    pub fn is_in_base(&self) -> bool {
        self.status().is_in_base()
    }

    pub fn is_on_geoscape(&self) -> bool {
        self.status().is_on_geoscape()
    }

    pub fn max_team_size(&self) -> usize {
        self.team.len()
    }

    /// Occupied team seats.
    pub fn team_size(&self) -> usize {
        self.team.iter().filter(|s| s.is_some()).count()
    }

    pub fn team_members(&self) -> impl Iterator<Item = Ucn> + '_ {
        self.team.iter().flatten().copied()
    }

    pub fn has_pilot(&self) -> bool {
        self.pilot.is_some()
    }

    /// Employee aboard as pilot or team member.
    pub fn carries(&self, ucn: Ucn) -> bool {
        self.pilot == Some(ucn) || self.team.contains(&Some(ucn))
    }

    /// Degrees left in the tank.
    pub fn remaining_range(&self) -> f64 {
        remaining_range_degrees(self.stats.speed, self.fuel)
    }

    /// Every equipment slot, shield last.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut AircraftSlot> {
        self.weapons
            .iter_mut()
            .chain(self.electronics.iter_mut())
            .chain(std::iter::once(&mut self.shield))
    }

    /// Empty every slot without returning the items anywhere.
    pub fn release_equipment(&mut self) {
        for slot in self.slots_mut() {
            slot.release();
        }
    }

    /// Refill every armed weapon.
    pub fn reload_weapons(&mut self) {
        for w in &mut self.weapons {
            w.reload();
        }
    }

    /// Add collected items, merging with an existing entry of the same id.
    /// Returns false when the cargo hold has no room for a new entry.
    pub fn collect_item(&mut self, item: &str, amount: i32) -> bool {
        if let Some(entry) = self.item_cargo.iter_mut().find(|c| c.item == item) {
            entry.amount += amount;
            return true;
        }
        if self.item_cargo.len() >= MAX_CARGO {
            return false;
        }
        self.item_cargo.push(ItemCargo {
            item: item.to_string(),
            amount,
        });
        true
    }

    /// Add collected aliens, merging per team definition.
    pub fn collect_aliens(&mut self, team_def: &str, alive: i32, dead: i32) -> bool {
        if let Some(entry) = self.alien_cargo.iter_mut().find(|c| c.team_def == team_def) {
            entry.alive += alive;
            entry.dead += dead;
            return true;
        }
        if self.alien_cargo.len() >= MAX_CARGO {
            return false;
        }
        self.alien_cargo.push(AlienCargo {
            team_def: team_def.to_string(),
            alive,
            dead,
        });
        true
    }

    /// Point the heading from the previous position toward the new one.
    pub fn update_direction(&mut self, from: GeoPos, to: GeoPos) {
        let d = (to.to_vec() - from.to_vec()).normalize();
        if d != Vec3::ZERO {
            self.direction = d;
        }
    }
}
