//! Base state the air layer reads and updates.

use std::collections::BTreeMap;

use geoscape_logic::catalog::SizeClass;
use geoscape_logic::geometry::GeoPos;
use geoscape_logic::hangar::{Capacity, HangarBuildings, HangarCapacities};

use super::common::AircraftId;

/// Live and dead aliens held in containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlienStock {
    pub alive: i32,
    pub dead: i32,
}

/// A PHALANX base.
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub name: String,
    pub pos: GeoPos,
    pub founded: bool,
    /// Operational hangar buildings.
    pub hangar_buildings: HangarBuildings,
    pub hangars: HangarCapacities,
    /// Crew quarters (employees living here).
    pub quarters: Capacity,
    /// Storage space (item units).
    pub storage_capacity: Capacity,
    /// Aircraft owned by this base, in base order.
    pub aircraft: Vec<AircraftId>,
    /// Aircraft selected in the base screens.
    pub current_aircraft: Option<AircraftId>,
    pub antimatter: i32,
    /// Item id to count.
    pub storage: BTreeMap<String, i32>,
    /// Alien team definition to containment stock.
    pub aliens: BTreeMap<String, AlienStock>,
    pub under_attack: bool,
}

impl Base {
    /// A founded base with no buildings and no capacity.
    pub fn new(name: impl Into<String>, pos: GeoPos) -> Self {
        Self {
            name: name.into(),
            pos,
            founded: true,
            hangar_buildings: HangarBuildings::default(),
            hangars: HangarCapacities::default(),
            quarters: Capacity::default(),
            storage_capacity: Capacity::default(),
            aircraft: Vec::new(),
            current_aircraft: None,
            antimatter: 0,
            storage: BTreeMap::new(),
            aliens: BTreeMap::new(),
            under_attack: false,
        }
    }

    /// Builder: operational hangars with the given slot counts. A count of
    /// zero means no building of that size.
    pub fn with_hangars(mut self, small: u32, large: u32) -> Self {
        self.hangar_buildings = HangarBuildings {
            small: small > 0,
            large: large > 0,
        };
        self.hangars.small.max = small;
        self.hangars.large.max = large;
        self
    }

    /// Builder: crew quarters and storage limits.
    pub fn with_quarters(mut self, quarters: u32, storage: u32) -> Self {
        self.quarters.max = quarters;
        self.storage_capacity.max = storage;
        self
    }

    pub fn with_antimatter(mut self, antimatter: i32) -> Self {
        self.antimatter = antimatter;
        self
    }

    pub fn has_operational_hangar(&self, size: SizeClass) -> bool {
        self.hangar_buildings.has(size)
    }

    /// Whether aircraft can be based here at all.
    pub fn aircraft_allowed(&self) -> bool {
        self.hangar_buildings.any()
    }

    /// Put `amount` units of `item` into storage, each taking `size` space.
    pub fn store_item(&mut self, item: &str, amount: i32, size: u32) {
        *self.storage.entry(item.to_string()).or_insert(0) += amount;
        let delta = amount.unsigned_abs() * size;
        if amount >= 0 {
            self.storage_capacity.cur += delta;
        } else {
            self.storage_capacity.cur = self.storage_capacity.cur.saturating_sub(delta);
        }
        if self.storage.get(item).is_some_and(|n| *n <= 0) {
            self.storage.remove(item);
        }
    }

    pub fn item_count(&self, item: &str) -> i32 {
        self.storage.get(item).copied().unwrap_or(0)
    }

    /// Take up to `amount` antimatter; returns what was actually taken.
    pub fn consume_antimatter(&mut self, amount: i32) -> i32 {
        let taken = amount.clamp(0, self.antimatter.max(0));
        self.antimatter -= taken;
        taken
    }

    pub fn store_aliens(&mut self, team_def: &str, alive: i32, dead: i32) {
        let stock = self.aliens.entry(team_def.to_string()).or_default();
        stock.alive += alive;
        stock.dead += dead;
    }
}
