//! Hangar capacity arithmetic per base.
//!
//! Each base has one small and one large hangar counter. An aircraft takes a
//! slot in the hangar matching its size class; the counter's `cur` never
//! exceeds `max`.

use serde::{Deserialize, Serialize};

use crate::catalog::SizeClass;

/// Hangar class an aircraft is parked in. Mirrors [`SizeClass`].
pub type HangarClass = SizeClass;

/// A `cur/max` pair for a base capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub cur: u32,
    pub max: u32,
}

impl Capacity {
    pub const fn new(cur: u32, max: u32) -> Self {
        Self { cur, max }
    }

    /// Free slots, never negative.
    pub fn free(&self) -> u32 {
        self.max.saturating_sub(self.cur)
    }

    pub fn is_full(&self) -> bool {
        self.cur >= self.max
    }
}

/// Which hangar buildings of a base are operational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangarBuildings {
    pub small: bool,
    pub large: bool,
}

impl HangarBuildings {
    pub fn has(&self, class: HangarClass) -> bool {
        match class {
            SizeClass::Small => self.small,
            SizeClass::Large => self.large,
        }
    }

    /// Whether the base can house aircraft at all.
    pub fn any(&self) -> bool {
        self.small || self.large
    }
}

/// Small and large hangar counters of one base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangarCapacities {
    pub small: Capacity,
    pub large: Capacity,
}

impl HangarCapacities {
    pub fn get(&self, class: HangarClass) -> &Capacity {
        match class {
            SizeClass::Small => &self.small,
            SizeClass::Large => &self.large,
        }
    }

    pub fn get_mut(&mut self, class: HangarClass) -> &mut Capacity {
        match class {
            SizeClass::Small => &mut self.small,
            SizeClass::Large => &mut self.large,
        }
    }

    /// Zero both `cur` counters, keeping `max`.
    pub fn reset(&mut self) {
        self.small.cur = 0;
        self.large.cur = 0;
    }
}

/// Why an aircraft could not be given a hangar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HangarError {
    /// The base lacks an operational hangar for this size class.
    NoOperationalHangar,
    /// The matching hangar has no free slot.
    HangarFull,
}

impl std::fmt::Display for HangarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HangarError::NoOperationalHangar => write!(f, "no operational hangars at that base"),
            HangarError::HangarFull => write!(f, "no free hangars at that base"),
        }
    }
}

impl std::error::Error for HangarError {}

/// Hangar class for an aircraft of the given size.
pub fn classify_by_size(size: SizeClass) -> HangarClass {
    size
}

/// Take a hangar slot for an aircraft of `size`. On error nothing changes.
pub fn assign_to_hangar(
    capacities: &mut HangarCapacities,
    buildings: &HangarBuildings,
    size: SizeClass,
) -> Result<HangarClass, HangarError> {
    let class = classify_by_size(size);
    if !buildings.has(class) {
        return Err(HangarError::NoOperationalHangar);
    }
    let cap = capacities.get_mut(class);
    if cap.is_full() {
        return Err(HangarError::HangarFull);
    }
    cap.cur += 1;
    Ok(class)
}

/// Check whether a slot is available without taking it.
pub fn can_assign(
    capacities: &HangarCapacities,
    buildings: &HangarBuildings,
    size: SizeClass,
) -> Result<HangarClass, HangarError> {
    let class = classify_by_size(size);
    if !buildings.has(class) {
        return Err(HangarError::NoOperationalHangar);
    }
    if capacities.get(class).is_full() {
        return Err(HangarError::HangarFull);
    }
    Ok(class)
}

/// Give back the slot held by an aircraft of `class`.
pub fn release_hangar(capacities: &mut HangarCapacities, class: HangarClass) {
    let cap = capacities.get_mut(class);
    cap.cur = cap.cur.saturating_sub(1);
}

/// Rebuild the counters from scratch for the aircraft sizes given in base
/// order. Returns the hangar each aircraft ended up in (`None` when it could
/// not be housed).
pub fn recompute_all(
    capacities: &mut HangarCapacities,
    buildings: &HangarBuildings,
    sizes: impl IntoIterator<Item = SizeClass>,
) -> Vec<Option<HangarClass>> {
    capacities.reset();
    sizes
        .into_iter()
        .map(|size| assign_to_hangar(capacities, buildings, size).ok())
        .collect()
}

/// Free slots for `size` after setting aside `reserved` more (for example
/// aircraft on order). `None` when the base is not founded.
pub fn free_capacity(
    capacities: &HangarCapacities,
    size: SizeClass,
    reserved: u32,
    founded: bool,
) -> Option<u32> {
    if !founded {
        return None;
    }
    Some(capacities.get(classify_by_size(size)).free().saturating_sub(reserved))
}
