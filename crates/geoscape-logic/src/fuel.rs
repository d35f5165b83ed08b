//! Fuel, range and refueling arithmetic.
//!
//! Fuel is measured in seconds of flight. An aircraft with speed `v` and
//! `fuel` seconds left can still cover `v * fuel / 3600` degrees.

use crate::constants::{FUEL_EPSILON, KILOMETER_PER_DEGREE, SECONDS_PER_HOUR};
use crate::geometry::{angular_distance, GeoPos};

/// `speed * fuel`; divide by 3600 for degrees.
pub fn remaining_range(speed: i32, fuel: i32) -> i64 {
    speed as i64 * fuel as i64
}

/// Degrees the aircraft can still fly.
pub fn remaining_range_degrees(speed: i32, fuel: i32) -> f64 {
    remaining_range(speed, fuel) as f64 / SECONDS_PER_HOUR as f64
}

/// Operational radius in kilometres on a full tank (there and back),
/// rounded down to hundreds.
pub fn operation_range(speed: i32, fuel_size: i32) -> i32 {
    let range = speed as f64 * fuel_size as f64;
    100 * (KILOMETER_PER_DEGREE * range / (2.0 * SECONDS_PER_HOUR as f64 * 100.0)) as i32
}

/// Can the aircraft fly from `pos` to `destination` and then back `home`?
pub fn has_enough_fuel(
    pos: GeoPos,
    destination: GeoPos,
    home: GeoPos,
    speed: i32,
    fuel: i32,
) -> bool {
    let distance = angular_distance(pos, destination) + angular_distance(destination, home);
    distance <= remaining_range_degrees(speed, fuel) + FUEL_EPSILON
}

/// Can the aircraft reach `destination` from `pos`, with no return leg?
pub fn has_enough_fuel_one_way(pos: GeoPos, destination: GeoPos, speed: i32, fuel: i32) -> bool {
    angular_distance(pos, destination) <= remaining_range_degrees(speed, fuel) + FUEL_EPSILON
}

/// Result of one refueling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefuelStep {
    /// Fuel seconds added this step.
    pub fuel_added: i32,
    /// Antimatter taken from base storage.
    pub antimatter_used: i32,
    /// The step was cut short by a lack of antimatter.
    pub limited: bool,
    /// The tank is full after this step.
    pub full: bool,
}

/// Compute one refueling step of `dt` seconds.
///
/// `antimatter_per_tank` is the antimatter a full tank needs (0 for
/// conventional fuel) and `antimatter_available` the base stock. Negative
/// fuel is treated as empty.
pub fn compute_refuel(
    fuel: i32,
    fuel_size: i32,
    antimatter_per_tank: i32,
    antimatter_available: i32,
    dt: i32,
    refuel_factor: i32,
) -> RefuelStep {
    let fuel = fuel.max(0);
    let mut fillup = (dt.saturating_mul(refuel_factor)).min(fuel_size - fuel).max(0);
    let mut antimatter_used = 0;
    let mut limited = false;

    if antimatter_per_tank > 0 && fillup > 0 && fuel_size > 0 {
        let am = antimatter_per_tank as i64;
        let size = fuel_size as i64;
        let am_cur = am * fuel as i64 / size;
        let am_next = am * (fuel + fillup) as i64 / size;
        let mut am_load = (am_next - am_cur) as i32;
        let available = antimatter_available.max(0);

        if am_load > available {
            // Only fill what the remaining stock covers.
            let reachable = size * (am_cur + available as i64) / am;
            fillup = ((reachable - fuel as i64).max(0) as i32).min(fillup);
            am_load = available;
            limited = true;
        }
        antimatter_used = am_load;
    }

    let after = fuel + fillup;
    RefuelStep {
        fuel_added: fillup,
        antimatter_used,
        limited,
        full: after >= fuel_size,
    }
}
