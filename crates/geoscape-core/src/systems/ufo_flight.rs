//! UFO flight system - moves flying UFOs along their routes

use hecs::World;

use geoscape_logic::route::Advance;

use crate::components::{Ufo, UfoId};

/// Move every flying UFO by `dt` seconds. Returns the UFOs that reached the
/// end of their route this tick and whether anything moved.
pub fn ufo_flight_system(world: &mut World, dt: i32) -> (Vec<UfoId>, bool) {
    let mut arrived = Vec::new();
    let mut moved = false;
    if dt <= 0 {
        return (arrived, moved);
    }

    for (entity, ufo) in world.query_mut::<&mut Ufo>() {
        if !ufo.is_flying() {
            continue;
        }
        moved = true;
        if advance_ufo(ufo, dt) {
            arrived.push(UfoId(entity));
        }
    }
    (arrived, moved)
}

/// Advance one UFO; returns true when it arrived. An arrived UFO is parked
/// at its destination with no route.
pub fn advance_ufo(ufo: &mut Ufo, dt: i32) -> bool {
    let speed = ufo.stats.speed;
    let from = ufo.position;
    let step = match ufo.route.as_mut() {
        Some(route) => route.advance(speed, dt as i64),
        None => return false,
    };
    let to = step.position();
    ufo.position = to;
    let d = (to.to_vec() - from.to_vec()).normalize();
    if d.length() > 0.0 {
        ufo.direction = d;
    }
    match step {
        Advance::Moving(_) => false,
        Advance::Arrived(_) => {
            ufo.route = None;
            true
        }
    }
}
