//! Systems - per-tick logic for aircraft and UFOs

mod flight;
mod ufo_flight;

pub use flight::*;
pub use ufo_flight::*;
