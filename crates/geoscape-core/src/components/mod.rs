//! Component definitions for the air-operations world.
//!
//! Components are plain data. Aircraft and UFOs live as entities in the
//! `hecs` world; bases and missions are campaign-owned records.

mod aircraft;
mod base;
mod common;
mod mission;
mod ufo;

pub use aircraft::*;
pub use base::*;
pub use common::*;
pub use mission::*;
pub use ufo::*;
