//! Pure air-operations logic for the geoscape.
//!
//! This crate holds the parts of aircraft simulation that need no campaign
//! state: sphere geometry, great-circle routes, the interception solver,
//! aircraft templates, hangar and fuel arithmetic. Functions take plain data
//! and return results, so they are unit-testable on their own and shared by
//! the campaign engine and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Aircraft templates, stats, slot layouts, JSON loading |
//! | [`constants`] | Limits, conversion factors, solver tolerances |
//! | [`fuel`] | Range checks, operation range, refuel steps with antimatter |
//! | [`geometry`] | Polar/vector conversion, arc distance, axis rotation |
//! | [`hangar`] | Small/large hangar counters, assignment, recompute |
//! | [`intercept`] | Interception point of a pursuer chasing a moving target |
//! | [`route`] | Great-circle waypoints, interpolation, route progress |
//! | [`status`] | Aircraft status codes, names, in-base/on-geoscape predicates |

pub mod catalog;
pub mod constants;
pub mod fuel;
pub mod geometry;
pub mod hangar;
pub mod intercept;
pub mod route;
pub mod status;
