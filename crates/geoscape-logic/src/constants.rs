//! Shared constants for air operations on the geoscape.
//!
//! Distances on the globe are measured in degrees of arc; aircraft speeds are
//! expressed so that `speed * seconds / SECONDS_PER_HOUR` yields degrees.

/// Game seconds per hour. Converts `speed * time` into travelled degrees.
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Kilometres covered by one degree of arc on the globe.
pub const KILOMETER_PER_DEGREE: f64 = 111.2;

/// Maximum number of aircraft a single base can own.
pub const MAX_AIRCRAFT: usize = 64;

/// Maximum number of segments in a computed route.
pub const LINE_MAXSEG: usize = 64;

/// Maximum number of waypoints in a computed route (`LINE_MAXSEG + 2`).
pub const LINE_MAXPTS: usize = LINE_MAXSEG + 2;

/// Maximum number of weapon or electronics slots per aircraft.
pub const MAX_AIRCRAFTSLOT: usize = 4;

/// Largest team an aircraft can ever carry.
pub const MAX_ACTIVETEAM: usize = 8;

/// Maximum number of distinct cargo entries an aircraft tracks.
pub const MAX_CARGO: usize = 32;

/// Fuel seconds restored per game second while refueling.
pub const AIRCRAFT_REFUEL_FACTOR: i32 = 16;

/// Default radar range for freshly built aircraft (degrees).
pub const RADAR_AIRCRAFT_RANGE: i32 = 5;

/// Default radar tracking range for freshly built aircraft (degrees).
pub const RADAR_AIRCRAFT_TRACKING_RANGE: i32 = 7;

// ============================================================================
// INTERCEPTION SOLVER
// ============================================================================

/// Coarse step used while bracketing roots (radians).
pub const ROOT_BIG_STEP: f64 = 0.05;

/// Bisection stops once the bracket is narrower than this (radians).
pub const ROOT_PRECISION: f64 = 1.0e-6;

/// Upper bound of the root search (radians).
pub const ROOT_MAXIMUM: f64 = std::f64::consts::TAU;

/// Maximum allowed mismatch between pursuer arc and `ratio * a` (radians).
pub const INTERCEPT_TOLERANCE: f64 = 0.1;

/// Distance (degrees) below which two positions count as the same point.
pub const POSITION_EPSILON: f64 = 1.0e-9;

/// Tolerance (degrees) applied when deciding whether a route is complete.
pub const ARRIVAL_EPSILON: f64 = 1.0e-6;

/// Slack (degrees) in range checks so that exactly enough fuel passes.
/// Must stay below `ARRIVAL_EPSILON / 2`.
pub const FUEL_EPSILON: f64 = 1.0e-7;
