//! Great-circle routes: waypoint generation and interpolation.
//!
//! A route is an ordered list of waypoints along the shorter great-circle
//! arc between two positions, spaced at a uniform angular step. Movement
//! along a route is expressed as a distance in degrees from its start.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::constants::{ARRIVAL_EPSILON, LINE_MAXSEG, POSITION_EPSILON, SECONDS_PER_HOUR};
use crate::geometry::{
    angular_distance, check_position_boundaries, perpendicular_vector, polar_to_vec,
    vec_to_polar, GeoPos, Vec3,
};

/// Waypoints of a great-circle path with a uniform segment length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Waypoints from start to destination (at least one).
    pub points: Vec<GeoPos>,
    /// Angular length of every segment, in degrees.
    pub segment_distance: f64,
}

impl Route {
    /// Zero-length route sitting on a single point.
    pub fn stationary(pos: GeoPos) -> Self {
        Self {
            points: vec![check_position_boundaries(pos)],
            segment_distance: 0.0,
        }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Total angular length: `segment_distance * (points - 1)`.
    pub fn total_distance(&self) -> f64 {
        self.segment_distance * self.points.len().saturating_sub(1) as f64
    }

    /// Last waypoint, wrapped into canonical ranges.
    pub fn destination(&self) -> Option<GeoPos> {
        self.points.last().map(|p| check_position_boundaries(*p))
    }

    pub fn start(&self) -> Option<GeoPos> {
        self.points.first().copied()
    }
}

/// Compute the shorter great-circle route from `from` to `to`.
///
/// The arc is split into `|Δφ| / π * LINE_MAXSEG + 1` segments (truncated),
/// so longer routes get proportionally more waypoints. Consecutive
/// waypoint longitudes never jump by more than 180°; the first one lies in
/// [-180, 180]. Identical endpoints give a single-point, zero-distance
/// route. Antipodal endpoints pick an arbitrary great circle.
pub fn great_circle_route(from: GeoPos, to: GeoPos) -> Route {
    if angular_distance(from, to) < POSITION_EPSILON {
        return Route::stationary(from);
    }

    let s = polar_to_vec(from);
    let e = polar_to_vec(to);
    let mut normal = s.cross(&e).normalize();
    if normal == Vec3::ZERO {
        normal = perpendicular_vector(s);
    }

    // Rotate into the frame whose pole is the plane normal.
    let trafo = vec_to_polar(normal);
    let (sin_t, cos_t) = trafo.lat.to_radians().sin_cos();

    let s = polar_to_vec(GeoPos::new(from.lon - trafo.lon, from.lat));
    let e = polar_to_vec(GeoPos::new(to.lon - trafo.lon, to.lat));

    let phi_start = s.y.atan2(cos_t * s.z - sin_t * s.x);
    let mut phi_end = e.y.atan2(cos_t * e.z - sin_t * e.x);

    if phi_end < phi_start - PI {
        phi_end += TAU;
    }
    if phi_end > phi_start + PI {
        phi_end -= TAU;
    }

    let n = ((phi_end - phi_start) / PI * LINE_MAXSEG as f64) as i64;
    let n = n.unsigned_abs() as usize + 1;

    let d_phi = (phi_end - phi_start) / n as f64;
    let segment_distance = d_phi.abs().to_degrees();

    let mut points: Vec<GeoPos> = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let phi = phi_start + d_phi * i as f64;
        let v = Vec3::new(-sin_t * phi.cos(), phi.sin(), cos_t * phi.cos());
        let mut p = vec_to_polar(v);
        p.lon += trafo.lon;

        match points.last() {
            None => {
                while p.lon < -180.0 {
                    p.lon += 360.0;
                }
                while p.lon > 180.0 {
                    p.lon -= 360.0;
                }
            }
            Some(last) => {
                while p.lon - last.lon > 180.0 {
                    p.lon -= 360.0;
                }
                while p.lon - last.lon < -180.0 {
                    p.lon += 360.0;
                }
            }
        }
        points.push(p);
    }

    Route {
        points,
        segment_distance,
    }
}

/// Position reached after travelling `distance` degrees along `route`.
///
/// The distance is clamped to `[0, total]`; past the end the destination is
/// returned. The result is wrapped back into canonical ranges.
pub fn interpolate(route: &Route, distance: f64) -> GeoPos {
    let last = match route.points.last() {
        Some(p) => *p,
        None => return GeoPos::default(),
    };
    let total = route.total_distance();
    if route.segment_distance <= 0.0 || distance >= total {
        return check_position_boundaries(last);
    }
    let distance = distance.max(0.0);

    let frac = distance / route.segment_distance;
    let p = (frac as usize).min(route.points.len() - 2);
    let frac = frac - p as f64;

    let a = route.points[p];
    let b = route.points[p + 1];
    check_position_boundaries(GeoPos {
        lon: (1.0 - frac) * a.lon + frac * b.lon,
        lat: (1.0 - frac) * a.lat + frac * b.lat,
    })
}

/// Degrees travelled at `speed` over `seconds`.
pub fn travelled_distance(speed: i32, seconds: i64) -> f64 {
    speed as f64 * seconds as f64 / SECONDS_PER_HOUR as f64
}

// ============================================================================
// ROUTE PROGRESS
// ============================================================================

/// A route being flown, with elapsed flight time along it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProgress {
    pub route: Route,
    /// Seconds flown since the route started.
    pub elapsed: i64,
    /// Index of the waypoint most recently passed.
    pub point: usize,
}

/// Outcome of advancing along a route by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Still travelling; new position.
    Moving(GeoPos),
    /// Reached the last waypoint.
    Arrived(GeoPos),
}

impl Advance {
    pub fn position(&self) -> GeoPos {
        match *self {
            Advance::Moving(p) | Advance::Arrived(p) => p,
        }
    }
}

impl RouteProgress {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            elapsed: 0,
            point: 0,
        }
    }

    /// Route from `from` to `to`, not yet started.
    pub fn between(from: GeoPos, to: GeoPos) -> Self {
        Self::new(great_circle_route(from, to))
    }

    pub fn destination(&self) -> Option<GeoPos> {
        self.route.destination()
    }

    /// Distance flown so far at `speed`.
    pub fn travelled(&self, speed: i32) -> f64 {
        travelled_distance(speed, self.elapsed)
    }

    /// Degrees left to fly.
    pub fn remaining(&self, speed: i32) -> f64 {
        (self.route.total_distance() - self.travelled(speed)).max(0.0)
    }

    /// Advance by `dt` seconds at `speed`.
    pub fn advance(&mut self, speed: i32, dt: i64) -> Advance {
        self.elapsed += dt;
        let dist = self.travelled(speed);
        if dist + ARRIVAL_EPSILON >= self.route.total_distance() {
            self.point = self.route.num_points().saturating_sub(1);
            let end = self.destination().unwrap_or_default();
            return Advance::Arrived(end);
        }
        if self.route.segment_distance > 0.0 {
            self.point = (dist / self.route.segment_distance) as usize;
        }
        Advance::Moving(interpolate(&self.route, dist))
    }

    /// Whole seconds still needed to reach the destination at `speed`.
    /// Never arrives at zero speed.
    pub fn seconds_to_arrival(&self, speed: i32) -> i64 {
        if speed <= 0 {
            return i64::MAX;
        }
        let left = self.remaining(speed) - ARRIVAL_EPSILON / 2.0;
        if left <= 0.0 {
            return 0;
        }
        (left * SECONDS_PER_HOUR as f64 / speed as f64).ceil() as i64
    }

    /// Where the flyer will be after another `dt` seconds. Matches the
    /// position [`advance`](Self::advance) would report.
    pub fn projected(&self, speed: i32, dt: i64) -> GeoPos {
        let dist = travelled_distance(speed, self.elapsed + dt);
        if dist + ARRIVAL_EPSILON >= self.route.total_distance() {
            self.destination().unwrap_or_default()
        } else {
            interpolate(&self.route, dist)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_route() {
        let r = great_circle_route(GeoPos::new(0.0, 0.0), GeoPos::new(10.0, 0.0));
        assert!((r.total_distance() - 10.0).abs() < 1e-9);
        assert_eq!(r.num_points(), 5);
        for p in &r.points {
            assert!(p.lat.abs() < 1e-9);
        }
        let end = r.destination().unwrap();
        assert!((end.lon - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_endpoints_match_inputs() {
        let from = GeoPos::new(-73.0, 40.0);
        let to = GeoPos::new(2.3, 48.8);
        let r = great_circle_route(from, to);
        assert!(angular_distance(r.points[0], from) < 1e-9);
        assert!(angular_distance(r.destination().unwrap(), to) < 1e-9);
        assert!((r.total_distance() - angular_distance(from, to)).abs() < 1e-9);
    }

    #[test]
    fn test_segment_count_grows_with_distance() {
        let short = great_circle_route(GeoPos::new(0.0, 0.0), GeoPos::new(5.0, 0.0));
        let long = great_circle_route(GeoPos::new(0.0, 0.0), GeoPos::new(150.0, 0.0));
        assert!(long.num_points() > short.num_points());
        assert!(long.num_points() <= crate::constants::LINE_MAXPTS);
    }

    #[test]
    fn test_degenerate_route() {
        let p = GeoPos::new(12.0, 34.0);
        let r = great_circle_route(p, p);
        assert_eq!(r.num_points(), 1);
        assert_eq!(r.total_distance(), 0.0);
        assert_eq!(interpolate(&r, 5.0), p);
    }

    #[test]
    fn test_antipodal_route_is_half_circle() {
        let r = great_circle_route(GeoPos::new(0.0, 0.0), GeoPos::new(180.0, 0.0));
        assert!((r.total_distance() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_dateline_longitudes_are_continuous() {
        let r = great_circle_route(GeoPos::new(170.0, 10.0), GeoPos::new(-170.0, 10.0));
        assert!(r.total_distance() < 25.0);
        for pair in r.points.windows(2) {
            assert!((pair[1].lon - pair[0].lon).abs() <= 180.0);
        }
        let mid = interpolate(&r, r.total_distance() / 2.0);
        assert!(mid.lon.abs() > 170.0);
    }

    #[test]
    fn test_interpolate_clamps_and_is_idempotent_at_end() {
        let r = great_circle_route(GeoPos::new(0.0, 0.0), GeoPos::new(10.0, 0.0));
        let end = interpolate(&r, r.total_distance());
        let past = interpolate(&r, r.total_distance() + 50.0);
        assert_eq!(end, past);
        assert_eq!(interpolate(&r, -3.0), r.points[0]);
        let half = interpolate(&r, 5.0);
        assert!((half.lon - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_advance_and_arrival() {
        let mut prog = RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(10.0, 0.0));
        // 600 speed covers 10 degrees in 60 seconds.
        match prog.advance(600, 30) {
            Advance::Moving(p) => assert!((p.lon - 5.0).abs() < 1e-9),
            other => panic!("expected movement, got {:?}", other),
        }
        assert!(prog.point >= 1 && prog.point <= 2);
        assert!((prog.projected(600, 10).lon - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(prog.seconds_to_arrival(600), 30);
        match prog.advance(600, 30) {
            Advance::Arrived(p) => assert!((p.lon - 10.0).abs() < 1e-9),
            other => panic!("expected arrival, got {:?}", other),
        }
        assert_eq!(prog.point, prog.route.num_points() - 1);
        assert_eq!(prog.remaining(600), 0.0);
        assert_eq!(prog.seconds_to_arrival(600), 0);
    }

    #[test]
    fn test_projection_matches_advance() {
        let mut prog = RouteProgress::between(GeoPos::new(3.0, 40.0), GeoPos::new(-20.0, 55.0));
        let speed = 1100;
        let needed = prog.seconds_to_arrival(speed);
        assert!(needed > 0);
        for dt in [7, 60, 600] {
            let ahead = prog.projected(speed, dt);
            let mut copy = prog.clone();
            assert_eq!(copy.advance(speed, dt).position(), ahead);
        }
        assert_eq!(prog.projected(speed, needed), prog.destination().unwrap());
        assert!(matches!(prog.advance(speed, needed), Advance::Arrived(_)));

        let parked = RouteProgress::between(GeoPos::new(0.0, 0.0), GeoPos::new(1.0, 0.0));
        assert_eq!(parked.seconds_to_arrival(0), i64::MAX);
    }
}
