//! Interception point for a pursuer chasing a moving target on the sphere.
//!
//! Notation: S is the shooter (pursuer), T the target, D the target's
//! destination, I the interception point, O the centre of the globe.
//! `a` = angle TOI (target arc), `b` = angle SOI (shooter arc),
//! `c` = angle SOT, `B` = angle STI measured at T.
//!
//! Spherical trigonometry plus "both arrive at I together"
//! (`b = ratio * a`, `ratio = v_shooter / v_target`) reduce to one equation
//! in `a`:
//!
//! ```text
//! f(a) = (cos a − cos(ratio·a)·cos c)² − sin²c · (sin²(ratio·a) − sin²a · sin²B) = 0
//! ```
//!
//! Roots are bracketed with a coarse step, narrowed with bisection, and
//! checked against the geometry because `sin²B` loses the sign of B. A root
//! must also agree with the arc the target really flies to I: past half a
//! turn, rotating T by `a` lands closer to T than `a`, so such roots only
//! survive when both readings of the arc still match.

use serde::{Deserialize, Serialize};

use crate::constants::{
    INTERCEPT_TOLERANCE, POSITION_EPSILON, ROOT_BIG_STEP, ROOT_MAXIMUM, ROOT_PRECISION,
};
use crate::geometry::{
    angular_distance, polar_to_vec, rotate_point_around_vector, vec_to_polar, GeoPos, Vec3,
};

/// Upper bound on candidate roots examined before giving up.
const MAX_CANDIDATES: usize = 512;

/// The equation whose roots give the target arc `a`.
pub fn destination_function(c: f64, b_angle: f64, ratio: f64, a: f64) -> f64 {
    let sin_c = c.sin();
    let sin_b = b_angle.sin();
    (a.cos() - (ratio * a).cos() * c.cos()).powi(2)
        - sin_c * sin_c * ((ratio * a).sin().powi(2) - a.sin().powi(2) * sin_b * sin_b)
}

/// Closed-form derivative of [`destination_function`] with respect to `a`.
pub fn destination_derivative(c: f64, b_angle: f64, ratio: f64, a: f64) -> f64 {
    let sin_c = c.sin();
    let sin_b = b_angle.sin();
    2.0 * (a.cos() - (ratio * a).cos() * c.cos()) * (-a.sin() + ratio * (ratio * a).sin() * c.cos())
        - sin_c * sin_c * (ratio * (2.0 * ratio * a).sin() - (2.0 * a).sin() * sin_b * sin_b)
}

/// Smallest root of [`destination_function`] greater than `start`, searched
/// up to 2π. Returns `None` when no root exists in that range or when the
/// computation degenerates (NaN, inconsistent derivative signs).
pub fn find_root(c: f64, b_angle: f64, ratio: f64, start: f64) -> Option<f64> {
    let f = |a: f64| destination_function(c, b_angle, ratio, a);
    let fd = |a: f64| destination_derivative(c, b_angle, ratio, a);

    let mut start = start;
    loop {
        // The derivative vanishes at 0, so never start exactly there.
        let mut end = start + ROOT_PRECISION / 10.0;
        if end >= ROOT_MAXIMUM {
            return None;
        }
        let mut f_end = f(end);
        let mut fd_end = fd(end);
        let mut begin;
        let mut f_begin;
        let mut fd_begin;

        // Coarse bracketing: stop when either f or f' changes sign.
        loop {
            begin = end;
            f_begin = f_end;
            fd_begin = fd_end;
            end = begin + ROOT_BIG_STEP;
            if end > ROOT_MAXIMUM {
                end = ROOT_MAXIMUM;
                f_end = f(end);
                break;
            }
            f_end = f(end);
            fd_end = fd(end);
            if !(f_begin * f_end > 0.0 && fd_begin * fd_end > 0.0) {
                break;
            }
        }

        if f_begin * f_end > 0.0 {
            if fd_begin * fd_end >= 0.0 {
                log::debug!(
                    "find_root: no solution in range {:.2}..{:.2}",
                    start,
                    ROOT_MAXIMUM
                );
                return None;
            }

            // Derivative changed sign: narrow on f' until f changes sign.
            let mut restart = None;
            let mut middle = (begin + end) / 2.0;
            let mut f_middle = f(middle);
            let mut fd_middle = fd(middle);
            loop {
                if fd_end * fd_middle < 0.0 {
                    begin = middle;
                    f_begin = f_middle;
                    fd_begin = fd_middle;
                } else if fd_begin * fd_middle < 0.0 {
                    end = middle;
                    f_end = f_middle;
                    fd_end = fd_middle;
                } else {
                    log::debug!("find_root: inconsistent derivative signs, giving up");
                    return None;
                }
                middle = (begin + end) / 2.0;
                f_middle = f(middle);
                fd_middle = fd(middle);

                if end - middle < ROOT_PRECISION {
                    // Only an extremum of f, not a root: search past it.
                    restart = Some(end);
                    break;
                }
                if f_begin * f_end <= 0.0 {
                    break;
                }
            }
            if let Some(next) = restart {
                start = next;
                continue;
            }
        }

        // Bisection on f.
        let mut middle = (begin + end) / 2.0;
        let mut f_middle = f(middle);
        loop {
            if f_end * f_middle < 0.0 {
                begin = middle;
                f_begin = f_middle;
            } else if f_begin * f_middle < 0.0 {
                end = middle;
                f_end = f_middle;
            } else if f_middle == 0.0 {
                return Some(middle);
            } else {
                log::debug!("find_root: bisection lost the bracket (NaN?)");
                return None;
            }
            middle = (begin + end) / 2.0;
            f_middle = f(middle);
            if end - middle <= ROOT_PRECISION {
                return Some(middle);
            }
        }
    }
}

/// Everything needed to aim a pursuer at a moving target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuitInput {
    pub shooter_pos: GeoPos,
    pub shooter_speed: i32,
    pub target_pos: GeoPos,
    pub target_speed: i32,
    /// Final waypoint of the target's current route, if it has one.
    pub target_destination: Option<GeoPos>,
}

/// A consistent interception solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception {
    pub point: GeoPos,
    /// Arc flown by the target to reach the point (radians).
    pub target_arc: f64,
    /// Arc flown by the shooter to reach the point (radians).
    pub shooter_arc: f64,
}

/// Solve for the interception point, or `None` when no consistent root
/// exists in [0, 2π) or the geometry is degenerate.
pub fn solve_interception(input: &PursuitInput) -> Option<Interception> {
    if input.shooter_speed <= 0 || input.target_speed <= 0 {
        return None;
    }
    let dest = input.target_destination?;
    if angular_distance(input.target_pos, dest) < POSITION_EPSILON
        || angular_distance(input.shooter_pos, input.target_pos) < POSITION_EPSILON
    {
        return None;
    }

    let ratio = input.shooter_speed as f64 / input.target_speed as f64;
    let c = angular_distance(input.shooter_pos, input.target_pos).to_radians();

    let s = polar_to_vec(input.shooter_pos);
    let t = polar_to_vec(input.target_pos);
    let d = polar_to_vec(dest);

    let axis_ts = t.cross(&s).normalize();
    let axis_td = t.cross(&d).normalize();
    if axis_ts == Vec3::ZERO || axis_td == Vec3::ZERO {
        return None;
    }

    // Tangents at T toward S and toward D; B is the angle between them.
    let tangent_ts = rotate_point_around_vector(axis_ts, t, 90.0);
    let tangent_td = rotate_point_around_vector(axis_td, t, 90.0);
    let b_angle = tangent_ts.dot(&tangent_td).clamp(-1.0, 1.0).acos();

    let mut a = 0.0;
    for _ in 0..MAX_CANDIDATES {
        a = find_root(c, b_angle, ratio, a)?;

        let point = vec_to_polar(rotate_point_around_vector(axis_td, t, a.to_degrees()));
        let b = angular_distance(input.shooter_pos, point).to_radians();
        let flown = angular_distance(input.target_pos, point).to_radians();
        if (b - ratio * a).abs() < INTERCEPT_TOLERANCE
            && (b / ratio - flown).abs() < INTERCEPT_TOLERANCE
        {
            return Some(Interception {
                point,
                target_arc: a,
                shooter_arc: b,
            });
        }
        log::debug!(
            "solve_interception: reject solution: doesn't fit {:.4} == {:.4} (target arc {:.4})",
            b,
            ratio * a,
            flown
        );
        // Resume just past the rejected root so it is not found again.
        a += ROOT_PRECISION;
    }
    None
}

/// Point the pursuer should fly to. Falls back to the target's current
/// position when no interception solution exists.
pub fn pursuit_destination(input: &PursuitInput) -> GeoPos {
    match solve_interception(input) {
        Some(sol) => sol.point,
        None => input.target_pos,
    }
}
