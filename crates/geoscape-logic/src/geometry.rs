//! Unit-sphere geometry: polar/vector conversion, arc distance, rotation.
//!
//! Positions on the globe are `(longitude, latitude)` in degrees. Internally
//! the solver and route code work with unit vectors where
//! `x = cos(lon)·cos(lat)`, `y = sin(lon)·cos(lat)`, `z = sin(lat)`.

use serde::{Deserialize, Serialize};

use crate::constants::POSITION_EPSILON;

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    /// Longitude, nominally in [-180, 180].
    pub lon: f64,
    /// Latitude in [-90, 90].
    pub lat: f64,
}

impl GeoPos {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Unit vector for this position.
    pub fn to_vec(self) -> Vec3 {
        polar_to_vec(self)
    }

    /// Position wrapped back into the canonical longitude/latitude ranges.
    pub fn normalized(self) -> Self {
        check_position_boundaries(self)
    }

    /// Whether two positions denote the same point on the sphere.
    pub fn same_place(&self, other: &Self) -> bool {
        angular_distance(*self, *other) < POSITION_EPSILON
    }
}

/// Cartesian vector used for sphere math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Convert a polar position (degrees) into a unit vector.
pub fn polar_to_vec(pos: GeoPos) -> Vec3 {
    let lon = pos.lon.to_radians();
    let lat = pos.lat.to_radians();
    Vec3::new(lon.cos() * lat.cos(), lon.sin() * lat.cos(), lat.sin())
}

/// Convert a vector into a polar position (degrees). The vector need not be
/// normalized, but must be non-zero.
pub fn vec_to_polar(v: Vec3) -> GeoPos {
    let n = v.normalize();
    GeoPos {
        lon: n.y.atan2(n.x).to_degrees(),
        lat: 90.0 - n.z.clamp(-1.0, 1.0).acos().to_degrees(),
    }
}

// ============================================================================
// DISTANCE & ROTATION
// ============================================================================

/// Great-circle distance between two positions in degrees of arc.
///
/// Symmetric and zero for identical inputs. The dot product is clamped so
/// rounding noise never produces NaN.
pub fn angular_distance(a: GeoPos, b: GeoPos) -> f64 {
    let d = polar_to_vec(a).dot(&polar_to_vec(b)).clamp(-1.0, 1.0);
    d.acos().to_degrees()
}

/// Rotate `point` by `degrees` around the unit axis `dir` (right-hand rule).
pub fn rotate_point_around_vector(dir: Vec3, point: Vec3, degrees: f64) -> Vec3 {
    let k = dir.normalize();
    let (sin, cos) = degrees.to_radians().sin_cos();
    point * cos + k.cross(&point) * sin + k * (k.dot(&point) * (1.0 - cos))
}

/// Any unit vector perpendicular to `v`.
pub fn perpendicular_vector(v: Vec3) -> Vec3 {
    let n = v.normalize();
    // Cross with the axis least aligned with `n`.
    let axis = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
        Vec3::new(1.0, 0.0, 0.0)
    } else if n.y.abs() <= n.z.abs() {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, 1.0)
    };
    n.cross(&axis).normalize()
}

/// Wrap a position back onto the globe: latitudes past a pole flip to the
/// other side, longitudes wrap into [-180, 180].
pub fn check_position_boundaries(pos: GeoPos) -> GeoPos {
    let mut lon = pos.lon;
    let mut lat = pos.lat;

    if lat > 90.0 {
        lat = 180.0 - lat;
        lon += 180.0;
    } else if lat < -90.0 {
        lat = -180.0 - lat;
        lon += 180.0;
    }

    GeoPos {
        lon: wrap_longitude(lon),
        lat,
    }
}

/// Wrap a longitude into [-180, 180].
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 onto -180; keep the sign of the input there.
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
