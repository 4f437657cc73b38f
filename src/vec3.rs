//! 3D vector math for quad transforms.
//!
//! Double-precision vectors with per-axis Euler rotations, plus the
//! axis-aligned bounding box used to normalize quad geometry into a shared
//! world coordinate space.

use std::ops::{Add, Sub};

/// 3D vector; transform math runs in double precision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    /// Rotate around X axis
    #[inline]
    pub fn rotate_x(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }

    /// Rotate around Y axis
    #[inline]
    pub fn rotate_y(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Rotate around Z axis
    #[inline]
    pub fn rotate_z(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }

    /// Apply Euler rotations in X, Y, Z order
    #[inline]
    pub fn rotate_xyz(&self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotate_x(rx).rotate_y(ry).rotate_z(rz)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/// Axis-aligned bounding box built by folding points into running min/max
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Empty box: min at +inf, max at -inf, so any folded point sets both
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Vec3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// The unit box `[-0.5, 0.5]` on every axis.
    /// Stable sentinel returned when no geometry exists to bound.
    pub const fn unit() -> Self {
        Self {
            min: Vec3::new(-0.5, -0.5, -0.5),
            max: Vec3::new(0.5, 0.5, 0.5),
        }
    }

    /// Grow the box to include a point
    pub fn fold(&mut self, p: Vec3) {
        if self.min.x > p.x {
            self.min.x = p.x;
        }
        if self.max.x < p.x {
            self.max.x = p.x;
        }
        if self.min.y > p.y {
            self.min.y = p.y;
        }
        if self.max.y < p.y {
            self.max.y = p.y;
        }
        if self.min.z > p.z {
            self.min.z = p.z;
        }
        if self.max.z < p.z {
            self.max.z = p.z;
        }
    }

    #[inline]
    pub fn size_x(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn size_y(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size_z(&self) -> f64 {
        self.max.z - self.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_z_quarter_turn() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let r = v.rotate_z(std::f64::consts::FRAC_PI_2);
        assert!(r.approx_eq(&Vec3::new(0.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_rotate_identity() {
        let v = Vec3::new(0.3, -1.2, 7.5);
        let r = v.rotate_xyz(0.0, 0.0, 0.0);
        assert!(r.approx_eq(&v, 1e-12));
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let v = Vec3::new(2.0, 3.0, -4.0);
        let tau = std::f64::consts::TAU;
        let r = v.rotate_xyz(tau, tau, tau);
        assert!(r.approx_eq(&v, 1e-9));
    }

    #[test]
    fn test_aabb_fold() {
        let mut b = Aabb::empty();
        b.fold(Vec3::new(1.0, -2.0, 3.0));
        b.fold(Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.size_x(), 2.0);
        assert_eq!(b.size_y(), 4.0);
        assert_eq!(b.size_z(), 3.0);
    }

    #[test]
    fn test_aabb_unit() {
        let b = Aabb::unit();
        assert_eq!(b.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(b.max, Vec3::new(0.5, 0.5, 0.5));
    }
}
