use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::NavError;

/// Absolute tolerance used by [`Pt`] equality.
pub const EPSILON: f64 = 1e-4;

#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 2D point / vector value. Equality is approximate (see [`EPSILON`]).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub const ZERO: Pt = Pt { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `radians`.
    pub fn from_angle(radians: f64) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Fails with `GeometryDegenerate` when the magnitude is zero.
    pub fn normalized(self) -> Result<Self, NavError> {
        let m = self.magnitude();
        if m == 0.0 {
            return Err(NavError::GeometryDegenerate);
        }
        Ok(Self::new(self.x / m, self.y / m))
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D determinant `x1*y2 - x2*y1`.
    pub fn det(self, other: Self) -> f64 {
        self.x * other.y - other.x * self.y
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    /// Signed angle from `self` to `other` in (-pi, pi]; positive when `other`
    /// is counter-clockwise from `self`.
    pub fn angle_between(self, other: Self) -> f64 {
        self.det(other).atan2(self.dot(other))
    }

    pub fn xy(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl PartialEq for Pt {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl Add for Pt {
    type Output = Pt;
    fn add(self, rhs: Pt) -> Pt {
        Pt::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Pt {
    type Output = Pt;
    fn mul(self, k: f64) -> Pt {
        self.scale(k)
    }
}

impl Neg for Pt {
    type Output = Pt;
    fn neg(self) -> Pt {
        Pt::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Pt {
    fn from(v: [f64; 2]) -> Self {
        Pt::new(v[0], v[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn equality_tolerates_drift() {
        assert_eq!(Pt::new(1.0, 2.0), Pt::new(1.00005, 1.99995));
        assert_ne!(Pt::new(1.0, 2.0), Pt::new(1.001, 2.0));
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Pt::new(5.0, 0.0);
        let b = Pt::new(0.0, 2.0);
        assert_eq!(b - a, Pt::new(-5.0, 2.0));
        assert_eq!(a + b, Pt::new(5.0, 2.0));
        assert_eq!(a * 0.5, Pt::new(2.5, 0.0));
        assert_eq!(-b, Pt::new(0.0, -2.0));
        assert_eq!(a, Pt::new(5.0, 0.0));
    }

    #[test]
    fn dot_det_distance() {
        let ab = Pt::new(-5.0, 2.0);
        assert!(approx_eq(ab.dot(ab), 29.0));
        assert!(approx_eq(Pt::new(1.0, 0.0).det(Pt::new(0.0, 1.0)), 1.0));
        assert!(approx_eq(Pt::new(0.0, 0.0).distance(Pt::new(3.0, 4.0)), 5.0));
    }

    #[test]
    fn normalized_has_unit_length() {
        for v in [Pt::new(3.0, 4.0), Pt::new(-0.001, 0.0), Pt::new(1e3, -7.5), Pt::new(0.2, 0.2)] {
            let n = v.normalized().unwrap();
            assert!(approx_eq(n.magnitude(), 1.0), "{v:?}");
        }
    }

    #[test]
    fn normalizing_zero_fails() {
        assert!(matches!(Pt::ZERO.normalized(), Err(NavError::GeometryDegenerate)));
    }

    #[test]
    fn angle_between_sign_and_extremes() {
        let east = Pt::new(1.0, 0.0);
        let north = Pt::new(0.0, 1.0);
        assert!(approx_eq(east.angle_between(north), FRAC_PI_2));
        assert!(approx_eq(north.angle_between(east), -FRAC_PI_2));
        let v = Pt::new(2.0, -3.0);
        assert!(approx_eq(v.angle_between(v), 0.0));
        assert!(approx_eq(v.angle_between(-v).abs(), PI));
    }
}
