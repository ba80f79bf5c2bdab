use crate::Vector3;
use crate::Vector3f64;

pub type Vector3i32 = Vector3<i32>;

use std::fmt;
use std::ops::{Add, Neg, Sub};

impl Vector3i32 {
    pub fn to_f64(&self) -> Vector3f64 {
        Vector3f64::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    // |x| + |y| + |z|
    pub fn l1_norm(&self) -> i32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }

    pub fn max_by_component(&self, other: &Vector3i32) -> Vector3i32 {
        Vector3i32::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    pub fn min_by_component(&self, other: &Vector3i32) -> Vector3i32 {
        Vector3i32::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }
}

impl Add<Vector3i32> for Vector3i32 {
    type Output = Vector3i32;

    fn add(self, rhs: Vector3i32) -> Vector3i32 {
        Vector3i32 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub<Vector3i32> for Vector3i32 {
    type Output = Vector3i32;

    fn sub(self, rhs: Vector3i32) -> Vector3i32 {
        Vector3i32 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3i32 {
    type Output = Vector3i32;

    fn neg(self) -> Vector3i32 {
        Vector3i32::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3i32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}
