//! Minimal geometry types shared by the chunk and mesh crates.
#![forbid(unsafe_code)]

use core::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    #[cfg_attr(test, proptest(strategy = "-1.0e6f32..1.0e6"))]
    pub x: f32,
    #[cfg_attr(test, proptest(strategy = "-1.0e6f32..1.0e6"))]
    pub y: f32,
    #[cfg_attr(test, proptest(strategy = "-1.0e6f32..1.0e6"))]
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Lifts an integer lattice position into float space.
    #[inline]
    pub fn from_ints(x: i32, y: i32, z: i32) -> Self {
        Self::new(x as f32, y as f32, z as f32)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Axis-aligned world-space bounds of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sub_undoes_add(a: Vec3, b: Vec3) {
            let r = (a + b) - b;
            prop_assert!((r.x - a.x).abs() <= 0.5);
            prop_assert!((r.y - a.y).abs() <= 0.5);
            prop_assert!((r.z - a.z).abs() <= 0.5);
        }
    }

    #[test]
    fn splat_offsets_every_axis() {
        let v = Vec3::from_ints(16, -32, 0) - Vec3::splat(0.5);
        assert_eq!(v, Vec3::new(15.5, -32.5, -0.5));
    }
}
