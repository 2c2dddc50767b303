//! Unit quaternions for rotating body axes
//!
//! Quaternions here are built fresh every frame from an axis and an angle and
//! applied once; they are never accumulated into a persistent orientation.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::math::Vec3;

/// Quaternion `w + xi + yj + zk`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    /// Scalar part
    pub w: f32,
    /// i component
    pub x: f32,
    /// j component
    pub y: f32,
    /// k component
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// The identity rotation
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a quaternion from raw components
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// `axis` must already be unit length; it is not re-normalized, so a
    /// non-unit axis yields a non-unit quaternion.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Pure quaternion `(0, v)`
    const fn pure(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Vector part
    pub const fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Conjugate `(w, -x, -y, -z)`
    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Magnitude
    pub fn norm(self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Hamilton product `self · other`
    ///
    /// As a rotation, `other` is applied first.
    #[must_use]
    pub fn multiply(self, other: Self) -> Self {
        let (a, b) = (self, other);
        Self::new(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
    }

    /// Rotate `v`: the vector part of `q · (0, v) · q*`
    pub fn rotate(self, v: Vec3) -> Vec3 {
        self.multiply(Self::pure(v)).multiply(self.conjugate()).vector()
    }

    /// Rotate `v` by `angle` radians about the unit `axis`
    pub fn rotate_about(axis: Vec3, angle: f32, v: Vec3) -> Vec3 {
        Self::from_axis_angle(axis, angle).rotate(v)
    }
}

impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl AbsDiffEq for Quat {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Quat {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_zero_angle_is_identity() {
        let v = Vec3::new(0.3, -1.2, 4.0);
        for axis in [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z] {
            assert_relative_eq!(Quat::from_axis_angle(axis, 0.0), Quat::IDENTITY);
            assert_relative_eq!(Quat::rotate_about(axis, 0.0, v), v, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rotation_preserves_magnitude() {
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize().unwrap();
        let v = Vec3::new(2.0, -3.0, 0.5);
        for step in 0..16 {
            let angle = step as f32 * 0.41;
            let rotated = Quat::rotate_about(axis, angle, v);
            assert_relative_eq!(rotated.length(), v.length(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let rotated = Quat::rotate_about(Vec3::UNIT_Z, FRAC_PI_2, Vec3::UNIT_X);
        assert_relative_eq!(rotated, Vec3::UNIT_Y, epsilon = EPSILON);
    }

    #[test]
    fn test_matches_axis_angle_matrix() {
        let axis = Vec3::new(2.0, -1.0, 2.0).scaled(1.0 / 3.0);
        let v = Vec3::new(0.5, 4.0, -2.0);
        let angle = 1.3;
        let by_matrix = Mat4::from_axis_angle(axis, angle).transform_vector(v);
        assert_relative_eq!(Quat::rotate_about(axis, angle, v), by_matrix, epsilon = 1e-4);
    }

    #[test]
    fn test_composition_applies_right_operand_first() {
        let about_z = Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2);
        let about_x = Quat::from_axis_angle(Vec3::UNIT_X, FRAC_PI_2);
        // X -> (about_z) -> Y -> (about_x) -> Z
        let composed = about_x * about_z;
        assert_relative_eq!(composed.rotate(Vec3::UNIT_X), Vec3::UNIT_Z, epsilon = EPSILON);
    }

    #[test]
    fn test_from_axis_angle_does_not_renormalize() {
        let q = Quat::from_axis_angle(Vec3::new(2.0, 0.0, 0.0), PI);
        assert_relative_eq!(q.norm(), 2.0, epsilon = EPSILON);
        assert_relative_eq!(Quat::from_axis_angle(Vec3::UNIT_Y, 0.9).norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::UNIT_Y, 0.77);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(q.conjugate().rotate(q.rotate(v)), v, epsilon = 1e-4);
    }
}
