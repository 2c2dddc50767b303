//! Math utilities and types
//!
//! Hand-rolled 3-component vectors and 4x4 matrices for the flight scene.
//!
//! # Matrix convention
//! [`Mat4`] stores its 16 elements column-major (`m[col * 4 + row]`), the
//! layout GPU uniform uploads expect. Products read right-to-left:
//! `a * b` (or [`Mat4::multiply`]) yields the matrix that applies `b` first
//! and `a` second to a column vector. Every helper that "adds" an elementary
//! transform to a running matrix right-multiplies it, so
//! `m.translate(t) == m * Mat4::translation(t)`: the newest call acts first in
//! object space.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by vector math
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// A zero-length vector was asked for its direction
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

/// Result alias for fallible math operations
pub type MathResult<T> = Result<T, MathError>;

/// 3D vector of `f32` components
///
/// Used for positions, directions, axes, colors and light parameters.
/// Serializes as a plain `[x, y, z]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// The zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along +X
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along +Y
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along +Z
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);
    /// All components set to one
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a vector from components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared magnitude
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Magnitude
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector pointing the same way
    ///
    /// # Errors
    /// Returns [`MathError::DegenerateVector`] when the magnitude is exactly
    /// zero. There is deliberately no fallback direction: a zero vector here
    /// means something upstream (coincident eye and target, collapsed axes)
    /// is already wrong.
    pub fn normalize(self) -> MathResult<Self> {
        let length = self.length();
        if length == 0.0 {
            return Err(MathError::DegenerateVector);
        }
        Ok(self.scaled(1.0 / length))
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Multiply every component by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Components as an array
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(value: [f32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(value: Vec3) -> Self {
        value.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scaled(rhs)
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/// 4x4 transformation matrix, column-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// The multiplicative identity
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Identity matrix
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build from 16 column-major elements
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// The 16 column-major elements
    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    /// Element at `row`, `col`
    pub const fn at(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Translation by `(tx, ty, tz)`
    pub const fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            tx, ty, tz, 1.0,
        ])
    }

    /// Non-uniform scale
    pub const fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_cols_array([
            sx, 0.0, 0.0, 0.0,
            0.0, sy, 0.0, 0.0,
            0.0, 0.0, sz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about +X by `angle` radians
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, c, s, 0.0,
            0.0, -s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about +Y by `angle` radians
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            c, 0.0, -s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about +Z by `angle` radians
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            c, s, 0.0, 0.0,
            -s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about an arbitrary unit `axis` (Rodrigues form)
    ///
    /// The axis is not re-normalized.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self::from_cols_array([
            t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0,
            t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0,
            t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation whose columns are the given body axes
    ///
    /// Maps local +X/+Y/+Z onto `right`/`up`/`forward`. The axes are used as
    /// given, orthogonal or not.
    pub const fn from_basis(right: Vec3, up: Vec3, forward: Vec3) -> Self {
        Self::from_cols_array([
            right.x, right.y, right.z, 0.0,
            up.x, up.y, up.z, 0.0,
            forward.x, forward.y, forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Matrix product `self · other` (`other` is applied first)
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.at(row, k) * other.at(k, col)).sum();
            }
        }
        Self::from_cols_array(out)
    }

    /// Append a translation (acts before everything already in `self`)
    #[must_use]
    pub fn translate(&self, tx: f32, ty: f32, tz: f32) -> Self {
        self.multiply(&Self::translation(tx, ty, tz))
    }

    /// Append a rotation about +X
    #[must_use]
    pub fn rotate_x(&self, angle: f32) -> Self {
        self.multiply(&Self::rotation_x(angle))
    }

    /// Append a rotation about +Y
    #[must_use]
    pub fn rotate_y(&self, angle: f32) -> Self {
        self.multiply(&Self::rotation_y(angle))
    }

    /// Append a rotation about a unit axis
    #[must_use]
    pub fn rotate_axis(&self, axis: Vec3, angle: f32) -> Self {
        self.multiply(&Self::from_axis_angle(axis, angle))
    }

    /// Append a non-uniform scale
    #[must_use]
    pub fn scale(&self, sx: f32, sy: f32, sz: f32) -> Self {
        self.multiply(&Self::scaling(sx, sy, sz))
    }

    /// Transpose
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[row * 4 + col] = self.m[col * 4 + row];
            }
        }
        Self::from_cols_array(out)
    }

    /// Determinant
    pub fn determinant(&self) -> f32 {
        let minors = Minors::of(self);
        minors.determinant()
    }

    /// Inverse via the adjugate
    ///
    /// The caller guarantees invertibility: transforms built from rotations,
    /// translations and non-zero scales always are. A singular input divides
    /// by a zero determinant and produces non-finite elements.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let a = |row, col| self.at(row, col);
        let minors = Minors::of(self);
        let inv_det = 1.0 / minors.determinant();
        let Minors { s, c } = minors;

        // (row, col) of the inverse
        let mut out = Self::identity();
        let mut set = |row: usize, col: usize, value: f32| out.m[col * 4 + row] = value * inv_det;

        set(0, 0, a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3]);
        set(0, 1, -a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3]);
        set(0, 2, a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3]);
        set(0, 3, -a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3]);

        set(1, 0, -a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1]);
        set(1, 1, a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1]);
        set(1, 2, -a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1]);
        set(1, 3, a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1]);

        set(2, 0, a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0]);
        set(2, 1, -a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0]);
        set(2, 2, a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0]);
        set(2, 3, -a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0]);

        set(3, 0, -a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0]);
        set(3, 1, a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0]);
        set(3, 2, -a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0]);
        set(3, 3, a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0]);

        out
    }

    /// Transform a point (w = 1), with perspective divide when w != 1
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let x = self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3);
        let y = self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3);
        let z = self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3);
        let w = self.at(3, 0) * p.x + self.at(3, 1) * p.y + self.at(3, 2) * p.z + self.at(3, 3);
        if w == 1.0 || w == 0.0 {
            Vec3::new(x, y, z)
        } else {
            Vec3::new(x / w, y / w, z / w)
        }
    }

    /// Transform a direction (w = 0); translation is ignored
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z,
            self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z,
            self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z,
        )
    }

    /// Perspective frustum projection (glFrustum form)
    ///
    /// `near` and `far` are positive distances along the view direction.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;
        Self::from_cols_array([
            2.0 * near / width, 0.0, 0.0, 0.0,
            0.0, 2.0 * near / height, 0.0, 0.0,
            (right + left) / width, (top + bottom) / height, -(far + near) / depth, -1.0,
            0.0, 0.0, -2.0 * far * near / depth, 0.0,
        ])
    }

    /// Orthographic projection (glOrtho form)
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;
        Self::from_cols_array([
            2.0 / width, 0.0, 0.0, 0.0,
            0.0, 2.0 / height, 0.0, 0.0,
            0.0, 0.0, -2.0 / depth, 0.0,
            -(right + left) / width, -(top + bottom) / height, -(far + near) / depth, 1.0,
        ])
    }

    /// Look-at view matrix
    ///
    /// Builds the camera basis `n = eye - target`, `u = up × n`, `v = n × u`
    /// and composes `R · T(-eye)` with `u`, `v`, `n` as the rows of `R`.
    ///
    /// # Errors
    /// [`MathError::DegenerateVector`] when `eye == target` or `up` is
    /// parallel to the viewing direction.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> MathResult<Self> {
        let n = (eye - target).normalize()?;
        let u = up.cross(n).normalize()?;
        let v = n.cross(u);

        let rotation = Self::from_cols_array([
            u.x, v.x, n.x, 0.0,
            u.y, v.y, n.y, 0.0,
            u.z, v.z, n.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        Ok(rotation.translate(-eye.x, -eye.y, -eye.z))
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// 2x2 sub-determinants of the upper (`s`) and lower (`c`) row pairs
#[derive(Clone, Copy)]
struct Minors {
    s: [f32; 6],
    c: [f32; 6],
}

impl Minors {
    fn of(m: &Mat4) -> Self {
        let a = |row, col| m.at(row, col);
        let s = [
            a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1),
            a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2),
            a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3),
            a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2),
            a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3),
            a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3),
        ];
        let c = [
            a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1),
            a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2),
            a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3),
            a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2),
            a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3),
            a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3),
        ];
        Self { s, c }
    }

    fn determinant(self) -> f32 {
        let Self { s, c } = self;
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn sample_transform() -> Mat4 {
        Mat4::translation(3.0, -2.0, 5.0)
            .rotate_axis(Vec3::new(1.0, 2.0, 2.0).scaled(1.0 / 3.0), 0.7)
            .scale(2.0, 0.5, 1.5)
    }

    fn to_nalgebra(m: &Mat4) -> nalgebra::Matrix4<f32> {
        nalgebra::Matrix4::from_column_slice(&m.to_cols_array())
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        assert_eq!(Vec3::ZERO.normalize(), Err(MathError::DegenerateVector));
    }

    #[test]
    fn test_normalize_produces_unit_length() {
        let v = Vec3::new(3.0, 0.0, 4.0).normalize().unwrap();
        assert_relative_eq!(v, Vec3::new(0.6, 0.0, 0.8), epsilon = EPSILON);
        assert_relative_eq!(v.length(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_cross_is_right_handed() {
        assert_relative_eq!(Vec3::UNIT_X.cross(Vec3::UNIT_Y), Vec3::UNIT_Z);
        assert_relative_eq!(Vec3::UNIT_Y.cross(Vec3::UNIT_Z), Vec3::UNIT_X);
        assert_relative_eq!(Vec3::UNIT_Z.cross(Vec3::UNIT_X), Vec3::UNIT_Y);
    }

    #[test]
    fn test_identity_is_multiplicative_unit() {
        let m = sample_transform();
        assert_eq!(Mat4::identity() * m, m);
        assert_eq!(m * Mat4::identity(), m);
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        // Scale then translate: the point is scaled about the origin first
        let m = Mat4::translation(10.0, 0.0, 0.0) * Mat4::scaling(2.0, 2.0, 2.0);
        assert_relative_eq!(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(12.0, 0.0, 0.0));

        // Translate then scale: the offset gets scaled too
        let m = Mat4::scaling(2.0, 2.0, 2.0) * Mat4::translation(10.0, 0.0, 0.0);
        assert_relative_eq!(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(22.0, 0.0, 0.0));
    }

    #[test]
    fn test_helpers_right_multiply() {
        let base = Mat4::rotation_y(0.3);
        assert_eq!(base.translate(1.0, 2.0, 3.0), base * Mat4::translation(1.0, 2.0, 3.0));
        assert_eq!(base.scale(1.0, 2.0, 3.0), base * Mat4::scaling(1.0, 2.0, 3.0));
        assert_eq!(base.rotate_x(0.4), base * Mat4::rotation_x(0.4));
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = sample_transform();
        let b = Mat4::rotation_z(1.1).translate(-4.0, 0.5, 2.0);
        let expected = to_nalgebra(&a) * to_nalgebra(&b);
        let actual = a * b;
        for (x, y) in actual.to_cols_array().iter().zip(expected.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_inverse_matches_nalgebra() {
        let m = sample_transform();
        let expected = to_nalgebra(&m).try_inverse().unwrap();
        for (x, y) in m.inverse().to_cols_array().iter().zip(expected.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample_transform();
        assert_relative_eq!(m.inverse().inverse(), m, epsilon = 1e-4);
        assert_relative_eq!(m * m.inverse(), Mat4::identity(), epsilon = 1e-5);
    }

    #[test]
    fn test_determinant_of_scale() {
        assert_relative_eq!(Mat4::scaling(2.0, 3.0, 4.0).determinant(), 24.0);
        assert_relative_eq!(Mat4::rotation_x(0.8).determinant(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_transpose_twice_is_identity_operation() {
        let m = sample_transform();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().at(0, 3), m.at(3, 0));
    }

    #[test]
    fn test_axis_rotation_matches_fixed_axis_rotations() {
        assert_relative_eq!(Mat4::from_axis_angle(Vec3::UNIT_X, 0.5), Mat4::rotation_x(0.5), epsilon = EPSILON);
        assert_relative_eq!(Mat4::from_axis_angle(Vec3::UNIT_Y, 0.5), Mat4::rotation_y(0.5), epsilon = EPSILON);
        assert_relative_eq!(Mat4::from_axis_angle(Vec3::UNIT_Z, 0.5), Mat4::rotation_z(0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // Right-handed: +X rotated 90 degrees about +Y lands on -Z
        let rotated = Mat4::rotation_y(FRAC_PI_2).transform_vector(Vec3::UNIT_X);
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_from_basis_maps_local_axes() {
        let right = Vec3::new(0.0, 0.0, -1.0);
        let up = Vec3::UNIT_Y;
        let forward = Vec3::UNIT_X;
        let m = Mat4::from_basis(right, up, forward);
        assert_relative_eq!(m.transform_vector(Vec3::UNIT_X), right);
        assert_relative_eq!(m.transform_vector(Vec3::UNIT_Z), forward);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(1.0, 0.0, -4.0);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::UNIT_Y).unwrap();
        assert_relative_eq!(view.transform_point(eye), Vec3::ZERO, epsilon = EPSILON);

        // The target sits straight ahead on -Z in view space
        let target = view.transform_point(Vec3::ZERO);
        assert_relative_eq!(target.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(target.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(target.z, -eye.length(), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_rejects_coincident_eye_and_target() {
        let eye = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(Mat4::look_at(eye, eye, Vec3::UNIT_Y), Err(MathError::DegenerateVector));
    }

    #[test]
    fn test_frustum_maps_near_and_far_planes() {
        let p = Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 80.0);
        assert_relative_eq!(p.transform_point(Vec3::new(0.0, 0.0, -1.0)).z, -1.0, epsilon = EPSILON);
        assert_relative_eq!(p.transform_point(Vec3::new(0.0, 0.0, -80.0)).z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_orthographic_maps_box_corners() {
        let p = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 11.0);
        assert_relative_eq!(p.transform_point(Vec3::new(2.0, 1.0, -1.0)), Vec3::new(1.0, 1.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(p.transform_point(Vec3::new(-2.0, -1.0, -11.0)), Vec3::new(-1.0, -1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_vec3_serializes_as_array() {
        let text = ron::to_string(&Vec3::new(1.0, 2.5, -3.0)).unwrap();
        assert_eq!(text, "(1.0,2.5,-3.0)");
        let parsed: Vec3 = ron::from_str("(3.0, 4.0, 4.0)").unwrap();
        assert_eq!(parsed, Vec3::new(3.0, 4.0, 4.0));
    }
}
