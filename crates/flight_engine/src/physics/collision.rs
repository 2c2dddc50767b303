//! Distance-based collision primitives

use crate::foundation::math::Vec3;

/// Whether `a` and `b` are strictly closer than `threshold`
///
/// A distance exactly equal to the threshold is not a hit.
pub fn within(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance(b) < threshold
}

/// Whether `point` is strictly farther than `radius` from `centre`
pub fn beyond(point: Vec3, centre: Vec3, radius: f32) -> bool {
    point.distance(centre) > radius
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies strictly inside the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        within(point, self.center, self.radius)
    }

    /// Whether `point` lies strictly outside the sphere
    pub fn excludes(&self, point: Vec3) -> bool {
        beyond(point, self.center, self.radius)
    }
}
