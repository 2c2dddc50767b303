//! # Camera and projection
//!
//! View and projection matrices for the immediate-mode renderer.
//!
//! ## Coordinate System
//! Right-handed, Y-up view space with the camera looking down -Z. Clip
//! space follows the OpenGL convention (depth in [-1, 1]).
//!
//! A camera is split into a [`CameraPose`] (where it is and what it looks at,
//! recomputed every frame by whoever drives it) and a [`Projection`] (which
//! lens is in use, toggled by the player).

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, MathResult, Vec3};

/// View volume bounds
///
/// `near` and `far` are positive distances in front of the camera.
/// `left`/`right`/`bottom`/`top` are measured on the near plane for a
/// perspective frustum and are the box sides for an orthographic one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    /// Left bound
    pub left: f32,
    /// Right bound
    pub right: f32,
    /// Bottom bound
    pub bottom: f32,
    /// Top bound
    pub top: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self { left: -1.0, right: 1.0, bottom: -1.0, top: 1.0, near: 1.0, far: 200.0 }
    }
}

impl Frustum {
    /// Symmetric volume with half-extents `half_width` and `half_height`
    pub const fn symmetric(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self { left: -half_width, right: half_width, bottom: -half_height, top: half_height, near, far }
    }
}

/// Which projection is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Perspective frustum, used with the third-person chase view
    #[default]
    Perspective,
    /// Parallel projection, used with the near-cockpit view
    Orthographic,
}

impl ProjectionMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Perspective => Self::Orthographic,
            Self::Orthographic => Self::Perspective,
        }
    }
}

/// A pair of lenses and the one currently in use
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    /// Active lens
    pub mode: ProjectionMode,
    /// Bounds used in perspective mode
    pub perspective: Frustum,
    /// Bounds used in orthographic mode
    pub orthographic: Frustum,
}

impl Projection {
    /// Create a projection starting in `mode`
    pub const fn new(mode: ProjectionMode, perspective: Frustum, orthographic: Frustum) -> Self {
        Self { mode, perspective, orthographic }
    }

    /// Projection matrix for the active lens
    pub fn matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => {
                let f = self.perspective;
                Mat4::frustum(f.left, f.right, f.bottom, f.top, f.near, f.far)
            }
            ProjectionMode::Orthographic => {
                let f = self.orthographic;
                Mat4::orthographic(f.left, f.right, f.bottom, f.top, f.near, f.far)
            }
        }
    }

    /// Same lenses with the other one active
    #[must_use]
    pub fn toggled(&self) -> Self {
        let toggled = Self { mode: self.mode.toggled(), ..*self };
        log::debug!("Projection switched {:?} -> {:?}", self.mode, toggled.mode);
        toggled
    }
}

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space
    pub eye: Vec3,
    /// Point looked at in world space
    pub target: Vec3,
    /// Approximate up direction; need not be orthogonal to the view
    pub up: Vec3,
}

impl CameraPose {
    /// Create a pose
    pub const fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// World-to-view transform
    ///
    /// # Errors
    /// [`MathError::DegenerateVector`](crate::foundation::math::MathError::DegenerateVector)
    /// when the eye sits on the target or `up` is parallel to the view
    /// direction. Both mean the driver of this camera is broken, so no
    /// fallback orientation is invented.
    pub fn view_matrix(&self) -> MathResult<Mat4> {
        Mat4::look_at(self.eye, self.target, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_mode_toggle_round_trip() {
        assert_eq!(ProjectionMode::Perspective.toggled(), ProjectionMode::Orthographic);
        assert_eq!(ProjectionMode::Perspective.toggled().toggled(), ProjectionMode::Perspective);
    }

    #[test]
    fn test_matrix_follows_mode() {
        let perspective = Projection::default();
        let orthographic = perspective.toggled();
        let f = Frustum::default();
        assert_eq!(perspective.matrix(), Mat4::frustum(f.left, f.right, f.bottom, f.top, f.near, f.far));
        assert_eq!(orthographic.matrix(), Mat4::orthographic(f.left, f.right, f.bottom, f.top, f.near, f.far));
        // A perspective matrix has -1 in the w row of the z column
        assert_relative_eq!(perspective.matrix().at(3, 2), -1.0);
        assert_relative_eq!(orthographic.matrix().at(3, 3), 1.0);
    }

    #[test]
    fn test_view_matrix_degenerate_pose() {
        let pose = CameraPose::new(Vec3::ONE, Vec3::ONE, Vec3::UNIT_Y);
        assert_eq!(pose.view_matrix(), Err(MathError::DegenerateVector));

        let straight_down = CameraPose::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::UNIT_Y);
        assert_eq!(straight_down.view_matrix(), Err(MathError::DegenerateVector));
    }

    #[test]
    fn test_frustum_deserializes_from_toml() {
        let text = "left = -2.0\nright = 2.0\nbottom = -1.0\ntop = 1.0\nnear = 0.5\nfar = 50.0\n";
        let frustum: Frustum = toml::from_str(text).unwrap();
        assert_eq!(frustum, Frustum::symmetric(2.0, 1.0, 0.5, 50.0));
    }
}
