//! Ship kinematics
//!
//! The ship carries its own body axes and turns them a little every frame
//! with quaternions built from the current impulses. There is no persistent
//! orientation quaternion; the axes are the orientation.

use flight_engine::foundation::math::{Mat4, MathResult, Vec3};
use flight_engine::foundation::quaternion::Quat;

use crate::config::ShipConfig;
use crate::controls::ControlInput;

/// Body axes in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Local +X
    pub right: Vec3,
    /// Local +Y
    pub up: Vec3,
    /// Local +Z, the direction of travel
    pub forward: Vec3,
}

impl Basis {
    /// World-aligned axes
    pub const WORLD: Self = Self { right: Vec3::UNIT_X, up: Vec3::UNIT_Y, forward: Vec3::UNIT_Z };

    /// Rescale each axis to unit length
    pub fn normalized(self) -> MathResult<Self> {
        Ok(Self { right: self.right.normalize()?, up: self.up.normalize()?, forward: self.forward.normalize()? })
    }

    /// Gram-Schmidt with `forward` as the anchor
    ///
    /// Keeps `forward`, rebuilds `right` from `up × forward` and `up` from
    /// `forward × right`. Expects unit axes.
    pub fn orthonormalized(self) -> MathResult<Self> {
        let right = self.up.cross(self.forward).normalize()?;
        let up = self.forward.cross(right);
        Ok(Self { right, up, forward: self.forward })
    }

    /// Largest absolute dot product between two different axes
    pub fn skew(&self) -> f32 {
        self.right
            .dot(self.up)
            .abs()
            .max(self.up.dot(self.forward).abs())
            .max(self.forward.dot(self.right).abs())
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Position, axes and throttle of the ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipState {
    /// World position
    pub position: Vec3,
    /// Body axes
    pub basis: Basis,
    /// Units per frame, within `[0, max_speed]`
    pub speed: f32,
    /// Decaying rotation about `forward` (radians per frame)
    pub pitch_impulse: f32,
    /// Decaying rotation about `right` (radians per frame)
    pub roll_impulse: f32,
}

impl ShipState {
    /// The state at start and after every reset
    pub const fn initial(config: &ShipConfig) -> Self {
        Self {
            position: config.initial_position,
            basis: Basis::WORLD,
            speed: 0.0,
            pitch_impulse: 0.0,
            roll_impulse: 0.0,
        }
    }

    /// Advance one frame
    ///
    /// # Errors
    /// [`MathError::DegenerateVector`](flight_engine::foundation::math::MathError::DegenerateVector)
    /// if an axis collapses to zero length. Unit axes rotated by unit
    /// quaternions cannot do that, so an error means the state was corrupt.
    pub fn update(&mut self, input: &ControlInput, config: &ShipConfig) -> MathResult<()> {
        let step = config.steer_increment;
        if input.pitch_left {
            self.pitch_impulse -= step;
        }
        if input.pitch_right {
            self.pitch_impulse += step;
        }
        if input.roll_up {
            self.roll_impulse -= step;
        }
        if input.roll_down {
            self.roll_impulse += step;
        }
        self.pitch_impulse *= config.impulse_decay;
        self.roll_impulse *= config.impulse_decay;

        if input.thrust {
            self.speed += config.acceleration;
        }
        if input.brake {
            self.speed -= config.deceleration;
        }
        self.speed = self.speed.clamp(0.0, config.max_speed);

        // Order matters: roll turns about the right axis as already pitched
        let Basis { right, up, forward } = self.basis;
        let right = Quat::rotate_about(forward, self.pitch_impulse, right);
        let up = Quat::rotate_about(forward, self.pitch_impulse, up);
        let up = Quat::rotate_about(right, self.roll_impulse, up);
        let forward = Quat::rotate_about(right, self.roll_impulse, forward);

        let mut basis = Basis { right, up, forward }.normalized()?;
        if config.reorthogonalize {
            basis = basis.orthonormalized()?;
        }
        self.basis = basis;

        self.position += self.basis.forward * self.speed;
        Ok(())
    }

    /// Instance transform `translation(position) · axes`
    pub fn model_matrix(&self) -> Mat4 {
        let p = self.position;
        Mat4::translation(p.x, p.y, p.z) * Mat4::from_basis(self.basis.right, self.basis.up, self.basis.forward)
    }
}
