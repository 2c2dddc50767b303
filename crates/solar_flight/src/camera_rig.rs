//! Chase camera
//!
//! The camera hangs off the ship at an offset given in the ship's own frame.
//! Each frame the world-space offset moves a fixed fraction of the way
//! towards its target, which gives the lag when the ship turns.

use flight_engine::foundation::math::Vec3;
use flight_engine::render::{CameraPose, ProjectionMode};

use crate::config::CameraConfig;
use crate::ship::{Basis, ShipState};

/// Camera following the ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    offset: Vec3,
    eye: Vec3,
    target: Vec3,
    up: Vec3,
}

impl ChaseCamera {
    /// Camera already at rest behind `ship`
    pub fn behind(ship: &ShipState, mode: ProjectionMode, config: &CameraConfig) -> Self {
        let offset = world_offset(&ship.basis, local_offset(mode, config));
        Self { offset, eye: ship.position + offset, target: ship.position, up: ship.basis.up }
    }

    /// Move one smoothing step towards the ship
    ///
    /// Perspective uses the third-person offset, orthographic the
    /// near-cockpit one.
    pub fn update(&mut self, ship: &ShipState, mode: ProjectionMode, config: &CameraConfig) {
        let wanted = world_offset(&ship.basis, local_offset(mode, config));
        self.offset += (wanted - self.offset) * config.smoothing;
        self.eye = ship.position + self.offset;
        self.target = ship.position;
        self.up = ship.basis.up;
    }

    /// Jump straight to the rest position, skipping the lag
    pub fn snap(&mut self, ship: &ShipState, mode: ProjectionMode, config: &CameraConfig) {
        *self = Self::behind(ship, mode, config);
        log::debug!("Camera snapped to {:?}", self.eye);
    }

    /// Smoothed world-space offset from the ship
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Pose for this frame's view matrix
    pub const fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye, self.target, self.up)
    }
}

const fn local_offset(mode: ProjectionMode, config: &CameraConfig) -> Vec3 {
    match mode {
        ProjectionMode::Perspective => config.chase_offset,
        ProjectionMode::Orthographic => config.cockpit_offset,
    }
}

fn world_offset(basis: &Basis, local: Vec3) -> Vec3 {
    basis.right * local.x + basis.up * local.y + basis.forward * local.z
}
