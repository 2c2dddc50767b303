//! Collectible rings

use flight_engine::foundation::math::Vec3;
use flight_engine::physics::within;
use rand::Rng;

use crate::config::RingsConfig;

/// Scatter `count` rings uniformly in the spawn cube
///
/// Candidates closer than `min_distance` to the origin are redrawn, so every
/// ring keeps clear of the sun.
pub fn generate_rings<R: Rng + ?Sized>(count: usize, config: &RingsConfig, min_distance: f32, rng: &mut R) -> Vec<Vec3> {
    let extent = config.spawn_extent;
    let mut rings = Vec::with_capacity(count);
    let mut rejected = 0_usize;
    while rings.len() < count {
        let candidate = Vec3::new(
            rng.gen_range(-extent..=extent),
            rng.gen_range(-extent..=extent),
            rng.gen_range(-extent..=extent),
        );
        if candidate.length() >= min_distance {
            rings.push(candidate);
        } else {
            rejected += 1;
        }
    }
    log::debug!("Placed {count} rings ({rejected} candidates too close to the sun)");
    rings
}

/// Result of one pickup check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collection {
    /// Rings picked up by this check
    pub picked_up: usize,
    /// Whether the field is now empty
    pub completed: bool,
}

/// The rings of the current round
#[derive(Debug, Clone, PartialEq)]
pub struct RingField {
    active: Vec<Vec3>,
    total: usize,
    collected: usize,
}

impl RingField {
    /// Fresh field of `config.count` rings
    pub fn generate<R: Rng + ?Sized>(config: &RingsConfig, min_distance: f32, rng: &mut R) -> Self {
        Self::from_positions(generate_rings(config.count, config, min_distance, rng))
    }

    /// Field with rings at exactly `positions`
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { total: positions.len(), collected: 0, active: positions }
    }

    /// Rings still in play
    pub fn active(&self) -> &[Vec3] {
        &self.active
    }

    /// Rings in the round
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Rings picked up so far
    pub const fn collected(&self) -> usize {
        self.collected
    }

    /// Pick up every ring strictly within `threshold` of `position`
    pub fn collect_near(&mut self, position: Vec3, threshold: f32) -> Collection {
        let before = self.active.len();
        self.active.retain(|ring| !within(position, *ring, threshold));
        let picked_up = before - self.active.len();
        self.collected += picked_up;
        if picked_up > 0 {
            log::debug!("Collected {picked_up} ring(s), {}/{}", self.collected, self.total);
        }
        Collection { picked_up, completed: picked_up > 0 && self.active.is_empty() }
    }
}
