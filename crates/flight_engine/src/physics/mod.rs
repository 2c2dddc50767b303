//! Physics module
//!
//! Proximity tests only: hazards and pickups are spheres around a point, and
//! a hit is a distance comparison. There is no rigid-body response.

pub mod collision;

pub use collision::{beyond, within, BoundingSphere};
