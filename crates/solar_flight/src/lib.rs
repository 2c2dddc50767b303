//! # Solar Flight
//!
//! Fly a small ship through a procedural solar system and pick up every
//! ring without touching the sun, a planet or the edge of the system.
//!
//! ## Controls
//!
//! | Key     | Action                          |
//! |---------|---------------------------------|
//! | `a`/`d` | pitch impulse                   |
//! | `w`/`s` | roll impulse                    |
//! | space   | thrust                          |
//! | `x`     | brake                           |
//! | `c`     | switch chase / cockpit lens     |
//! | `1`     | switch ship model               |
//!
//! Bindings and every tuning value live in `config/solar_flight.toml`.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod app;
pub mod camera_rig;
pub mod config;
pub mod controls;
pub mod hud;
pub mod rings;
pub mod scene;
pub mod ship;
pub mod simulation;
pub mod solar_system;

#[cfg(test)]
mod tests;

pub use app::{demo_clock, RunStats, SolarFlightApp};
pub use config::GameConfig;
pub use simulation::{SceneEvent, SimulationState, StepReport};
