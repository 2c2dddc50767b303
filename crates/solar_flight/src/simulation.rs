//! Simulation step and reset
//!
//! A step runs in a fixed order: toggles, ship kinematics, orbits, hazards,
//! rings, camera. A crash or a completed round resets the world inside the
//! same step, so the state handed back is always playable.

use std::rc::Rc;

use flight_engine::foundation::math::MathResult;
use flight_engine::render::ProjectionMode;
use rand::Rng;

use crate::camera_rig::ChaseCamera;
use crate::config::GameConfig;
use crate::controls::ControlInput;
use crate::rings::RingField;
use crate::scene::ShipDesign;
use crate::ship::ShipState;
use crate::solar_system::{Hazard, SolarSystem};

/// Something that happened during a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// At least one ring was picked up
    RingCollected {
        /// Rings picked up this round, including this step's
        collected: usize,
        /// Rings in the round
        total: usize,
    },
    /// The ship hit something; the world was reset
    Crashed {
        /// What it hit
        hazard: Hazard,
    },
    /// The last ring was picked up; the world was reset
    Completed,
}

/// Events of one step, in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Events in order
    pub events: Vec<SceneEvent>,
    /// Whether the step ended in a reset
    pub reset: bool,
}

impl StepReport {
    /// Whether the ship crashed this step
    pub fn crashed(&self) -> bool {
        self.events.iter().any(|e| matches!(e, SceneEvent::Crashed { .. }))
    }

    /// Whether the round was completed this step
    pub fn completed(&self) -> bool {
        self.events.contains(&SceneEvent::Completed)
    }
}

/// Whole game world
#[derive(Debug, Clone)]
pub struct SimulationState {
    config: Rc<GameConfig>,
    ship: ShipState,
    camera: ChaseCamera,
    system: SolarSystem,
    rings: RingField,
    projection: ProjectionMode,
    design: ShipDesign,
    frame: u64,
    resets: u32,
}

impl SimulationState {
    /// World at its starting point, with freshly placed rings
    pub fn new<R: Rng + ?Sized>(config: Rc<GameConfig>, rng: &mut R) -> Self {
        let ship = ShipState::initial(&config.ship);
        let projection = config.projection.initial;
        let camera = ChaseCamera::behind(&ship, projection, &config.camera);
        let system = SolarSystem::from_config(&config.solar_system);
        let rings = RingField::generate(&config.rings, config.solar_system.sun_hazard_radius(), rng);
        let design = config.ship.design;
        Self { config, ship, camera, system, rings, projection, design, frame: 0, resets: 0 }
    }

    /// Advance one frame
    ///
    /// # Errors
    /// Only if the ship's axes degenerate, which a valid state never does.
    pub fn step<R: Rng + ?Sized>(mut self, input: &ControlInput, rng: &mut R) -> MathResult<(Self, StepReport)> {
        let config = Rc::clone(&self.config);
        let mut report = StepReport::default();
        self.frame += 1;

        if input.toggle_projection {
            self.projection = self.projection.toggled();
            log::debug!("Projection now {:?}", self.projection);
        }
        if input.toggle_design {
            self.design = self.design.toggled();
            log::debug!("Ship design now {:?}", self.design);
        }

        self.ship.update(input, &config.ship)?;
        self.system.advance();

        if let Some(hazard) = self.system.hazard_at(self.ship.position) {
            log::info!("Crashed into {hazard} at frame {}", self.frame);
            report.events.push(SceneEvent::Crashed { hazard });
            self.reset(rng);
            report.reset = true;
            return Ok((self, report));
        }

        let collection = self.rings.collect_near(self.ship.position, config.rings.collect_radius);
        if collection.picked_up > 0 {
            report.events.push(SceneEvent::RingCollected {
                collected: self.rings.collected(),
                total: self.rings.total(),
            });
        }
        if collection.completed {
            log::info!("All {} rings collected at frame {}", self.rings.total(), self.frame);
            report.events.push(SceneEvent::Completed);
            self.reset(rng);
            report.reset = true;
            return Ok((self, report));
        }

        self.camera.update(&self.ship, self.projection, &config.camera);
        Ok((self, report))
    }

    /// Put the world back at its starting point
    ///
    /// Lens and ship design are player choices and carry over.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = &self.config;
        self.ship = ShipState::initial(&config.ship);
        self.system.reset();
        self.rings = RingField::generate(&config.rings, config.solar_system.sun_hazard_radius(), rng);
        self.camera.snap(&self.ship, self.projection, &config.camera);
        self.resets += 1;
        log::debug!("World reset ({} so far)", self.resets);
    }

    /// Settings the world was built from
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The ship
    pub const fn ship(&self) -> &ShipState {
        &self.ship
    }

    /// The ship, for scripted placement
    pub fn ship_mut(&mut self) -> &mut ShipState {
        &mut self.ship
    }

    /// The chase camera
    pub const fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    /// Sun and planets
    pub const fn system(&self) -> &SolarSystem {
        &self.system
    }

    /// Rings of the current round
    pub const fn rings(&self) -> &RingField {
        &self.rings
    }

    /// Active lens
    pub const fn projection_mode(&self) -> ProjectionMode {
        self.projection
    }

    /// Ship model in use
    pub const fn design(&self) -> ShipDesign {
        self.design
    }

    /// Steps taken
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Resets so far
    pub const fn resets(&self) -> u32 {
        self.resets
    }
}
