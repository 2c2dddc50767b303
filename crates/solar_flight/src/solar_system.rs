//! Sun, planets and the play area
//!
//! Planets move on circles in the XZ plane around a fixed sun. Orbits are
//! pure functions of the phase; nothing here integrates velocities.

use std::fmt;

use flight_engine::foundation::math::Vec3;
use flight_engine::physics::{within, BoundingSphere};
use flight_engine::render::Surface;

use crate::config::{PlanetConfig, SolarSystemConfig};

/// A body on a circular orbit around the origin
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    /// Display name
    pub name: String,
    /// Distance from the origin; `0` for the sun
    pub orbit_radius: f32,
    /// Current angle (radians), only ever increases
    pub phase: f32,
    /// Phase advance per frame
    pub phase_step: f32,
    /// Visual radius
    pub radius: f32,
    /// Collision distance from the centre
    pub hazard_radius: f32,
    /// Texture or color
    pub surface: Surface,
}

impl OrbitingBody {
    /// Body at phase zero
    pub fn from_config(planet: &PlanetConfig) -> Self {
        Self {
            name: planet.name.clone(),
            orbit_radius: planet.orbit_radius,
            phase: 0.0,
            phase_step: planet.phase_step,
            radius: planet.radius,
            hazard_radius: planet.hazard_radius,
            surface: Surface::Textured { url: planet.texture.clone(), fallback: planet.color },
        }
    }

    /// Step the phase forward one frame
    pub fn advance(&mut self) {
        self.phase += self.phase_step;
    }

    /// Centre in world space: `(r·sin φ, 0, r·cos φ)`
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.phase.sin_cos();
        Vec3::new(self.orbit_radius * sin, 0.0, self.orbit_radius * cos)
    }

    /// Collision volume at the current phase
    pub fn hazard(&self) -> BoundingSphere {
        BoundingSphere::new(self.position(), self.hazard_radius)
    }
}

/// What the ship ran into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hazard {
    /// The sun
    Sun,
    /// A planet, by name
    Planet(String),
    /// Flew out of the play area
    Boundary,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sun => write!(f, "the sun"),
            Self::Planet(name) => write!(f, "{name}"),
            Self::Boundary => write!(f, "the edge of the system"),
        }
    }
}

/// The sun, its planets and the boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystem {
    /// The sun, spinning in place at the origin
    pub sun: OrbitingBody,
    /// Planets in config order
    pub planets: Vec<OrbitingBody>,
    /// Play area radius
    pub boundary: BoundingSphere,
}

impl SolarSystem {
    /// Build the system with every phase at zero
    pub fn from_config(config: &SolarSystemConfig) -> Self {
        let sun = OrbitingBody {
            name: "sun".to_string(),
            orbit_radius: 0.0,
            phase: 0.0,
            phase_step: config.sun_spin_step,
            radius: config.sun_radius,
            hazard_radius: config.sun_hazard_radius(),
            surface: Surface::Textured { url: config.sun_texture.clone(), fallback: config.sun_color },
        };
        Self {
            sun,
            planets: config.planets.iter().map(OrbitingBody::from_config).collect(),
            boundary: BoundingSphere::new(Vec3::ZERO, config.boundary_radius),
        }
    }

    /// Advance every body one frame
    pub fn advance(&mut self) {
        self.sun.advance();
        for planet in &mut self.planets {
            planet.advance();
        }
    }

    /// Put every body back at phase zero
    pub fn reset(&mut self) {
        self.sun.phase = 0.0;
        for planet in &mut self.planets {
            planet.phase = 0.0;
        }
    }

    /// Every body, sun first
    pub fn bodies(&self) -> impl Iterator<Item = &OrbitingBody> {
        std::iter::once(&self.sun).chain(&self.planets)
    }

    /// First hazard `position` is in, if any
    ///
    /// Checked in order: sun, planets, boundary. Distances exactly at a
    /// threshold are safe.
    pub fn hazard_at(&self, position: Vec3) -> Option<Hazard> {
        if within(position, self.sun.position(), self.sun.hazard_radius) {
            return Some(Hazard::Sun);
        }
        if let Some(planet) = self.planets.iter().find(|p| p.hazard().contains(position)) {
            return Some(Hazard::Planet(planet.name.clone()));
        }
        if self.boundary.excludes(position) {
            return Some(Hazard::Boundary);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn system() -> SolarSystem {
        SolarSystem::from_config(&SolarSystemConfig::default())
    }

    #[test]
    fn test_orbit_position_follows_phase() {
        let mut earth = system().planets[2].clone();
        assert_eq!(earth.name, "earth");
        assert_relative_eq!(earth.position(), Vec3::new(0.0, 0.0, 25.0));

        earth.phase = FRAC_PI_2;
        assert_relative_eq!(earth.position(), Vec3::new(25.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_advance_is_monotone_and_reset_zeroes() {
        let mut system = system();
        for _ in 0..3 {
            system.advance();
        }
        assert_relative_eq!(system.planets[0].phase, 0.03, epsilon = 1e-6);
        assert!(system.sun.phase > 0.0);

        system.reset();
        assert!(system.bodies().all(|body| body.phase == 0.0));
    }

    #[test]
    fn test_sun_hazard_is_strict() {
        let system = system();
        assert_eq!(system.hazard_at(Vec3::ZERO), Some(Hazard::Sun));
        assert_eq!(system.hazard_at(Vec3::new(0.0, 6.99, 0.0)), Some(Hazard::Sun));
        assert_eq!(system.hazard_at(Vec3::new(0.0, 7.0, 0.0)), None);
    }

    #[test]
    fn test_planet_and_boundary_hazards() {
        let system = system();
        let mercury = system.planets[0].position();
        assert_eq!(system.hazard_at(mercury + Vec3::new(0.0, 1.0, 0.0)), Some(Hazard::Planet("mercury".to_string())));
        assert_eq!(system.hazard_at(Vec3::new(0.0, 80.0, 0.0)), None);
        assert_eq!(system.hazard_at(Vec3::new(0.0, 81.0, 0.0)), Some(Hazard::Boundary));
    }

    #[test]
    fn test_planet_hazard_is_strict() {
        let system = system();
        let mercury = &system.planets[0];
        let centre = mercury.position();
        let edge = Vec3::new(0.0, mercury.hazard_radius, 0.0);

        assert_eq!(system.hazard_at(centre + edge), None);
        assert_eq!(system.hazard_at(centre + edge.scaled(0.999)), Some(Hazard::Planet("mercury".to_string())));
    }

    #[test]
    fn test_bodies_lists_sun_first() {
        let names: Vec<_> = system().bodies().map(|b| b.name.clone()).collect();
        assert_eq!(names, ["sun", "mercury", "venus", "earth", "mars"]);
    }
}
