//! Per-frame drawable list
//!
//! Rebuilt from scratch every frame out of the simulation state. Transform
//! chains read left to right in the order they are multiplied, so the last
//! call in a chain is applied to the mesh first.

use flight_engine::foundation::math::{Mat4, Vec3};
use flight_engine::render::{Drawable, ShapeKind, Surface};
use serde::{Deserialize, Serialize};

use crate::simulation::SimulationState;

const HULL_RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const HULL_GREY: Vec3 = Vec3::new(0.5, 0.5, 0.5);
const PLANET_SHININESS: f32 = 8.0;
const SHIP_SHININESS: f32 = 24.0;

/// Ship model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipDesign {
    /// Red fuselage, swept wings and an antenna
    #[default]
    Interceptor,
    /// Grey fuselage with long engine pods
    Hauler,
}

impl ShipDesign {
    /// The other design
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Interceptor => Self::Hauler,
            Self::Hauler => Self::Interceptor,
        }
    }

    /// Cube parts in ship space
    pub fn parts(self) -> Vec<ShipPart> {
        let id = Mat4::identity();
        match self {
            Self::Interceptor => {
                let right_wing = id.scale(0.6, 0.2, 0.3).translate(0.75, 0.0, -0.9);
                vec![
                    ShipPart { local: id.scale(0.3, 0.3, 1.0), color: HULL_RED },
                    ShipPart { local: id.scale(0.6, 0.2, 0.3).translate(-0.75, 0.0, -0.9), color: HULL_GREY },
                    ShipPart { local: right_wing, color: HULL_GREY },
                    ShipPart { local: right_wing.translate(-0.76, 1.0, -0.2), color: HULL_GREY },
                ]
            }
            Self::Hauler => vec![
                ShipPart { local: id.scale(0.3, 0.25, 1.0), color: HULL_GREY },
                ShipPart { local: id.scale(0.15, 0.2, 0.8).translate(-1.5, 0.6, -0.2), color: HULL_GREY },
                ShipPart { local: id.scale(0.15, 0.2, 0.8).translate(1.5, 0.6, -0.2), color: HULL_GREY },
            ],
        }
    }
}

/// One cube of a ship model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipPart {
    /// Part transform in ship space
    pub local: Mat4,
    /// Flat color
    pub color: Vec3,
}

/// Everything to draw this frame: sun, planets, rings, then the ship
pub fn compose(state: &SimulationState) -> Vec<Drawable> {
    let config = state.config();
    let system = state.system();
    let rings = state.rings();
    let parts = state.design().parts();
    let mut drawables = Vec::with_capacity(1 + system.planets.len() + rings.active().len() + parts.len());

    let sun = &system.sun;
    drawables.push(
        Drawable::new(
            ShapeKind::Sphere,
            Mat4::identity().rotate_y(sun.phase).scale(sun.radius, sun.radius, sun.radius),
            sun.surface.clone(),
        )
        .emissive(),
    );

    // Planets turn once per orbit, always showing the sun the same face
    for planet in &system.planets {
        let p = planet.position();
        let r = planet.radius;
        drawables.push(
            Drawable::new(
                ShapeKind::Sphere,
                Mat4::translation(p.x, p.y, p.z).rotate_y(planet.phase).scale(r, r, r),
                planet.surface.clone(),
            )
            .with_shininess(PLANET_SHININESS),
        );
    }

    let s = config.rings.scale;
    for ring in rings.active() {
        drawables.push(
            Drawable::new(
                ShapeKind::Ring,
                Mat4::translation(ring.x, ring.y, ring.z).scale(s, s, s),
                Surface::Color(config.rings.color),
            )
            .with_shininess(config.rings.shininess),
        );
    }

    let k = config.ship.render_scale;
    let ship = state.ship().model_matrix().scale(k, k, k);
    drawables.extend(parts.into_iter().map(|part| {
        Drawable::new(ShapeKind::Cube, ship * part.local, Surface::Color(part.color)).with_shininess(SHIP_SHININESS)
    }));

    drawables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::rc::Rc;

    fn state() -> SimulationState {
        SimulationState::new(Rc::new(GameConfig::default()), &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_draw_list_layout() {
        let state = state();
        let drawables = compose(&state);
        assert_eq!(drawables.len(), 1 + 4 + 20 + 4);

        assert!(drawables[0].emissive);
        assert_eq!(drawables[0].shape, ShapeKind::Sphere);
        assert!(drawables[1..5].iter().all(|d| d.shape == ShapeKind::Sphere && !d.emissive));
        assert!(drawables[5..25].iter().all(|d| d.shape == ShapeKind::Ring));
        assert!(drawables[25..].iter().all(|d| d.shape == ShapeKind::Cube));
    }

    #[test]
    fn test_planet_transform_places_and_scales() {
        let state = state();
        let drawables = compose(&state);
        let earth = &state.system().planets[2];
        let transform = drawables[3].transform;
        assert_relative_eq!(transform.transform_point(Vec3::ZERO), earth.position());
        assert_relative_eq!(transform.transform_vector(Vec3::UNIT_Y), Vec3::new(0.0, earth.radius, 0.0));
    }

    #[test]
    fn test_ship_is_scaled_about_its_own_position() {
        let state = state();
        let drawables = compose(&state);
        let body = drawables[25].transform;
        let ship = state.ship();
        assert_relative_eq!(body.transform_point(Vec3::ZERO), ship.position);
        assert_relative_eq!(body.transform_vector(Vec3::UNIT_Z), ship.basis.forward * 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_designs() {
        assert_eq!(ShipDesign::Interceptor.parts().len(), 4);
        assert_eq!(ShipDesign::Hauler.parts().len(), 3);
        assert_eq!(ShipDesign::Interceptor.toggled(), ShipDesign::Hauler);
        assert_eq!(ShipDesign::Interceptor.parts()[0].color, HULL_RED);

        let wing = ShipDesign::Interceptor.parts()[2].local;
        assert_relative_eq!(wing.transform_point(Vec3::ZERO), Vec3::new(0.45, 0.0, -0.27), epsilon = 1e-6);
        let antenna = ShipDesign::Interceptor.parts()[3].local;
        assert_relative_eq!(antenna, wing * Mat4::translation(-0.76, 1.0, -0.2));
    }
}
