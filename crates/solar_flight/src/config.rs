//! Game configuration
//!
//! Every section falls back to its defaults when missing from the file, so a
//! config only needs to name what it changes.

use std::path::Path;

use flight_engine::config::{Config, ConfigError};
use flight_engine::foundation::math::Vec3;
use flight_engine::render::lighting::Attenuation;
use flight_engine::render::{Frustum, LightingEnvironment, MeshSettings, PipelineFeatures, ProjectionMode};
use serde::{Deserialize, Serialize};

use crate::scene::ShipDesign;
use crate::solar_system::SolarSystem;

/// Main game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Ship handling
    pub ship: ShipConfig,
    /// Chase camera
    pub camera: CameraConfig,
    /// Lenses
    pub projection: ProjectionConfig,
    /// Sun, planets and the play area
    pub solar_system: SolarSystemConfig,
    /// Collectible rings
    pub rings: RingsConfig,
    /// Lights and pipeline features
    pub lighting: LightingConfig,
    /// Mesh tessellation
    pub meshes: MeshConfig,
    /// Key bindings
    pub controls: ControlsConfig,
    /// Headless demo run
    pub demo: DemoConfig,
}

impl Config for GameConfig {}

/// Ship handling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Position at start and after every reset
    pub initial_position: Vec3,
    /// Impulse added per frame while a steering key is held (radians)
    pub steer_increment: f32,
    /// Factor both impulses are multiplied by every frame
    pub impulse_decay: f32,
    /// Speed gained per frame of thrust
    pub acceleration: f32,
    /// Speed lost per frame of braking
    pub deceleration: f32,
    /// Speed cap in units per frame
    pub max_speed: f32,
    /// Re-orthogonalize the axes after every rotation
    pub reorthogonalize: bool,
    /// Uniform scale applied to the ship model
    pub render_scale: f32,
    /// Model shown at start
    pub design: ShipDesign,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            initial_position: Vec3::new(3.0, 4.0, -20.0),
            steer_increment: 0.2,
            impulse_decay: 0.095,
            acceleration: 0.002,
            deceleration: 0.005,
            max_speed: 0.1,
            reorthogonalize: true,
            render_scale: 0.2,
            design: ShipDesign::default(),
        }
    }
}

/// Chase camera configuration
///
/// Offsets are in the ship's frame: `(right, up, forward)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Third-person offset, used with the perspective lens
    pub chase_offset: Vec3,
    /// Near-cockpit offset, used with the orthographic lens
    pub cockpit_offset: Vec3,
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            chase_offset: Vec3::new(0.0, 0.6, -2.5),
            cockpit_offset: Vec3::new(0.0, 0.15, -0.4),
            smoothing: 0.1,
        }
    }
}

/// Projection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Lens at start
    pub initial: ProjectionMode,
    /// Perspective frustum bounds
    pub perspective: Frustum,
    /// Orthographic box bounds
    pub orthographic: Frustum,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            initial: ProjectionMode::Perspective,
            perspective: Frustum::default(),
            orthographic: Frustum::symmetric(1.5, 1.5, 0.1, 200.0),
        }
    }
}

/// One planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Display name, used in crash reports
    pub name: String,
    /// Distance from the sun
    pub orbit_radius: f32,
    /// Phase advance per frame (radians)
    pub phase_step: f32,
    /// Visual radius
    pub radius: f32,
    /// Collision distance from the planet centre
    pub hazard_radius: f32,
    /// Texture URL
    pub texture: String,
    /// Color when texturing is off
    pub color: Vec3,
}

impl PlanetConfig {
    fn new(name: &str, orbit_radius: f32, phase_step: f32, radius: f32, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            orbit_radius,
            phase_step,
            radius,
            hazard_radius: radius + 1.0,
            texture: format!("textures/{name}.jpg"),
            color,
        }
    }
}

/// Sun, planets and play area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarSystemConfig {
    /// Sun radius
    pub sun_radius: f32,
    /// Extra collision distance around the sun
    pub sun_clearance: f32,
    /// Sun spin per frame (radians)
    pub sun_spin_step: f32,
    /// Sun texture URL
    pub sun_texture: String,
    /// Sun color when texturing is off
    pub sun_color: Vec3,
    /// Leaving this distance from the origin counts as a crash
    pub boundary_radius: f32,
    /// Orbiting planets
    pub planets: Vec<PlanetConfig>,
}

impl SolarSystemConfig {
    /// Crash distance around the sun, also the minimum ring distance
    pub fn sun_hazard_radius(&self) -> f32 {
        self.sun_radius + self.sun_clearance
    }
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        Self {
            sun_radius: 5.0,
            sun_clearance: 2.0,
            sun_spin_step: 0.002,
            sun_texture: "textures/sun.jpg".to_string(),
            sun_color: Vec3::new(1.0, 0.85, 0.2),
            boundary_radius: 80.0,
            planets: vec![
                PlanetConfig::new("mercury", 12.0, 0.010, 0.8, Vec3::new(0.6, 0.6, 0.6)),
                PlanetConfig::new("venus", 18.0, 0.007, 1.2, Vec3::new(0.9, 0.7, 0.4)),
                PlanetConfig::new("earth", 25.0, 0.005, 1.3, Vec3::new(0.2, 0.4, 0.9)),
                PlanetConfig::new("mars", 33.0, 0.004, 1.0, Vec3::new(0.8, 0.3, 0.2)),
            ],
        }
    }
}

/// Collectible ring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingsConfig {
    /// Rings per round
    pub count: usize,
    /// Rings spawn in a cube of this half-extent around the origin
    pub spawn_extent: f32,
    /// Distance at which the ship picks a ring up
    pub collect_radius: f32,
    /// Uniform scale of the ring mesh
    pub scale: f32,
    /// Ring color
    pub color: Vec3,
    /// Specular exponent
    pub shininess: f32,
}

impl Default for RingsConfig {
    fn default() -> Self {
        Self {
            count: 20,
            spawn_extent: 30.0,
            collect_radius: 1.5,
            scale: 0.5,
            color: Vec3::new(1.0, 0.84, 0.0),
            shininess: 32.0,
        }
    }
}

/// Lighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient color
    pub ambient_color: Vec3,
    /// Ambient intensity
    pub ambient_intensity: f32,
    /// Point light color
    pub light_color: Vec3,
    /// Shared point light intensity
    pub light_intensity: f32,
    /// Distance of the light ring from the sun's surface
    pub light_standoff: f32,
    /// Distance falloff
    pub attenuation: Attenuation,
    /// Enable the ambient term
    pub ambient: bool,
    /// Enable point lights
    pub point_lights: bool,
    /// Enable texturing
    pub textured: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.3,
            light_color: Vec3::new(1.0, 0.9, 0.8),
            light_intensity: 1.0,
            light_standoff: 2.0,
            attenuation: Attenuation::default(),
            ambient: true,
            point_lights: true,
            textured: true,
        }
    }
}

impl LightingConfig {
    /// Pipeline stages switched on
    pub fn features(&self) -> PipelineFeatures {
        let mut features = PipelineFeatures::empty();
        features.set(PipelineFeatures::AMBIENT, self.ambient);
        features.set(PipelineFeatures::POINT_LIGHTS, self.point_lights);
        features.set(PipelineFeatures::TEXTURED, self.textured);
        features
    }

    /// Light ring around a sun of `sun_radius`
    pub fn environment(&self, sun_radius: f32) -> LightingEnvironment {
        LightingEnvironment::sun_rig(sun_radius, self.light_standoff, self.light_color)
            .with_ambient(self.ambient_color, self.ambient_intensity)
            .with_light_intensity(self.light_intensity)
            .with_attenuation(self.attenuation)
    }
}

/// Mesh tessellation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Sphere longitude segments
    pub sphere_slices: u32,
    /// Sphere latitude segments
    pub sphere_stacks: u32,
    /// Ring tube-centre radius
    pub ring_major_radius: f32,
    /// Ring tube radius
    pub ring_minor_radius: f32,
    /// Segments around the ring
    pub ring_major_segments: u32,
    /// Segments around the tube
    pub ring_minor_segments: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        let settings = MeshSettings::default();
        Self {
            sphere_slices: settings.sphere_slices,
            sphere_stacks: settings.sphere_stacks,
            ring_major_radius: settings.ring_major_radius,
            ring_minor_radius: settings.ring_minor_radius,
            ring_major_segments: settings.ring_major_segments,
            ring_minor_segments: settings.ring_minor_segments,
        }
    }
}

impl From<&MeshConfig> for MeshSettings {
    fn from(config: &MeshConfig) -> Self {
        Self {
            sphere_slices: config.sphere_slices,
            sphere_stacks: config.sphere_stacks,
            ring_major_radius: config.ring_major_radius,
            ring_minor_radius: config.ring_minor_radius,
            ring_major_segments: config.ring_major_segments,
            ring_minor_segments: config.ring_minor_segments,
        }
    }
}

/// Key bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Negative pitch impulse
    pub pitch_left: String,
    /// Positive pitch impulse
    pub pitch_right: String,
    /// Negative roll impulse
    pub roll_up: String,
    /// Positive roll impulse
    pub roll_down: String,
    /// Accelerate
    pub thrust: String,
    /// Decelerate
    pub brake: String,
    /// Switch perspective/orthographic
    pub toggle_projection: String,
    /// Switch ship model
    pub toggle_design: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            pitch_left: "a".to_string(),
            pitch_right: "d".to_string(),
            roll_up: "w".to_string(),
            roll_down: "s".to_string(),
            thrust: " ".to_string(),
            brake: "x".to_string(),
            toggle_projection: "c".to_string(),
            toggle_design: "1".to_string(),
        }
    }
}

/// Headless demo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to run
    pub frames: u64,
    /// Seconds per frame
    pub frame_step: f32,
    /// Ring placement seed; random when absent
    pub seed: Option<u64>,
    /// Frames before a requested texture arrives
    pub texture_delay_frames: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { frames: 600, frame_step: 1.0 / 60.0, seed: None, texture_delay_frames: 30 }
    }
}

impl GameConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    ///
    /// # Errors
    /// A file that exists but does not parse is an error; silently ignoring
    /// it would hide typos.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Reject values that would break the simulation
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ship = &self.ship;
        check(ship.max_speed >= 0.0, "ship.max_speed", "must not be negative")?;
        check(ship.acceleration >= 0.0, "ship.acceleration", "must not be negative")?;
        check(ship.deceleration >= 0.0, "ship.deceleration", "must not be negative")?;
        check((0.0..=1.0).contains(&ship.impulse_decay), "ship.impulse_decay", "must be within [0, 1]")?;
        check(ship.render_scale > 0.0, "ship.render_scale", "must be positive")?;

        let smoothing = self.camera.smoothing;
        check(smoothing > 0.0 && smoothing <= 1.0, "camera.smoothing", "must be within (0, 1]")?;
        check(self.camera.chase_offset.length_squared() > 0.0, "camera.chase_offset", "must not be zero")?;
        check(self.camera.cockpit_offset.length_squared() > 0.0, "camera.cockpit_offset", "must not be zero")?;

        check_frustum(&self.projection.perspective, "projection.perspective")?;
        check_frustum(&self.projection.orthographic, "projection.orthographic")?;

        let system = &self.solar_system;
        check(system.sun_radius > 0.0, "solar_system.sun_radius", "must be positive")?;
        check(system.sun_clearance >= 0.0, "solar_system.sun_clearance", "must not be negative")?;
        check(
            system.boundary_radius > system.sun_hazard_radius(),
            "solar_system.boundary_radius",
            "must lie outside the sun's hazard radius",
        )?;
        for planet in &system.planets {
            check(planet.hazard_radius > 0.0, "solar_system.planets.hazard_radius", "must be positive")?;
            check(planet.radius > 0.0, "solar_system.planets.radius", "must be positive")?;
        }
        // Every reset puts the ship back here with all phases at zero
        if let Some(hazard) = SolarSystem::from_config(system).hazard_at(ship.initial_position) {
            return Err(ConfigError::Invalid {
                field: "ship.initial_position".to_string(),
                reason: format!("starts inside the hazard of {hazard}"),
            });
        }

        let rings = &self.rings;
        check(rings.count > 0, "rings.count", "must be at least 1")?;
        check(rings.collect_radius > 0.0, "rings.collect_radius", "must be positive")?;
        check(
            rings.spawn_extent > system.sun_hazard_radius(),
            "rings.spawn_extent",
            "must exceed the sun's hazard radius or no ring can be placed",
        )?;

        let meshes = &self.meshes;
        check(meshes.sphere_slices > 0 && meshes.sphere_stacks > 0, "meshes.sphere", "segments must be non-zero")?;
        check(
            meshes.ring_major_segments > 0 && meshes.ring_minor_segments > 0,
            "meshes.ring",
            "segments must be non-zero",
        )?;

        check(self.demo.frame_step > 0.0, "demo.frame_step", "must be positive")?;
        Ok(())
    }
}

fn check(ok: bool, field: &str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field: field.to_string(), reason: reason.to_string() })
    }
}

fn check_frustum(frustum: &Frustum, field: &str) -> Result<(), ConfigError> {
    check(frustum.near > 0.0, field, "near plane must be positive")?;
    check(frustum.near < frustum.far, field, "near plane must be closer than the far plane")?;
    check(frustum.left < frustum.right && frustum.bottom < frustum.top, field, "bounds are inverted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_engine::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let text = "[ship]\nmax_speed = 0.2\n\n[rings]\ncount = 5\n";
        let config: GameConfig = ConfigFormat::Toml.parse(text).unwrap();
        assert_eq!(config.ship.max_speed, 0.2);
        assert_eq!(config.ship.initial_position, Vec3::new(3.0, 4.0, -20.0));
        assert_eq!(config.rings.count, 5);
        assert_eq!(config.solar_system, SolarSystemConfig::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let text = include_str!("../config/solar_flight.toml");
        let config: GameConfig = ConfigFormat::Toml.parse(text).unwrap();
        config.validate().unwrap();
        assert_eq!(config.solar_system.planets.len(), 4);
        assert_eq!(config.controls, ControlsConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join(format!("solar_flight_missing_{}.toml", std::process::id()));
        assert_eq!(GameConfig::load_or_default(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_invalid_values_are_named() {
        let mut config = GameConfig::default();
        config.camera.smoothing = 0.0;
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "camera.smoothing"),
            other => panic!("expected invalid smoothing, got {other:?}"),
        }

        let mut config = GameConfig::default();
        config.projection.perspective.far = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = GameConfig::default();
        config.rings.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_start_inside_a_hazard_is_rejected() {
        let start_field = |config: &GameConfig| match config.validate() {
            Err(ConfigError::Invalid { field, reason }) => Some((field, reason)),
            _ => None,
        };

        let mut config = GameConfig::default();
        config.ship.initial_position = Vec3::new(3.0, 4.0, 4.0);
        let (field, reason) = start_field(&config).expect("start next to the sun accepted");
        assert_eq!(field, "ship.initial_position");
        assert!(reason.contains("the sun"), "{reason}");

        // Mercury sits on +Z at phase zero
        config.ship.initial_position = Vec3::new(0.0, 0.5, 12.0);
        let (_, reason) = start_field(&config).expect("start inside mercury accepted");
        assert!(reason.contains("mercury"), "{reason}");

        config.ship.initial_position = Vec3::new(0.0, 0.0, -90.0);
        assert!(start_field(&config).is_some());

        config.ship.initial_position = Vec3::new(0.0, 7.0, 0.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_feature_flags_follow_switches() {
        let lighting = LightingConfig { textured: false, ..LightingConfig::default() };
        assert_eq!(lighting.features(), PipelineFeatures::AMBIENT | PipelineFeatures::POINT_LIGHTS);
        assert_eq!(LightingConfig::default().features(), PipelineFeatures::all());
    }

    #[test]
    fn test_sun_hazard_radius() {
        assert_eq!(SolarSystemConfig::default().sun_hazard_radius(), 7.0);
    }
}
