//! Lighting system
//!
//! One lighting model for every object, with the optional parts selected by
//! [`PipelineFeatures`]:
//!
//! ```text
//! color · (ambient + Σ_i (diffuse_i + specular_i) · attenuation(d_i) · intensity)
//! attenuation(d) = 1 / (constant + linear·d + quadratic·d²)
//! ```
//!
//! Lighting is evaluated per vertex in world space. Emissive surfaces (the
//! sun) skip point lighting entirely and show their base color.
//! [`LightingEnvironment::shade_vertex`] is the CPU reference of what the
//! generated vertex shader computes.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::api::{BackendResult, ProgramHandle, RenderContext, Uniform};

/// Size of the point light uniform arrays
pub const MAX_POINT_LIGHTS: usize = 8;

bitflags! {
    /// Optional stages of the lighting pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineFeatures: u32 {
        /// Constant ambient term
        const AMBIENT = 1 << 0;
        /// Attenuated diffuse and specular point lights
        const POINT_LIGHTS = 1 << 1;
        /// Sample a texture instead of using the flat surface color
        const TEXTURED = 1 << 2;
    }
}

impl Default for PipelineFeatures {
    fn default() -> Self {
        Self::all()
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// World-space position
    pub position: Vec3,
    /// Light color
    pub color: Vec3,
}

impl PointLight {
    /// Create a point light
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

/// Distance falloff `1 / (constant + linear·d + quadratic·d²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    /// Constant term
    pub constant: f32,
    /// Linear term
    pub linear: f32,
    /// Quadratic term
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self { constant: 1.0, linear: 0.01, quadratic: 0.02 }
    }
}

impl Attenuation {
    /// Falloff factor at `distance`
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Surface parameters of one shaded vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// World-space position
    pub position: Vec3,
    /// World-space unit normal
    pub normal: Vec3,
    /// Base color (flat color or sampled texel)
    pub color: Vec3,
    /// Specular exponent; `0` disables the highlight
    pub shininess: f32,
    /// Skip point lighting and show the base color
    pub emissive: bool,
}

/// Lighting environment containing the ambient term and point lights
#[derive(Debug, Clone, PartialEq)]
pub struct LightingEnvironment {
    /// Ambient light color
    pub ambient_color: Vec3,
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Point lights, at most [`MAX_POINT_LIGHTS`]
    pub lights: Vec<PointLight>,
    /// Shared point light intensity
    pub light_intensity: f32,
    /// Shared distance falloff
    pub attenuation: Attenuation,
}

impl LightingEnvironment {
    /// Create a new environment with white ambient light and no point lights
    pub fn new() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.3,
            lights: Vec::new(),
            light_intensity: 1.0,
            attenuation: Attenuation::default(),
        }
    }

    /// Add a light to the environment
    ///
    /// Lights past [`MAX_POINT_LIGHTS`] do not fit the shader arrays and are
    /// dropped with a warning.
    #[must_use]
    pub fn add_light(mut self, light: PointLight) -> Self {
        if self.lights.len() < MAX_POINT_LIGHTS {
            self.lights.push(light);
        } else {
            log::warn!("Dropping point light at {:?}: limit of {} reached", light.position, MAX_POINT_LIGHTS);
        }
        self
    }

    /// Set ambient lighting
    #[must_use]
    pub const fn with_ambient(mut self, color: Vec3, intensity: f32) -> Self {
        self.ambient_color = color;
        self.ambient_intensity = intensity;
        self
    }

    /// Set the shared point light intensity
    #[must_use]
    pub const fn with_light_intensity(mut self, intensity: f32) -> Self {
        self.light_intensity = intensity;
        self
    }

    /// Set the distance falloff
    #[must_use]
    pub const fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// Ring of warm point lights around a sun at the origin
    ///
    /// Six lights sit on the coordinate axes and two on the `(1, 1, 1)`
    /// diagonal, all `sun_radius + standoff` from the centre, so every side of
    /// every planet faces at least one light.
    pub fn sun_rig(sun_radius: f32, standoff: f32, color: Vec3) -> Self {
        let distance = sun_radius + standoff;
        let diagonal = distance / 3.0_f32.sqrt();
        let positions = [
            Vec3::new(distance, 0.0, 0.0),
            Vec3::new(-distance, 0.0, 0.0),
            Vec3::new(0.0, distance, 0.0),
            Vec3::new(0.0, -distance, 0.0),
            Vec3::new(0.0, 0.0, distance),
            Vec3::new(0.0, 0.0, -distance),
            Vec3::new(diagonal, diagonal, diagonal),
            Vec3::new(-diagonal, -diagonal, -diagonal),
        ];
        positions
            .into_iter()
            .fold(Self::new(), |env, position| env.add_light(PointLight::new(position, color)))
    }

    /// Upload the environment's uniforms to `program`
    ///
    /// Light arrays are padded to [`MAX_POINT_LIGHTS`]; `u_LightCount` tells
    /// the shader how many entries are live.
    pub fn apply(&self, ctx: &mut dyn RenderContext, program: ProgramHandle) -> BackendResult<()> {
        let mut positions: Vec<Vec3> = self.lights.iter().map(|l| l.position).collect();
        let mut colors: Vec<Vec3> = self.lights.iter().map(|l| l.color).collect();
        positions.resize(MAX_POINT_LIGHTS, Vec3::ZERO);
        colors.resize(MAX_POINT_LIGHTS, Vec3::ZERO);
        let count = i32::try_from(self.lights.len()).unwrap_or(0);

        ctx.set_uniform(program, "u_AmbientColor", Uniform::Vec3(self.ambient_color))?;
        ctx.set_uniform(program, "u_AmbientIntensity", Uniform::Float(self.ambient_intensity))?;
        ctx.set_uniform(program, "u_LightCount", Uniform::Int(count))?;
        ctx.set_uniform(program, "u_LightPositions", Uniform::Vec3Array(positions))?;
        ctx.set_uniform(program, "u_LightColors", Uniform::Vec3Array(colors))?;
        ctx.set_uniform(program, "u_LightIntensity", Uniform::Float(self.light_intensity))?;
        let a = self.attenuation;
        ctx.set_uniform(program, "u_Attenuation", Uniform::Vec3(Vec3::new(a.constant, a.linear, a.quadratic)))?;
        Ok(())
    }

    /// CPU evaluation of the per-vertex lighting model
    ///
    /// `eye` is the camera position, used for the specular half vector.
    pub fn shade_vertex(&self, features: PipelineFeatures, surface: &SurfaceSample, eye: Vec3) -> Vec3 {
        if surface.emissive {
            return surface.color;
        }

        let mut light = Vec3::ZERO;
        if features.contains(PipelineFeatures::AMBIENT) {
            light += self.ambient_color.scaled(self.ambient_intensity);
        }

        if features.contains(PipelineFeatures::POINT_LIGHTS) {
            let to_eye = (eye - surface.position).normalize().ok();
            for point in &self.lights {
                let offset = point.position - surface.position;
                let Ok(to_light) = offset.normalize() else {
                    // Vertex sits on the light; direction is undefined
                    continue;
                };
                let attenuation = self.attenuation.factor(offset.length()) * self.light_intensity;

                let diffuse = surface.normal.dot(to_light).max(0.0);
                let specular = match to_eye {
                    Some(to_eye) if surface.shininess > 0.0 && diffuse > 0.0 => (to_light + to_eye)
                        .normalize()
                        .map_or(0.0, |half| surface.normal.dot(half).max(0.0).powf(surface.shininess)),
                    _ => 0.0,
                };
                light += point.color.scaled((diffuse + specular) * attenuation);
            }
        }

        Vec3::new(surface.color.x * light.x, surface.color.y * light.y, surface.color.z * light.z)
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessContext;
    use approx::assert_relative_eq;

    const WARM: Vec3 = Vec3::new(1.0, 0.9, 0.8);

    fn matte(position: Vec3, normal: Vec3) -> SurfaceSample {
        SurfaceSample { position, normal, color: Vec3::ONE, shininess: 0.0, emissive: false }
    }

    #[test]
    fn test_attenuation_curve() {
        let a = Attenuation::default();
        assert_relative_eq!(a.factor(0.0), 1.0);
        assert_relative_eq!(a.factor(10.0), 1.0 / (1.0 + 0.1 + 2.0));
        assert!(a.factor(5.0) > a.factor(6.0));
    }

    #[test]
    fn test_ambient_only() {
        let env = LightingEnvironment::new().add_light(PointLight::new(Vec3::new(0.0, 2.0, 0.0), WARM));
        let surface = matte(Vec3::ZERO, Vec3::UNIT_Y);
        let shaded = env.shade_vertex(PipelineFeatures::AMBIENT, &surface, Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(shaded, Vec3::new(0.3, 0.3, 0.3));
    }

    #[test]
    fn test_point_light_facing_and_facing_away() {
        let env = LightingEnvironment::new()
            .with_ambient(Vec3::ONE, 0.0)
            .add_light(PointLight::new(Vec3::new(0.0, 2.0, 0.0), WARM));
        let features = PipelineFeatures::AMBIENT | PipelineFeatures::POINT_LIGHTS;
        let eye = Vec3::new(0.0, 0.0, 5.0);

        let lit = env.shade_vertex(features, &matte(Vec3::ZERO, Vec3::UNIT_Y), eye);
        let expected = WARM.scaled(Attenuation::default().factor(2.0));
        assert_relative_eq!(lit, expected, epsilon = 1e-6);

        let away = env.shade_vertex(features, &matte(Vec3::ZERO, -Vec3::UNIT_Y), eye);
        assert_relative_eq!(away, Vec3::ZERO);
    }

    #[test]
    fn test_emissive_skips_lighting() {
        let env = LightingEnvironment::sun_rig(5.0, 2.0, WARM);
        let sun = SurfaceSample {
            position: Vec3::new(5.0, 0.0, 0.0),
            normal: Vec3::UNIT_X,
            color: Vec3::new(1.0, 1.0, 0.0),
            shininess: 0.0,
            emissive: true,
        };
        assert_eq!(env.shade_vertex(PipelineFeatures::all(), &sun, Vec3::new(20.0, 0.0, 0.0)), sun.color);
    }

    #[test]
    fn test_specular_adds_highlight() {
        let env = LightingEnvironment::new()
            .with_ambient(Vec3::ONE, 0.0)
            .add_light(PointLight::new(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE));
        let eye = Vec3::new(0.0, 3.0, 0.0);
        let mut surface = matte(Vec3::ZERO, Vec3::UNIT_Y);
        let features = PipelineFeatures::POINT_LIGHTS;

        let without = env.shade_vertex(features, &surface, eye);
        surface.shininess = 16.0;
        let with = env.shade_vertex(features, &surface, eye);
        assert_relative_eq!(with.x, without.x * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_light_limit() {
        let env = (0..10).fold(LightingEnvironment::new(), |env, i| {
            env.add_light(PointLight::new(Vec3::new(i as f32, 0.0, 0.0), WARM))
        });
        assert_eq!(env.lights.len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_sun_rig_surrounds_the_sun() {
        let env = LightingEnvironment::sun_rig(5.0, 2.0, WARM);
        assert_eq!(env.lights.len(), MAX_POINT_LIGHTS);
        for light in &env.lights {
            assert_relative_eq!(light.position.length(), 7.0, epsilon = 1e-5);
            assert_eq!(light.color, WARM);
        }
    }

    #[test]
    fn test_apply_pads_light_arrays() {
        let mut ctx = HeadlessContext::new();
        let program = ctx
            .create_program("void main() { gl_Position = vec4(0.0); }", "void main() { gl_FragColor = vec4(1.0); }")
            .unwrap();
        let env = LightingEnvironment::new().add_light(PointLight::new(Vec3::UNIT_X, WARM));
        env.apply(&mut ctx, program).unwrap();

        assert_eq!(ctx.uniform(program, "u_LightCount"), Some(&Uniform::Int(1)));
        match ctx.uniform(program, "u_LightPositions") {
            Some(Uniform::Vec3Array(positions)) => {
                assert_eq!(positions.len(), MAX_POINT_LIGHTS);
                assert_eq!(positions[0], Vec3::UNIT_X);
            }
            other => panic!("unexpected light positions {other:?}"),
        }
    }
}
