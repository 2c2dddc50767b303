//! Shader program source
//!
//! A single GLSL ES program covers every lighting configuration. The
//! requested [`PipelineFeatures`] become `#define` switches prepended to both
//! stages, so there is one source of truth instead of one program per
//! variant. Lighting runs in the vertex stage; the fragment stage only
//! applies the interpolated light to the flat color or texel.

use crate::render::lighting::{PipelineFeatures, MAX_POINT_LIGHTS};

/// Vertex attribute names shared by the shaders and the render pass
pub mod attributes {
    /// Object-space position, 3 floats
    pub const POSITION: &str = "a_Position";
    /// Object-space normal, 3 floats
    pub const NORMAL: &str = "a_Normal";
    /// Texture coordinate, 2 floats
    pub const TEX_COORD: &str = "a_TexCoord";
}

const VERTEX_BODY: &str = r"
precision mediump float;

attribute vec3 a_Position;
attribute vec3 a_Normal;
attribute vec2 a_TexCoord;

uniform mat4 u_Mvp;
uniform mat4 u_Model;
uniform mat4 u_NormalMatrix;
uniform vec3 u_EyePosition;
uniform float u_Shininess;
uniform bool u_Emissive;

uniform vec3 u_AmbientColor;
uniform float u_AmbientIntensity;
uniform int u_LightCount;
uniform vec3 u_LightPositions[NUM_LIGHTS];
uniform vec3 u_LightColors[NUM_LIGHTS];
uniform float u_LightIntensity;
uniform vec3 u_Attenuation;

varying vec3 v_Light;
varying vec2 v_TexCoord;

void main() {
    vec3 world = (u_Model * vec4(a_Position, 1.0)).xyz;
    vec3 normal = normalize((u_NormalMatrix * vec4(a_Normal, 0.0)).xyz);
    vec3 light = vec3(0.0);

    if (u_Emissive) {
        light = vec3(1.0);
    } else {
#ifdef FEATURE_AMBIENT
        light += u_AmbientColor * u_AmbientIntensity;
#endif
#ifdef FEATURE_POINT_LIGHTS
        vec3 toEye = normalize(u_EyePosition - world);
        for (int i = 0; i < NUM_LIGHTS; i++) {
            if (i >= u_LightCount) {
                break;
            }
            vec3 offset = u_LightPositions[i] - world;
            float d = length(offset);
            vec3 toLight = offset / d;
            float attenuation = u_LightIntensity
                / (u_Attenuation.x + u_Attenuation.y * d + u_Attenuation.z * d * d);
            float diffuse = max(dot(normal, toLight), 0.0);
            float specular = 0.0;
            if (u_Shininess > 0.0 && diffuse > 0.0) {
                specular = pow(max(dot(normal, normalize(toLight + toEye)), 0.0), u_Shininess);
            }
            light += u_LightColors[i] * (diffuse + specular) * attenuation;
        }
#endif
    }

    v_Light = light;
    v_TexCoord = a_TexCoord;
    gl_Position = u_Mvp * vec4(a_Position, 1.0);
}
";

const FRAGMENT_BODY: &str = r"
precision mediump float;

uniform vec3 u_Color;
uniform bool u_UseTexture;
uniform sampler2D u_Texture;

varying vec3 v_Light;
varying vec2 v_TexCoord;

void main() {
    vec3 base = u_Color;
#ifdef FEATURE_TEXTURED
    if (u_UseTexture) {
        base = texture2D(u_Texture, v_TexCoord).rgb;
    }
#endif
    gl_FragColor = vec4(base * v_Light, 1.0);
}
";

/// Vertex and fragment source for one feature set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    /// Vertex stage
    pub vertex: String,
    /// Fragment stage
    pub fragment: String,
}

impl ProgramSource {
    /// Generate both stages for `features`
    pub fn for_features(features: PipelineFeatures) -> Self {
        let mut header = format!("#define NUM_LIGHTS {MAX_POINT_LIGHTS}\n");
        for (flag, define) in [
            (PipelineFeatures::AMBIENT, "FEATURE_AMBIENT"),
            (PipelineFeatures::POINT_LIGHTS, "FEATURE_POINT_LIGHTS"),
            (PipelineFeatures::TEXTURED, "FEATURE_TEXTURED"),
        ] {
            if features.contains(flag) {
                header.push_str("#define ");
                header.push_str(define);
                header.push('\n');
            }
        }

        Self {
            vertex: format!("{header}{VERTEX_BODY}"),
            fragment: format!("{header}{FRAGMENT_BODY}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessContext, RenderContext};

    #[test]
    fn test_defines_follow_features() {
        let source = ProgramSource::for_features(PipelineFeatures::AMBIENT | PipelineFeatures::TEXTURED);
        assert!(source.vertex.contains("#define FEATURE_AMBIENT"));
        assert!(!source.vertex.contains("#define FEATURE_POINT_LIGHTS"));
        assert!(source.fragment.contains("#define FEATURE_TEXTURED"));
        assert!(source.vertex.starts_with("#define NUM_LIGHTS 8\n"));
    }

    #[test]
    fn test_every_feature_set_links() {
        let mut ctx = HeadlessContext::new();
        for bits in 0..=PipelineFeatures::all().bits() {
            let features = PipelineFeatures::from_bits_truncate(bits);
            let source = ProgramSource::for_features(features);
            assert!(ctx.create_program(&source.vertex, &source.fragment).is_ok(), "{features:?}");
        }
    }

    #[test]
    fn test_declares_shared_attributes() {
        let source = ProgramSource::for_features(PipelineFeatures::empty());
        for name in [attributes::POSITION, attributes::NORMAL, attributes::TEX_COORD] {
            assert!(source.vertex.contains(name));
        }
    }
}
