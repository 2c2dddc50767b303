//! # Rendering System
//!
//! Backend-agnostic, immediate-mode rendering for the flight scene.
//!
//! ## Architecture
//!
//! - **Primitives**: procedural meshes and camera/projection math
//! - **API**: the [`RenderContext`] trait every backend implements
//! - **Backends**: concrete contexts (a recording headless context ships with
//!   the engine)
//! - **Lighting**: one configurable pipeline selected by [`PipelineFeatures`]
//! - **Textures**: single-assignment texture slots that upgrade from a
//!   placeholder when the real image arrives
//! - **Pass**: the per-frame driver that turns a drawable list into draw calls
//!
//! There is no batching and no scene graph: every drawable is one draw call
//! with its own uniforms.

use thiserror::Error;

use crate::foundation::math::MathError;

pub mod api;
pub mod backends;
pub mod primitives;
pub mod lighting;
pub mod shaders;
pub mod texture;
pub mod pass;

pub use api::{BackendResult, BufferHandle, ProgramHandle, RenderContext, TextureHandle, Topology, Uniform};
pub use backends::headless::HeadlessContext;
pub use lighting::{LightingEnvironment, PipelineFeatures, PointLight};
pub use pass::{Drawable, FrameStats, FrameView, MeshLibrary, MeshSettings, RenderPass, ShapeKind, Surface};
pub use primitives::{CameraPose, Frustum, MeshData, Projection, ProjectionMode};
pub use texture::{DeferredTextureSource, PendingTexture, TextureError, TextureLibrary, TextureSlot, TextureSource};

/// Shader stage, used in compile diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Rendering errors
///
/// Shader compile and link failures are configuration errors: they surface
/// at startup and rendering cannot proceed.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// Failing stage
        stage: ShaderStage,
        /// Compiler diagnostic
        log: String,
    },

    /// The program failed to link
    #[error("program failed to link: {0}")]
    ProgramLink(String),

    /// Vertex data could not be turned into a buffer
    #[error("invalid vertex buffer: {0}")]
    InvalidBuffer(String),

    /// A handle does not name a live backend resource
    #[error("unknown {kind} handle")]
    UnknownHandle {
        /// Resource kind ("program", "buffer", "texture")
        kind: &'static str,
    },

    /// Degenerate math while building per-frame matrices
    #[error("math error: {0}")]
    Math(#[from] MathError),
}
