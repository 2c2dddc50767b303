//! Backend abstraction trait for the rendering system
//!
//! [`RenderContext`] is the whole surface the engine needs from a graphics
//! API: compile and link a program, upload vertex attributes, set uniforms,
//! create and bind textures, clear, enable depth testing and draw. Shader
//! compilation internals, windowing and presentation stay behind it.

use slotmap::new_key_type;

use crate::foundation::math::{Mat4, Vec3};
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

new_key_type! {
    /// Handle to a linked shader program
    pub struct ProgramHandle;

    /// Handle to a vertex attribute buffer
    pub struct BufferHandle;

    /// Handle to a 2D texture
    pub struct TextureHandle;
}

/// How consecutive vertices are assembled into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every three vertices form an independent triangle
    Triangles,
    /// Each vertex after the second forms a triangle with the two before it
    TriangleStrip,
}

impl Topology {
    /// Triangles produced by `vertex_count` vertices
    pub const fn triangle_count(self, vertex_count: usize) -> usize {
        match self {
            Self::Triangles => vertex_count / 3,
            Self::TriangleStrip => vertex_count.saturating_sub(2),
        }
    }
}

/// A uniform value
#[derive(Debug, Clone, PartialEq)]
pub enum Uniform {
    /// `float`
    Float(f32),
    /// `int` (also used for sampler units)
    Int(i32),
    /// `bool`
    Bool(bool),
    /// `vec3`
    Vec3(Vec3),
    /// `vec3[]`
    Vec3Array(Vec<Vec3>),
    /// `mat4`, column-major
    Mat4(Mat4),
}

/// Immediate-mode rendering context
///
/// Every call takes effect at once; there is no command recording. One
/// context is driven by one thread.
pub trait RenderContext {
    /// Compile both stages and link them into a program
    ///
    /// Failure is a configuration error: [`RenderError::ShaderCompile`] or
    /// [`RenderError::ProgramLink`] carrying the diagnostic log.
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> BackendResult<ProgramHandle>;

    /// Make `program` current for subsequent uniform and draw calls
    fn use_program(&mut self, program: ProgramHandle) -> BackendResult<()>;

    /// Upload raw vertex attribute bytes (tightly packed `f32`s)
    fn create_vertex_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle>;

    /// Feed `buffer` to the attribute `name` of `program`, `components` floats per vertex
    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        name: &str,
        components: u32,
    ) -> BackendResult<()>;

    /// Set a uniform on `program`
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: Uniform) -> BackendResult<()>;

    /// Create an RGBA8 texture of `width` x `height` texels
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> BackendResult<TextureHandle>;

    /// Bind `texture` to texture unit `unit`
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> BackendResult<()>;

    /// Draw `count` vertices starting at `first` from the bound attributes
    fn draw_arrays(&mut self, topology: Topology, first: usize, count: usize) -> BackendResult<()>;

    /// Clear the color and depth buffers
    fn clear(&mut self, color: [f32; 4]);

    /// Turn on depth testing
    fn enable_depth_test(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_counts() {
        assert_eq!(Topology::Triangles.triangle_count(36), 12);
        assert_eq!(Topology::TriangleStrip.triangle_count(10), 8);
        assert_eq!(Topology::TriangleStrip.triangle_count(1), 0);
    }
}
