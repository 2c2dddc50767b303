//! Headless render context
//!
//! Implements [`RenderContext`] without a GPU. Resources live in slot maps,
//! uniforms are tracked per program, and every draw call is appended to a
//! per-frame log together with a snapshot of the uniforms and textures it
//! would have used. Shader sources get a light structural check so broken
//! programs fail at startup the same way a real driver would reject them.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::render::api::{BackendResult, BufferHandle, ProgramHandle, RenderContext, TextureHandle, Topology, Uniform};
use crate::render::{RenderError, ShaderStage};

#[derive(Debug, Clone, Copy)]
struct AttributeBinding {
    buffer: BufferHandle,
    vertices: usize,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    uniforms: HashMap<String, Uniform>,
    attributes: HashMap<String, AttributeBinding>,
}

#[derive(Debug)]
struct BufferRecord {
    floats: usize,
}

/// Texture stored by the headless context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// RGBA8 texel data
    pub rgba: Vec<u8>,
}

/// One recorded draw call
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Program current at draw time
    pub program: ProgramHandle,
    /// Primitive assembly
    pub topology: Topology,
    /// First vertex
    pub first: usize,
    /// Vertex count
    pub count: usize,
    /// Uniform values of the program at draw time
    pub uniforms: HashMap<String, Uniform>,
    /// Texture bound to unit 0 at draw time
    pub texture: Option<TextureHandle>,
    /// Buffer feeding each attribute
    pub attributes: HashMap<String, BufferHandle>,
}

impl DrawCall {
    /// Uniform `name` as recorded for this draw
    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }
}

/// Recording render context with no GPU behind it
#[derive(Debug, Default)]
pub struct HeadlessContext {
    programs: SlotMap<ProgramHandle, ProgramRecord>,
    buffers: SlotMap<BufferHandle, BufferRecord>,
    textures: SlotMap<TextureHandle, TextureRecord>,
    current_program: Option<ProgramHandle>,
    bound_textures: HashMap<u32, TextureHandle>,
    depth_test: bool,
    clear_color: [f32; 4],
    frames: u64,
    frame_draws: Vec<DrawCall>,
    total_draws: u64,
}

impl HeadlessContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls issued since the last clear
    pub fn draws(&self) -> &[DrawCall] {
        &self.frame_draws
    }

    /// Number of clears, i.e. frames started
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls issued over the context's lifetime
    pub const fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Whether depth testing has been enabled
    pub const fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    /// Color used by the most recent clear
    pub const fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Number of live programs
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Number of live vertex buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Look up a texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureRecord> {
        self.textures.get(handle)
    }

    /// Current value of a program uniform
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&Uniform> {
        self.programs.get(program).and_then(|p| p.uniforms.get(name))
    }

    fn program_mut(&mut self, program: ProgramHandle) -> BackendResult<&mut ProgramRecord> {
        self.programs.get_mut(program).ok_or(RenderError::UnknownHandle { kind: "program" })
    }
}

/// Structural compile check for one stage
fn check_stage(stage: ShaderStage, source: &str) -> BackendResult<()> {
    let fail = |log: &str| Err(RenderError::ShaderCompile { stage, log: log.to_string() });

    if source.trim().is_empty() {
        return fail("empty shader source");
    }
    if !source.contains("void main") {
        return fail("missing entry point `void main`");
    }
    let opened = source.matches('{').count();
    let closed = source.matches('}').count();
    if opened != closed {
        return fail(&format!("unbalanced braces ({opened} opened, {closed} closed)"));
    }
    Ok(())
}

impl RenderContext for HeadlessContext {
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> BackendResult<ProgramHandle> {
        check_stage(ShaderStage::Vertex, vertex_source)?;
        check_stage(ShaderStage::Fragment, fragment_source)?;

        if !vertex_source.contains("gl_Position") {
            return Err(RenderError::ProgramLink("vertex stage never writes gl_Position".to_string()));
        }
        if !fragment_source.contains("gl_FragColor") {
            return Err(RenderError::ProgramLink("fragment stage never writes gl_FragColor".to_string()));
        }

        let handle = self.programs.insert(ProgramRecord::default());
        log::debug!("Headless program linked: {:?}", handle);
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> BackendResult<()> {
        if !self.programs.contains_key(program) {
            return Err(RenderError::UnknownHandle { kind: "program" });
        }
        self.current_program = Some(program);
        Ok(())
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle> {
        if data.is_empty() {
            return Err(RenderError::InvalidBuffer("empty vertex data".to_string()));
        }
        if data.len() % std::mem::size_of::<f32>() != 0 {
            return Err(RenderError::InvalidBuffer(format!(
                "{} bytes is not a whole number of floats",
                data.len()
            )));
        }
        let floats = data.len() / std::mem::size_of::<f32>();
        let handle = self.buffers.insert(BufferRecord { floats });
        log::trace!("Headless vertex buffer {:?}: {} floats", handle, floats);
        Ok(handle)
    }

    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        name: &str,
        components: u32,
    ) -> BackendResult<()> {
        let floats = self
            .buffers
            .get(buffer)
            .ok_or(RenderError::UnknownHandle { kind: "buffer" })?
            .floats;
        if !(1..=4).contains(&components) {
            return Err(RenderError::InvalidBuffer(format!(
                "attribute `{name}` has {components} components"
            )));
        }
        if floats % components as usize != 0 {
            return Err(RenderError::InvalidBuffer(format!(
                "attribute `{name}`: {floats} floats do not split into {components}-component vertices"
            )));
        }

        let vertices = floats / components as usize;
        self.program_mut(program)?
            .attributes
            .insert(name.to_string(), AttributeBinding { buffer, vertices });
        Ok(())
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: Uniform) -> BackendResult<()> {
        self.program_mut(program)?.uniforms.insert(name.to_string(), value);
        Ok(())
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> BackendResult<TextureHandle> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(RenderError::InvalidBuffer(format!(
                "texture {width}x{height} needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        let handle = self.textures.insert(TextureRecord { width, height, rgba: rgba.to_vec() });
        log::debug!("Headless texture {:?}: {}x{}", handle, width, height);
        Ok(handle)
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> BackendResult<()> {
        if !self.textures.contains_key(texture) {
            return Err(RenderError::UnknownHandle { kind: "texture" });
        }
        self.bound_textures.insert(unit, texture);
        Ok(())
    }

    fn draw_arrays(&mut self, topology: Topology, first: usize, count: usize) -> BackendResult<()> {
        let program = self.current_program.ok_or(RenderError::UnknownHandle { kind: "program" })?;
        let record = self.programs.get(program).ok_or(RenderError::UnknownHandle { kind: "program" })?;

        let available = record
            .attributes
            .values()
            .map(|binding| binding.vertices)
            .min()
            .ok_or_else(|| RenderError::InvalidBuffer("no vertex attributes bound".to_string()))?;
        if first + count > available {
            return Err(RenderError::InvalidBuffer(format!(
                "draw of vertices {first}..{} exceeds the {available} bound",
                first + count
            )));
        }

        let call = DrawCall {
            program,
            topology,
            first,
            count,
            uniforms: record.uniforms.clone(),
            texture: self.bound_textures.get(&0).copied(),
            attributes: record
                .attributes
                .iter()
                .map(|(name, binding)| (name.clone(), binding.buffer))
                .collect(),
        };
        self.frame_draws.push(call);
        self.total_draws += 1;
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        self.frames += 1;
        self.frame_draws.clear();
    }

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "void main() { gl_Position = vec4(0.0); }";
    const FRAGMENT: &str = "void main() { gl_FragColor = vec4(1.0); }";

    fn floats_as_bytes(data: &[f32]) -> &[u8] {
        bytemuck::cast_slice(data)
    }

    #[test]
    fn test_program_compile_errors_name_the_stage() {
        let mut ctx = HeadlessContext::new();
        match ctx.create_program("", FRAGMENT) {
            Err(RenderError::ShaderCompile { stage, .. }) => assert_eq!(stage, ShaderStage::Vertex),
            other => panic!("expected vertex compile error, got {other:?}"),
        }
        match ctx.create_program(VERTEX, "void main() {") {
            Err(RenderError::ShaderCompile { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("expected fragment compile error, got {other:?}"),
        }
        assert_eq!(ctx.program_count(), 0);
    }

    #[test]
    fn test_program_link_error() {
        let mut ctx = HeadlessContext::new();
        let result = ctx.create_program("void main() { }", FRAGMENT);
        assert!(matches!(result, Err(RenderError::ProgramLink(_))));
    }

    #[test]
    fn test_rejects_ragged_buffers() {
        let mut ctx = HeadlessContext::new();
        assert!(matches!(ctx.create_vertex_buffer(&[]), Err(RenderError::InvalidBuffer(_))));
        assert!(matches!(ctx.create_vertex_buffer(&[0, 1, 2]), Err(RenderError::InvalidBuffer(_))));

        let program = ctx.create_program(VERTEX, FRAGMENT).unwrap();
        let buffer = ctx.create_vertex_buffer(floats_as_bytes(&[0.0; 7])).unwrap();
        let bound = ctx.bind_attribute(program, buffer, "a_Position", 3);
        assert!(matches!(bound, Err(RenderError::InvalidBuffer(_))));
    }

    #[test]
    fn test_draw_records_uniform_snapshot() {
        let mut ctx = HeadlessContext::new();
        let program = ctx.create_program(VERTEX, FRAGMENT).unwrap();
        let buffer = ctx.create_vertex_buffer(floats_as_bytes(&[0.0; 9])).unwrap();
        ctx.bind_attribute(program, buffer, "a_Position", 3).unwrap();
        ctx.use_program(program).unwrap();
        ctx.clear([0.0, 0.0, 0.0, 1.0]);

        ctx.set_uniform(program, "u_Shininess", Uniform::Float(4.0)).unwrap();
        ctx.draw_arrays(Topology::Triangles, 0, 3).unwrap();
        ctx.set_uniform(program, "u_Shininess", Uniform::Float(8.0)).unwrap();
        ctx.draw_arrays(Topology::Triangles, 0, 3).unwrap();

        let draws = ctx.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].uniform("u_Shininess"), Some(&Uniform::Float(4.0)));
        assert_eq!(draws[1].uniform("u_Shininess"), Some(&Uniform::Float(8.0)));
        assert_eq!(draws[0].attributes.get("a_Position"), Some(&buffer));

        ctx.clear([0.0; 4]);
        assert!(ctx.draws().is_empty());
        assert_eq!(ctx.total_draws(), 2);
        assert_eq!(ctx.frames(), 2);
    }

    #[test]
    fn test_draw_past_buffer_end_fails() {
        let mut ctx = HeadlessContext::new();
        let program = ctx.create_program(VERTEX, FRAGMENT).unwrap();
        let buffer = ctx.create_vertex_buffer(floats_as_bytes(&[0.0; 9])).unwrap();
        ctx.bind_attribute(program, buffer, "a_Position", 3).unwrap();
        ctx.use_program(program).unwrap();
        assert!(matches!(
            ctx.draw_arrays(Topology::Triangles, 0, 6),
            Err(RenderError::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_draw_without_program_fails() {
        let mut ctx = HeadlessContext::new();
        assert!(matches!(
            ctx.draw_arrays(Topology::Triangles, 0, 3),
            Err(RenderError::UnknownHandle { kind: "program" })
        ));
    }

    #[test]
    fn test_texture_size_is_checked() {
        let mut ctx = HeadlessContext::new();
        assert!(ctx.create_texture(2, 2, &[255; 12]).is_err());
        let texture = ctx.create_texture(1, 1, &[255, 0, 0, 255]).unwrap();
        assert_eq!(ctx.texture(texture).map(|t| t.width), Some(1));
        ctx.bind_texture(0, texture).unwrap();
    }
}
