//! Render pass driver
//!
//! Turns the frame's drawable list into draw calls. Geometry for each shape
//! kind is uploaded once at startup and shared by every instance; per-object
//! state travels entirely in uniforms. One drawable is one draw call, with
//! no batching or instancing.

use crate::foundation::math::{Mat4, MathResult, Vec3};
use crate::render::api::{BackendResult, BufferHandle, ProgramHandle, RenderContext, Topology, Uniform};
use crate::render::lighting::{LightingEnvironment, PipelineFeatures};
use crate::render::primitives::{CameraPose, MeshData, Projection};
use crate::render::shaders::{attributes, ProgramSource};
use crate::render::texture::TextureLibrary;

/// Shared mesh a drawable is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Unit cube
    Cube,
    /// Unit-radius UV sphere
    Sphere,
    /// Torus in the XY plane
    Ring,
}

/// How a drawable is colored
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Flat color
    Color(Vec3),
    /// Texture by URL, with the color to use when texturing is disabled
    Textured {
        /// Texture source URL
        url: String,
        /// Color when the pipeline has no texturing
        fallback: Vec3,
    },
}

/// One object to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Instance (model) transform
    pub transform: Mat4,
    /// Shared mesh
    pub shape: ShapeKind,
    /// Color or texture
    pub surface: Surface,
    /// Specular exponent; `0` is matte
    pub shininess: f32,
    /// Ignore point lights and show the base color
    pub emissive: bool,
}

impl Drawable {
    /// Matte, non-emissive drawable
    pub const fn new(shape: ShapeKind, transform: Mat4, surface: Surface) -> Self {
        Self { transform, shape, surface, shininess: 0.0, emissive: false }
    }

    /// Set the specular exponent
    #[must_use]
    pub const fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Mark as self-lit
    #[must_use]
    pub const fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }
}

/// Tessellation of the shared meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSettings {
    /// Sphere longitude segments
    pub sphere_slices: u32,
    /// Sphere latitude segments
    pub sphere_stacks: u32,
    /// Ring tube-centre radius
    pub ring_major_radius: f32,
    /// Ring tube radius
    pub ring_minor_radius: f32,
    /// Ring segments around the major circle
    pub ring_major_segments: u32,
    /// Ring segments around the tube
    pub ring_minor_segments: u32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            sphere_slices: 24,
            sphere_stacks: 16,
            ring_major_radius: 1.0,
            ring_minor_radius: 0.15,
            ring_major_segments: 24,
            ring_minor_segments: 12,
        }
    }
}

/// Attribute buffers of one uploaded mesh
#[derive(Debug, Clone, Copy)]
pub struct GpuMesh {
    positions: BufferHandle,
    normals: BufferHandle,
    tex_coords: BufferHandle,
    /// Vertices per draw
    pub vertex_count: usize,
    /// Primitive assembly
    pub topology: Topology,
}

impl GpuMesh {
    /// Upload `mesh`'s three attribute arrays
    pub fn upload(ctx: &mut dyn RenderContext, mesh: &MeshData) -> BackendResult<Self> {
        Ok(Self {
            positions: ctx.create_vertex_buffer(bytemuck::cast_slice(&mesh.positions))?,
            normals: ctx.create_vertex_buffer(bytemuck::cast_slice(&mesh.normals))?,
            tex_coords: ctx.create_vertex_buffer(bytemuck::cast_slice(&mesh.tex_coords))?,
            vertex_count: mesh.vertex_count(),
            topology: mesh.topology,
        })
    }

    fn bind(&self, ctx: &mut dyn RenderContext, program: ProgramHandle) -> BackendResult<()> {
        ctx.bind_attribute(program, self.positions, attributes::POSITION, 3)?;
        ctx.bind_attribute(program, self.normals, attributes::NORMAL, 3)?;
        ctx.bind_attribute(program, self.tex_coords, attributes::TEX_COORD, 2)
    }
}

/// One uploaded mesh per shape kind
#[derive(Debug, Clone, Copy)]
pub struct MeshLibrary {
    cube: GpuMesh,
    sphere: GpuMesh,
    ring: GpuMesh,
}

impl MeshLibrary {
    /// Generate and upload the cube, sphere and ring meshes
    pub fn upload(ctx: &mut dyn RenderContext, settings: &MeshSettings) -> BackendResult<Self> {
        let cube = MeshData::cube();
        let sphere = MeshData::uv_sphere(1.0, settings.sphere_slices, settings.sphere_stacks);
        let ring = MeshData::torus(
            settings.ring_major_radius,
            settings.ring_minor_radius,
            settings.ring_major_segments,
            settings.ring_minor_segments,
        );
        log::info!(
            "Uploading meshes: cube {} / sphere {} / ring {} vertices",
            cube.vertex_count(),
            sphere.vertex_count(),
            ring.vertex_count()
        );
        Ok(Self {
            cube: GpuMesh::upload(ctx, &cube)?,
            sphere: GpuMesh::upload(ctx, &sphere)?,
            ring: GpuMesh::upload(ctx, &ring)?,
        })
    }

    /// Mesh for `shape`
    pub const fn get(&self, shape: ShapeKind) -> &GpuMesh {
        match shape {
            ShapeKind::Cube => &self.cube,
            ShapeKind::Sphere => &self.sphere,
            ShapeKind::Ring => &self.ring,
        }
    }
}

/// Camera matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Projection matrix
    pub projection: Mat4,
    /// World-to-view matrix
    pub view: Mat4,
    /// Eye position, for specular highlights
    pub eye: Vec3,
    /// Clear color
    pub clear_color: [f32; 4],
}

impl FrameView {
    /// Matrices for `pose` seen through `projection`
    pub fn from_camera(projection: &Projection, pose: &CameraPose) -> MathResult<Self> {
        Ok(Self {
            projection: projection.matrix(),
            view: pose.view_matrix()?,
            eye: pose.eye,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        })
    }

    /// `projection · view`
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// What one frame cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued
    pub draw_calls: usize,
    /// Vertices submitted
    pub vertices: usize,
    /// Textured draws that fell back to the placeholder
    pub placeholder_draws: usize,
}

/// Per-frame driver owning the program and the shared meshes
#[derive(Debug)]
pub struct RenderPass {
    program: ProgramHandle,
    features: PipelineFeatures,
    meshes: MeshLibrary,
}

impl RenderPass {
    /// Build the program for `features`, upload the meshes and enable depth testing
    ///
    /// # Errors
    /// Shader compile/link failures are returned as-is; they are fatal at
    /// startup.
    pub fn new(ctx: &mut dyn RenderContext, features: PipelineFeatures, meshes: &MeshSettings) -> BackendResult<Self> {
        let source = ProgramSource::for_features(features);
        let program = ctx.create_program(&source.vertex, &source.fragment).map_err(|err| {
            log::error!("Failed to build the scene program: {err}");
            err
        })?;
        ctx.use_program(program)?;
        ctx.enable_depth_test();

        let meshes = MeshLibrary::upload(ctx, meshes)?;
        log::info!("Render pass ready with features {:?}", features);
        Ok(Self { program, features, meshes })
    }

    /// Linked program
    pub const fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Enabled pipeline features
    pub const fn features(&self) -> PipelineFeatures {
        self.features
    }

    /// Uploaded meshes
    pub const fn meshes(&self) -> &MeshLibrary {
        &self.meshes
    }

    /// Clear and draw every drawable
    pub fn draw_frame(
        &self,
        ctx: &mut dyn RenderContext,
        view: &FrameView,
        lighting: &LightingEnvironment,
        drawables: &[Drawable],
        textures: &TextureLibrary,
    ) -> BackendResult<FrameStats> {
        let program = self.program;
        ctx.clear(view.clear_color);
        ctx.use_program(program)?;
        lighting.apply(ctx, program)?;
        ctx.set_uniform(program, "u_EyePosition", Uniform::Vec3(view.eye))?;
        ctx.set_uniform(program, "u_Texture", Uniform::Int(0))?;

        let view_projection = view.view_projection();
        let textured = self.features.contains(PipelineFeatures::TEXTURED);
        let mut stats = FrameStats::default();

        for drawable in drawables {
            let mesh = self.meshes.get(drawable.shape);
            mesh.bind(ctx, program)?;

            let mvp = view_projection * drawable.transform;
            let normal_matrix = drawable.transform.inverse().transpose();
            ctx.set_uniform(program, "u_Mvp", Uniform::Mat4(mvp))?;
            ctx.set_uniform(program, "u_Model", Uniform::Mat4(drawable.transform))?;
            ctx.set_uniform(program, "u_NormalMatrix", Uniform::Mat4(normal_matrix))?;
            ctx.set_uniform(program, "u_Shininess", Uniform::Float(drawable.shininess))?;
            ctx.set_uniform(program, "u_Emissive", Uniform::Bool(drawable.emissive))?;

            match &drawable.surface {
                Surface::Textured { url, .. } if textured => {
                    let texture = textures.resolve(url);
                    if texture == textures.placeholder() {
                        stats.placeholder_draws += 1;
                    }
                    ctx.bind_texture(0, texture)?;
                    ctx.set_uniform(program, "u_UseTexture", Uniform::Bool(true))?;
                    ctx.set_uniform(program, "u_Color", Uniform::Vec3(Vec3::ONE))?;
                }
                Surface::Textured { fallback: color, .. } | Surface::Color(color) => {
                    ctx.set_uniform(program, "u_UseTexture", Uniform::Bool(false))?;
                    ctx.set_uniform(program, "u_Color", Uniform::Vec3(*color))?;
                }
            }

            ctx.draw_arrays(mesh.topology, 0, mesh.vertex_count)?;
            stats.draw_calls += 1;
            stats.vertices += mesh.vertex_count;
        }

        log::trace!("Frame drawn: {:?}", stats);
        Ok(stats)
    }
}
