//! Procedural mesh generation
//!
//! Every generator is a pure function of its shape parameters and returns a
//! [`MeshData`] with three parallel, identically indexed attribute arrays:
//! vertex `i` owns `positions[3i..3i + 3]`, `normals[3i..3i + 3]` and
//! `tex_coords[2i..2i + 2]`.
//!
//! Triangulation is non-indexed. Shared edges duplicate vertex data, which is
//! fine for the low segment counts used here.
//!
//! Normals of curved shapes are analytic, so the sphere and torus shade
//! smoothly without a normal-averaging pass. Cube faces carry one constant
//! normal each and shade flat.

use std::f32::consts::{PI, TAU};

use crate::foundation::math::Vec3;
use crate::render::api::Topology;

/// Immutable vertex attribute arrays for one shape
///
/// Built once per shape type and shared by every instance drawn with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// xyz per vertex
    pub positions: Vec<f32>,
    /// Unit normal per vertex
    pub normals: Vec<f32>,
    /// uv per vertex
    pub tex_coords: Vec<f32>,
    /// How consecutive vertices form triangles
    pub topology: Topology,
}

impl MeshData {
    fn with_capacity(vertices: usize, topology: Topology) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            tex_coords: Vec::with_capacity(vertices * 2),
            topology,
        }
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) {
        self.positions.extend_from_slice(&position.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        self.tex_coords.extend_from_slice(&uv);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position of vertex `index`
    pub fn position(&self, index: usize) -> Vec3 {
        let p = &self.positions[index * 3..index * 3 + 3];
        Vec3::new(p[0], p[1], p[2])
    }

    /// Normal of vertex `index`
    pub fn normal(&self, index: usize) -> Vec3 {
        let n = &self.normals[index * 3..index * 3 + 3];
        Vec3::new(n[0], n[1], n[2])
    }

    /// Unit cube centred on the origin
    ///
    /// Extends ±0.5 on every axis. 6 faces × 2 triangles × 3 vertices = 36
    /// vertices, wound counter-clockwise seen from outside, with one outward
    /// normal per face and the full texture mapped onto each face.
    pub fn cube() -> Self {
        // (normal, u axis, v axis) with u × v == normal
        const FACES: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        const TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

        let mut mesh = Self::with_capacity(36, Topology::Triangles);
        for (normal, u, v) in FACES {
            let centre = normal.scaled(0.5);
            for corner in TRIANGLES.map(|i| CORNERS[i]) {
                let position = centre + u.scaled(corner[0] - 0.5) + v.scaled(corner[1] - 0.5);
                mesh.push(position, normal, corner);
            }
        }
        mesh
    }

    /// UV sphere around the origin with +Z as the polar axis
    ///
    /// Produces `6 · slices · stacks` vertices as a triangle list. A point at
    /// latitude `φ ∈ [-π/2, π/2]` and longitude `θ ∈ [0, 2π]` sits at
    /// `r·(cos φ cos θ, cos φ sin θ, sin φ)`; its normal is the same vector
    /// divided by `r`. Texture coordinates are `(j / slices, i / stacks)`.
    ///
    /// Quads touching the poles degenerate into zero-area triangles; they are
    /// kept so the vertex count stays exact.
    pub fn uv_sphere(radius: f32, slices: u32, stacks: u32) -> Self {
        let vertices = 6 * slices as usize * stacks as usize;
        let mut mesh = Self::with_capacity(vertices, Topology::Triangles);

        let lattice = |i: u32, j: u32| {
            let phi = -PI / 2.0 + PI * i as f32 / stacks as f32;
            let theta = TAU * j as f32 / slices as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = Vec3::new(cos_phi * cos_theta, cos_phi * sin_theta, sin_phi);
            let uv = [j as f32 / slices as f32, i as f32 / stacks as f32];
            (normal.scaled(radius), normal, uv)
        };

        for i in 0..stacks {
            for j in 0..slices {
                let quad = [lattice(i, j), lattice(i, j + 1), lattice(i + 1, j + 1), lattice(i + 1, j)];
                for corner in [0, 1, 2, 0, 2, 3] {
                    let (position, normal, uv) = quad[corner];
                    mesh.push(position, normal, uv);
                }
            }
        }
        mesh
    }

    /// Torus lying in the XY plane, axis along +Z
    ///
    /// `major_radius` is the distance from the origin to the tube centre,
    /// `minor_radius` the tube radius. Emits `(M + 1) · (N + 1)` vertices for
    /// `M = major_segments` and `N = minor_segments`, drawn as one triangle
    /// strip.
    ///
    /// The strip runs once around the major circle per minor band, zigzagging
    /// between two neighbouring minor rows so consecutive triples form
    /// front-facing triangles across the band. Band `j` spans rows `j` and
    /// `j + 1`; the last band repeats the first, which keeps the vertex count
    /// exact. The strip is not restarted between bands, so the two triangles
    /// joining one band's end to the next band's start are thin slivers lying
    /// along the `u = 0` seam.
    ///
    /// Normals are `t × s`, the cross product of the tangent along the major
    /// circle `t` and the tangent along the tube `s`, which is the outward
    /// unit normal `(cos v cos u, cos v sin u, sin v)`.
    pub fn torus(major_radius: f32, minor_radius: f32, major_segments: u32, minor_segments: u32) -> Self {
        let vertices = (major_segments as usize + 1) * (minor_segments as usize + 1);
        let mut mesh = Self::with_capacity(vertices, Topology::TriangleStrip);

        for j in 0..=minor_segments {
            for i in 0..=major_segments {
                let row = j + u32::from(i % 2 == 0);
                let u = TAU * i as f32 / major_segments as f32;
                let v = TAU * row as f32 / minor_segments as f32;
                let (sin_u, cos_u) = u.sin_cos();
                let (sin_v, cos_v) = v.sin_cos();

                let tube = major_radius + minor_radius * cos_v;
                let position = Vec3::new(tube * cos_u, tube * sin_u, minor_radius * sin_v);

                let along_major = Vec3::new(-sin_u, cos_u, 0.0);
                let along_tube = Vec3::new(-cos_u * sin_v, -sin_u * sin_v, cos_v);
                let normal = along_major.cross(along_tube);

                let uv = [i as f32 / major_segments as f32, row as f32 / minor_segments as f32];
                mesh.push(position, normal, uv);
            }
        }
        mesh
    }
}
