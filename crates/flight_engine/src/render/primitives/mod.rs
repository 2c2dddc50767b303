//! Core primitive types for rendering
//!
//! Procedural meshes plus the camera pose and projection math used to place
//! them on screen.

pub mod mesh;
pub mod camera;

// Re-export commonly used types
pub use mesh::MeshData;
pub use camera::{CameraPose, Frustum, Projection, ProjectionMode};
