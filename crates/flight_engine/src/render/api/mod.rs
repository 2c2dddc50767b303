//! Public rendering API
//!
//! The render context trait that backends implement, and the handle and
//! value types that cross it.

pub mod render_backend;

// Re-export commonly used types
pub use render_backend::{BackendResult, BufferHandle, ProgramHandle, RenderContext, TextureHandle, Topology, Uniform};
