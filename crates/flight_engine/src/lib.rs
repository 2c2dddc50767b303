//! # Flight Engine
//!
//! A small immediate-mode engine for flying a ship through a procedural
//! scene.
//!
//! ## Features
//!
//! - **Hand-rolled math**: column-major `Mat4`, `Vec3` and axis-angle
//!   quaternions
//! - **Procedural geometry**: cube, UV sphere and torus generators with
//!   analytic normals and texture coordinates
//! - **One lighting pipeline**: ambient, attenuated point lights and
//!   texturing switched by feature flags
//! - **Backend-agnostic rendering**: everything goes through the
//!   `RenderContext` trait; a recording headless context is included
//! - **Deterministic frame loop**: pull-based scheduling with scripted input
//!   for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flight_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _engine: &mut Engine<'_>) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine<'_>, _tick: &FrameTick) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, engine: &mut Engine<'_>) -> Result<(), AppError> {
//!         engine.context().clear([0.0, 0.0, 0.0, 1.0]);
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine<'_>) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut context = HeadlessContext::new();
//!     let mut clock = ManualClock::new(60, 1.0 / 60.0);
//!     Engine::run(&EngineConfig::default(), &mut MyApp, &mut context, &mut clock)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod input;
pub mod physics;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineConfig, EngineError, FrameScheduler, FrameSummary, FrameTick, KeyEvent, ManualClock};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application, Engine, EngineConfig, EngineError, FrameScheduler, FrameSummary, FrameTick,
        ManualClock,
        config::{Config, ConfigError},
        foundation::{
            math::{Mat4, MathError, Vec3},
            quaternion::Quat,
        },
        input::{KeyStates, ToggleLatch},
        physics::{beyond, within, BoundingSphere},
        render::{
            CameraPose, DeferredTextureSource, Drawable, FrameStats, FrameView, Frustum, HeadlessContext,
            LightingEnvironment, MeshData, MeshSettings, PipelineFeatures, PointLight, Projection, ProjectionMode,
            RenderContext, RenderError, RenderPass, ShapeKind, Surface, TextureLibrary, TextureSource,
        },
    };
}
