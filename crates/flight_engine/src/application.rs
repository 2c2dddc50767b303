//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError, FrameTick};
use crate::foundation::math::MathError;
use crate::render::RenderError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to run a game on the engine's frame loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Build GPU resources through
    /// [`Engine::context`] here; a failure aborts the run before any frame.
    fn initialize(&mut self, engine: &mut Engine<'_>) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called once per frame, after the host has applied this frame's key
    /// events. [`Engine::input`] is stable for the whole call.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `tick` - Frame index and time step
    fn update(&mut self, engine: &mut Engine<'_>, tick: &FrameTick) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after update, every frame.
    fn render(&mut self, engine: &mut Engine<'_>) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called when the loop ends normally.
    fn cleanup(&mut self, engine: &mut Engine<'_>);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Degenerate math in per-frame state
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
