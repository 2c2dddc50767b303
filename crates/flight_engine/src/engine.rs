//! Core engine implementation
//!
//! The frame loop is pull-based. A [`FrameScheduler`] hands out one
//! [`FrameTick`] at a time and applies pending key events in between, so
//! there is exactly one frame in flight and input never changes mid-frame.
//! The loop ends when the scheduler stops producing frames, the application
//! calls [`Engine::quit`], or the configured frame cap is hit.

use std::collections::BTreeMap;

use crate::application::Application;
use crate::input::KeyStates;
use crate::render::RenderContext;
use thiserror::Error;

/// One frame handed out by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Zero-based frame number
    pub index: u64,
    /// Seconds since the previous frame
    pub delta_time: f32,
}

/// Source of frames
///
/// Implementations stand in for the host's "request next frame" callback.
/// Before returning a tick they apply whatever key events arrived since the
/// previous one; returning `None` cancels the loop.
pub trait FrameScheduler {
    /// Apply pending input, then yield the next frame
    fn next_frame(&mut self, keys: &mut KeyStates) -> Option<FrameTick>;
}

/// A scripted key transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key name
    pub key: String,
    /// Down (`true`) or up (`false`)
    pub pressed: bool,
}

/// Deterministic scheduler with a fixed step and scripted input
///
/// Events scheduled at frame `n` are applied just before frame `n` starts.
#[derive(Debug, Clone)]
pub struct ManualClock {
    frames: u64,
    step: f32,
    next: u64,
    script: BTreeMap<u64, Vec<KeyEvent>>,
}

impl ManualClock {
    /// Clock producing `frames` frames of `step` seconds each
    pub fn new(frames: u64, step: f32) -> Self {
        Self { frames, step, next: 0, script: BTreeMap::new() }
    }

    /// Schedule a key-down before `frame`
    #[must_use]
    pub fn press_at(mut self, frame: u64, key: &str) -> Self {
        self.push(frame, key, true);
        self
    }

    /// Schedule a key-up before `frame`
    #[must_use]
    pub fn release_at(mut self, frame: u64, key: &str) -> Self {
        self.push(frame, key, false);
        self
    }

    /// Hold `key` for frames `from..until`
    #[must_use]
    pub fn hold(self, key: &str, from: u64, until: u64) -> Self {
        self.press_at(from, key).release_at(until, key)
    }

    /// Frames still to come
    pub const fn remaining(&self) -> u64 {
        self.frames.saturating_sub(self.next)
    }

    fn push(&mut self, frame: u64, key: &str, pressed: bool) {
        self.script.entry(frame).or_default().push(KeyEvent { key: key.to_string(), pressed });
    }
}

impl FrameScheduler for ManualClock {
    fn next_frame(&mut self, keys: &mut KeyStates) -> Option<FrameTick> {
        if self.next >= self.frames {
            return None;
        }
        let index = self.next;
        if let Some(events) = self.script.remove(&index) {
            for event in events {
                keys.set(&event.key, event.pressed);
            }
        }
        self.next += 1;
        Some(FrameTick { index, delta_time: self.step })
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Stop after this many frames even if the scheduler keeps going
    pub max_frames: Option<u64>,
}

/// What a finished run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frames fully updated and rendered
    pub frames: u64,
}

/// Main engine struct
///
/// Owns the key state and borrows the render context for the duration of a
/// run. Applications reach both through it.
pub struct Engine<'a> {
    context: &'a mut dyn RenderContext,
    input: KeyStates,
    frame: u64,
    running: bool,
}

impl<'a> Engine<'a> {
    /// Create an engine drawing through `context`
    pub fn new(context: &'a mut dyn RenderContext) -> Self {
        Self { context, input: KeyStates::new(), frame: 0, running: true }
    }

    /// Run the frame loop until the scheduler, the application or the frame cap stops it
    pub fn run<A: Application + ?Sized>(
        config: &EngineConfig,
        app: &mut A,
        context: &'a mut dyn RenderContext,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<FrameSummary, EngineError> {
        log::info!("Initializing engine...");
        let mut engine = Engine::new(context);

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let mut summary = FrameSummary::default();

        while engine.running {
            if config.max_frames.is_some_and(|cap| summary.frames >= cap) {
                log::info!("Frame cap of {} reached", summary.frames);
                break;
            }
            let Some(tick) = scheduler.next_frame(&mut engine.input) else {
                log::debug!("Scheduler cancelled the loop");
                break;
            };
            engine.frame = tick.index;

            app.update(&mut engine, &tick)
                .map_err(|e| EngineError::ApplicationError(format!("App update (frame {}): {e}", tick.index)))?;
            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render (frame {}): {e}", tick.index)))?;
            summary.frames += 1;
        }

        app.cleanup(&mut engine);

        log::info!("Engine shutdown complete after {} frames", summary.frames);
        Ok(summary)
    }

    /// Render context for this run
    pub fn context(&mut self) -> &mut dyn RenderContext {
        &mut *self.context
    }

    /// Key state as of the start of this frame
    pub const fn input(&self) -> &KeyStates {
        &self.input
    }

    /// Index of the frame being processed
    pub const fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Request engine shutdown after the current frame
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
