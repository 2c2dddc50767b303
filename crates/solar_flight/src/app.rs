//! Solar Flight application
//!
//! Glues the simulation to the engine: reads controls, steps the world,
//! forwards events to the host and draws the frame.

use std::rc::Rc;

use flight_engine::render::{
    DeferredTextureSource, FrameView, LightingEnvironment, MeshSettings, Projection, RenderPass, Surface,
    TextureLibrary,
};
use flight_engine::{AppError, Application, Engine, FrameTick, ManualClock};
use rand::rngs::StdRng;

use crate::config::{ControlsConfig, DemoConfig, GameConfig};
use crate::controls::Controls;
use crate::hud::{self, HostSignals, LogSignals};
use crate::scene;
use crate::simulation::{SceneEvent, SimulationState};

/// Counters over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames simulated
    pub frames: u64,
    /// Rings picked up, across all rounds
    pub rings_collected: usize,
    /// Rounds ended by a crash
    pub crashes: u32,
    /// Rounds ended by collecting everything
    pub wins: u32,
    /// Draw calls issued
    pub draw_calls: usize,
    /// Frames that still showed at least one placeholder texture
    pub placeholder_frames: u64,
}

/// The game as an engine application
pub struct SolarFlightApp {
    config: Rc<GameConfig>,
    controls: Controls,
    rng: StdRng,
    lighting: LightingEnvironment,
    texture_source: DeferredTextureSource,
    signals: Box<dyn HostSignals>,
    state: Option<SimulationState>,
    pass: Option<RenderPass>,
    textures: Option<TextureLibrary>,
    stats: RunStats,
}

impl SolarFlightApp {
    /// Create the app; GPU resources are built in `initialize`
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        let lighting = config.lighting.environment(config.solar_system.sun_radius);
        Self {
            controls: Controls::new(config.controls.clone()),
            texture_source: DeferredTextureSource::new(config.demo.texture_delay_frames),
            config: Rc::new(config),
            rng,
            lighting,
            signals: Box::new(LogSignals),
            state: None,
            pass: None,
            textures: None,
            stats: RunStats::default(),
        }
    }

    /// Send counter and outcome signals to `signals` instead of the log
    #[must_use]
    pub fn with_signals(mut self, signals: Box<dyn HostSignals>) -> Self {
        self.signals = signals;
        self
    }

    /// Counters so far
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Current world, once initialized
    pub const fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    /// Current world, for scripted placement
    pub fn state_mut(&mut self) -> Option<&mut SimulationState> {
        self.state.as_mut()
    }

    /// Textures requested so far
    pub const fn textures(&self) -> Option<&TextureLibrary> {
        self.textures.as_ref()
    }

    fn record(&mut self, events: &[SceneEvent]) {
        for event in events {
            match event {
                SceneEvent::RingCollected { .. } => self.stats.rings_collected += 1,
                SceneEvent::Crashed { .. } => self.stats.crashes += 1,
                SceneEvent::Completed => self.stats.wins += 1,
            }
        }
    }
}

fn not_initialized() -> AppError {
    AppError::GameLogic("application used before initialize".to_string())
}

impl Application for SolarFlightApp {
    fn initialize(&mut self, engine: &mut Engine<'_>) -> Result<(), AppError> {
        log::info!("Initializing Solar Flight...");
        let config = Rc::clone(&self.config);
        let ctx = engine.context();

        let pass = RenderPass::new(ctx, config.lighting.features(), &MeshSettings::from(&config.meshes))?;
        let mut textures = TextureLibrary::new(ctx)?;
        let state = SimulationState::new(Rc::clone(&config), &mut self.rng);

        for body in state.system().bodies() {
            if let Surface::Textured { url, .. } = &body.surface {
                textures.request(url, &mut self.texture_source);
            }
        }
        log::info!(
            "Scene ready: {} planets, {} rings, {} textures requested",
            state.system().planets.len(),
            state.rings().total(),
            textures.len()
        );
        self.signals.collected(0, state.rings().total());

        self.pass = Some(pass);
        self.textures = Some(textures);
        self.state = Some(state);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine<'_>, tick: &FrameTick) -> Result<(), AppError> {
        let delivered = self.texture_source.tick(engine.context())?;
        if delivered > 0 {
            log::debug!("{delivered} texture(s) arrived at frame {}", tick.index);
        }

        let input = self.controls.read(engine.input());
        let state = self.state.take().ok_or_else(not_initialized)?;
        let (state, report) = state.step(&input, &mut self.rng)?;

        hud::dispatch(&report, state.rings().total(), self.signals.as_mut());
        self.record(&report.events);
        self.stats.frames += 1;
        self.state = Some(state);
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine<'_>) -> Result<(), AppError> {
        let (Some(state), Some(pass), Some(textures)) = (&self.state, &self.pass, &self.textures) else {
            return Err(not_initialized());
        };

        let lenses = &self.config.projection;
        let projection = Projection::new(state.projection_mode(), lenses.perspective, lenses.orthographic);
        let view = FrameView::from_camera(&projection, &state.camera().pose())?;
        let drawables = scene::compose(state);

        let frame = pass.draw_frame(engine.context(), &view, &self.lighting, &drawables, textures)?;
        self.stats.draw_calls += frame.draw_calls;
        if frame.placeholder_draws > 0 {
            self.stats.placeholder_frames += 1;
        }
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine<'_>) {
        let stats = &self.stats;
        log::info!(
            "Flight over after {} frames: {} rings, {} wins, {} crashes, {} draw calls",
            stats.frames,
            stats.rings_collected,
            stats.wins,
            stats.crashes,
            stats.draw_calls
        );
    }
}

/// Scripted flight for the headless demo
///
/// Accelerates towards the sun, weaves a little, switches to the cockpit
/// lens and back, swaps the ship model and brakes.
pub fn demo_clock(demo: &DemoConfig, keys: &ControlsConfig) -> ManualClock {
    ManualClock::new(demo.frames, demo.frame_step)
        .hold(&keys.thrust, 0, 240)
        .hold(&keys.pitch_right, 60, 64)
        .hold(&keys.roll_up, 120, 130)
        .hold(&keys.toggle_projection, 200, 202)
        .hold(&keys.roll_down, 260, 270)
        .hold(&keys.toggle_design, 300, 302)
        .hold(&keys.pitch_left, 340, 344)
        .hold(&keys.toggle_projection, 400, 402)
        .hold(&keys.brake, 450, 480)
}
