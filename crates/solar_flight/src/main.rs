//! Solar Flight headless demo
//!
//! Flies a scripted route against the recording render context and logs
//! what happened. Pass a config path as the first argument to override
//! `config/solar_flight.toml`.

use flight_engine::foundation::logging;
use flight_engine::render::HeadlessContext;
use flight_engine::{AppError, Engine, EngineConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use solar_flight::{demo_clock, GameConfig, SolarFlightApp};

const DEFAULT_CONFIG: &str = "config/solar_flight.toml";

fn main() -> Result<(), AppError> {
    logging::init();
    log::info!("Starting Solar Flight...");

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = GameConfig::load_or_default(&path)?;
    config.validate()?;

    let rng = match config.demo.seed {
        Some(seed) => {
            log::info!("Ring placement seeded with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut clock = demo_clock(&config.demo, &config.controls);
    let mut app = SolarFlightApp::new(config, rng);
    let mut context = HeadlessContext::new();

    let summary = Engine::run(&EngineConfig::default(), &mut app, &mut context, &mut clock)?;

    let stats = app.stats();
    log::info!(
        "Demo finished: {} frames, {} draw calls, {} rings collected, {} crashes, {} wins",
        summary.frames,
        context.total_draws(),
        stats.rings_collected,
        stats.crashes,
        stats.wins
    );
    Ok(())
}
