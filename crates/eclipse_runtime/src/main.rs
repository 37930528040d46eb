//! Child of Eclipse headless runtime
//!
//! Run with: cargo run -p eclipse_runtime -- [world.toml]

use eclipse_runtime::{Runtime, SimConfig};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let explicit = std::env::args().nth(1).map(PathBuf::from);

    // Config comes first so its filter can seed the logger
    let (config, source) = match SimConfig::load(explicit.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("eclipse: {}", err);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    match &source {
        Some(path) => log::info!("Loaded world from {}", path.display()),
        None => log::info!("No world file found, running defaults"),
    }

    let mut runtime = match Runtime::from_config(&config) {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to build world: {}", err);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Running {} ticks at {:.4}s per tick",
        config.ticks,
        config.delta_time
    );
    let stats = runtime.run(config.ticks, config.delta_time);

    log::info!("=== Run Summary ===");
    log::info!("  Simulated:     {:.2}s over {} ticks", runtime.elapsed(), stats.ticks);
    log::info!("  Sky:           {}", runtime.sky());
    log::info!("  Activations:   {}", stats.activations);
    log::info!("  Solar firings: {}", stats.solar_firings);
    log::info!("  Action faults: {}", stats.action_faults);
    log::info!("  Deaths:        {}", stats.deaths);
    log::info!("  Respawns:      {}", stats.respawns);
    log::info!("  AI changes:    {}", stats.state_changes);
    ExitCode::SUCCESS
}
