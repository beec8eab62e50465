//! Engine binary for the Armada simulation.
//!
//! Wires configuration, logging, the starting galaxy, the AI turn
//! scheduler and the run loop, then closes with a skirmish between the
//! first pair of rivals and writes the AI save block.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `armada-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the world clock from the world config
//! 4. Create the starting galaxy
//! 5. Register every AI-controlled faction with the scheduler
//! 6. Restore AI memory from the save block, if one exists
//! 7. Run the simulation loop
//! 8. Fight the closing skirmish
//! 9. Write the AI save block

mod error;

use std::path::Path;
use std::sync::Arc;

use armada_core::clock::WorldClock;
use armada_core::config::ArmadaConfig;
use armada_core::operator::OperatorState;
use armada_core::scheduler::TurnScheduler;
use armada_core::{runner, save, skirmish};
use armada_types::FactionId;
use armada_world::Galaxy;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "armada-config.yaml";

/// Reach of station weapons in the closing skirmish.
const SKIRMISH_WEAPON_RANGE: f64 = 60.0;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("armada-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        workers = config.scheduler.worker_count(),
        "Configuration loaded"
    );

    // 3. Create world clock.
    let clock = WorldClock::new(config.world.start()?, config.world.hours_per_tick)
        .map_err(EngineError::from)?;
    info!(start = %clock.start(), hours_per_tick = clock.hours_per_tick(), "World clock initialized");

    // 4. Create starting galaxy.
    let (galaxy, factions) =
        armada_world::create_starting_galaxy(config.world.seed, config.economy)
            .map_err(EngineError::from)?;
    info!(
        planets = galaxy.planets().count(),
        fleets = galaxy.fleets().count(),
        first_faction = %factions.vega,
        "Starting galaxy created"
    );

    // 5. Register AI factions.
    let mut scheduler = TurnScheduler::from_galaxy(
        galaxy,
        clock,
        &config.scheduler,
        config.ai,
    );
    info!(factions = scheduler.factions().len(), "AI factions registered");

    // 6. Restore AI memory.
    if let Some(path) = config.simulation.save_path.as_deref() {
        restore_ai(&mut scheduler, path);
    }

    // 7. Run the simulation.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    let result = runner::run_simulation(&mut scheduler, &operator)
        .await
        .map_err(EngineError::from)?;
    runner::log_simulation_end(&result);

    // 8. Closing skirmish.
    if config.simulation.skirmish_rounds > 0 {
        run_skirmish(&mut scheduler, config.world.seed, config.simulation.skirmish_rounds)
            .await
            .map_err(EngineError::from)?;
    }

    // 9. Write the AI save block.
    if let Some(path) = config.simulation.save_path.as_deref() {
        save::write_ai_save(path, &scheduler.save_ai()).map_err(EngineError::from)?;
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "armada-engine shutdown complete"
    );
    Ok(())
}

/// Load the configuration, falling back to defaults when the file is
/// missing. The flag reports whether the file was read.
fn load_config() -> Result<(ArmadaConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((ArmadaConfig::from_file(config_path)?, true))
    } else {
        Ok((ArmadaConfig::default(), false))
    }
}

/// Load the AI save block into the scheduler. A missing or unreadable
/// block leaves every faction with fresh memory.
fn restore_ai(scheduler: &mut TurnScheduler, path: &Path) {
    if !path.exists() {
        info!(path = %path.display(), "No AI save block yet, starting fresh");
        return;
    }
    match save::read_ai_save(path) {
        Ok(records) => {
            let restored = scheduler.load_ai(&records);
            info!(restored, "AI memory restored");
        }
        Err(e) => warn!(path = %path.display(), error = %e, "Ignoring unreadable AI save block"),
    }
}

/// First pair of factions at war, in ID order.
fn first_rivals(galaxy: &Galaxy) -> Option<(FactionId, FactionId)> {
    galaxy.factions().find_map(|faction| {
        faction
            .at_war_with
            .iter()
            .next()
            .map(|rival| (faction.id, *rival))
    })
}

/// Stage and fight a battle between the first pair of rivals.
async fn run_skirmish(
    scheduler: &mut TurnScheduler,
    seed: u64,
    rounds: u32,
) -> Result<(), armada_core::scheduler::SchedulerError> {
    let world = scheduler.world();
    let staged = {
        let galaxy = world.read().await;
        first_rivals(&galaxy).map(|(a, b)| {
            skirmish::stage_battle(&galaxy, a, b, SKIRMISH_WEAPON_RANGE, seed)
        })
    };
    let Some(mut battle) = staged else {
        info!("No factions at war, skipping skirmish");
        return Ok(());
    };

    let summary = skirmish::fight(scheduler, &mut battle, rounds)?;
    for (faction, survivors) in &summary.survivors {
        info!(faction = %faction, survivors, "Skirmish survivors");
    }
    Ok(())
}
