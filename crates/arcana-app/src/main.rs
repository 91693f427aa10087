use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use arcana_app::game_loop::{spawn_game_loop, LoopConfig, TICK_DURATION};
use arcana_app::persistence::{load_profile, save_profile, JsonFileStore};
use arcana_app::state::AppState;
use arcana_core::catalog::load_catalog_from_env;
use arcana_core::commands::PlayerCommand;
use arcana_core::state::Profile;
use arcana_sim::{EngineConfig, GameEngine};

struct Args {
    seed: Option<u64>,
    save_dir: Option<PathBuf>,
    tick_ms: Option<u64>,
    max_ticks: Option<u64>,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: None,
        save_dir: None,
        tick_ms: None,
        max_ticks: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--save-dir" => args.save_dir = it.next().map(PathBuf::from),
            "--tick-ms" => args.tick_ms = it.next().and_then(|s| s.parse().ok()),
            "--max-ticks" => args.max_ticks = it.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    args
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args();
    let catalog = Arc::new(load_catalog_from_env().context("loading catalog")?);
    let config = EngineConfig {
        seed: args.seed.unwrap_or(42),
        ..Default::default()
    };

    let save_dir = args.save_dir.unwrap_or_else(|| PathBuf::from("saves"));
    let mut store = JsonFileStore::new(save_dir);
    let defaults = Profile {
        banner: config.default_banner.clone(),
        node: config.start_node.clone(),
        shards: config.starting_shards,
        ..Default::default()
    };
    let profile = load_profile(&store, defaults);
    info!(
        seed = config.seed,
        inventory = profile.inventory.len(),
        shards = profile.shards,
        dir = %store.dir().display(),
        "starting"
    );

    // A headless session without a frontend runs a short demo battle.
    let has_team = !profile.team.is_empty();
    let engine = GameEngine::with_profile(config, catalog, profile);
    let starter = engine.profile().inventory.first().cloned();

    let loop_config = LoopConfig {
        tick: args
            .tick_ms
            .map(Duration::from_millis)
            .unwrap_or(TICK_DURATION),
        max_ticks: Some(args.max_ticks.unwrap_or(30)),
    };
    let state = AppState::new();
    let (tx, handle) = spawn_game_loop(engine, loop_config, Arc::clone(&state.latest_snapshot))
        .context("spawning game loop")?;
    *state
        .command_tx
        .lock()
        .map_err(|_| anyhow!("command channel lock poisoned"))? = Some(tx);
    if let Ok(mut running) = state.running.lock() {
        *running = true;
    }

    if !has_team {
        if let Some(owned) = starter {
            state.send(PlayerCommand::ToggleTeam {
                unit: owned.unit,
                roll_id: owned.roll_id,
            });
        }
    }
    state.send(PlayerCommand::StartBattle { power: 1.0 });

    let profile = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;
    state.shutdown();

    save_profile(&mut store, &profile).context("saving profile")?;
    if let Some(snapshot) = state.latest() {
        println!(
            "Arcana Bonds | tick: {} | phase: {:?} | shards: {} | units: {} | team: {}",
            snapshot.tick,
            snapshot.phase,
            snapshot.shards,
            snapshot.inventory_size,
            snapshot.team.len()
        );
    }
    Ok(())
}
