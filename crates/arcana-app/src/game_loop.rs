//! Game loop thread: ticks the engine at the battle cadence and publishes
//! snapshots.
//!
//! The engine moves into the thread. Commands arrive via an `mpsc` channel
//! and are only applied between ticks. When the loop stops, the thread
//! returns the final profile so the driver can persist it.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use arcana_core::constants::TICK_MILLIS;
use arcana_core::state::{GameStateSnapshot, Profile};
use arcana_sim::GameEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_millis(TICK_MILLIS);

#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    pub tick: Duration,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: TICK_DURATION,
            max_ticks: None,
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the final profile.
pub fn spawn_game_loop(
    engine: GameEngine,
    config: LoopConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<Profile>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("arcana-game-loop".into())
        .spawn(move || run_game_loop(engine, config, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// Runs until Shutdown, channel disconnect or the tick limit.
fn run_game_loop(
    mut engine: GameEngine,
    config: LoopConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> Profile {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0u64;
    tracing::info!(
        target: "arcana::loop",
        tick_ms = config.tick.as_millis() as u64,
        max_ticks = ?config.max_ticks,
        "loop.started"
    );

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return finish(engine, ticks);
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();
        ticks += 1;
        for line in snapshot.battle_events.iter().filter_map(|e| e.log_line()) {
            tracing::info!(target: "arcana::battle_log", "{}", line);
        }

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if config.max_ticks.is_some_and(|max| ticks >= max) {
            return finish(engine, ticks);
        }

        // 4. Sleep until the next tick
        next_tick_time += config.tick;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > config.tick * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

fn finish(engine: GameEngine, ticks: u64) -> Profile {
    tracing::info!(target: "arcana::loop", ticks, "loop.stopped");
    engine.profile().clone()
}
