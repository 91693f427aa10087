//! Application state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use arcana_core::commands::PlayerCommand;
use arcana_core::state::GameStateSnapshot;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles held by the driver while the game loop runs.
///
/// - `mpsc::Sender` is wrapped in `Mutex` so the state is `Sync`
/// - `latest_snapshot` is shared with the game loop thread
pub struct AppState {
    /// `None` until the loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a player command. Returns false when no loop is listening.
    pub fn send(&self, command: PlayerCommand) -> bool {
        let Ok(lock) = self.command_tx.lock() else {
            return false;
        };
        match lock.as_ref() {
            Some(tx) => tx.send(GameLoopCommand::PlayerCommand(command)).is_ok(),
            None => false,
        }
    }

    /// Ask the loop to stop and forget the sender.
    pub fn shutdown(&self) {
        if let Ok(mut lock) = self.command_tx.lock() {
            if let Some(tx) = lock.take() {
                let _ = tx.send(GameLoopCommand::Shutdown);
            }
        }
        if let Ok(mut running) = self.running.lock() {
            *running = false;
        }
    }

    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest().is_none());
        assert!(!*state.running.lock().unwrap());
    }

    #[test]
    fn test_send_without_loop_fails() {
        let state = AppState::new();
        assert!(!state.send(PlayerCommand::Summon));
    }

    #[test]
    fn test_shutdown_sends_and_clears() {
        let state = AppState::new();
        let (tx, rx) = mpsc::channel();
        *state.command_tx.lock().unwrap() = Some(tx);
        *state.running.lock().unwrap() = true;

        assert!(state.send(PlayerCommand::Explore));
        state.shutdown();

        assert!(matches!(
            rx.try_recv(),
            Ok(GameLoopCommand::PlayerCommand(PlayerCommand::Explore))
        ));
        assert!(matches!(rx.try_recv(), Ok(GameLoopCommand::Shutdown)));
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(!*state.running.lock().unwrap());
    }
}
