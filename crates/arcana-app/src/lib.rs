//! Arcana Bonds headless driver.
//!
//! Runs the game engine on its own thread at the battle cadence, forwards
//! player commands over a channel, and persists the profile through a
//! key-value store.

pub mod game_loop;
pub mod persistence;
pub mod state;

pub use arcana_core as core;
