//! Battle and progression engine for Arcana Bonds.
//!
//! Owns the battle session (a hecs world of combatants plus the ATB queue),
//! resolves skills, statuses and ultimates, walks the story graph, and
//! produces `GameStateSnapshot`s for the frontend.

pub mod battle;
pub mod combatant;
pub mod engine;
pub mod roster;
pub mod story;
pub mod systems;

pub use arcana_core as core;
pub use engine::{EngineConfig, GameEngine, VictoryReward};
