//! Core types and definitions for the Arcana Bonds engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the unit/skill/banner/story catalog, combatant components, commands,
//! state snapshots, events, and constants.
//! It has no dependency on any runtime framework.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
