//! Gacha roller for Arcana Bonds.
//!
//! Weighted rarity draws, featured-unit bias, ten-pulls with pity,
//! and the shard cost gate. Every function takes its random source as a
//! parameter so results are reproducible under a seeded generator.

pub mod rates;
pub mod summon;

pub use arcana_core as core;
pub use rates::roll_rarity;
pub use summon::{summon_one, summon_ten, try_summon, PulledUnit, SummonBatch};

#[cfg(test)]
mod tests;
