//! Combat rules operating on combatants.
//!
//! Systems are pure functions over `Combatant` values and an injected RNG.
//! They do not own state; the battle session owns the world they mutate.

pub mod damage;
pub mod skills;
pub mod snapshot;
pub mod status;
pub mod targeting;
