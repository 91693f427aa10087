//! ECS components for battle entities.
//!
//! A battle spawns one entity per combatant carrying a `Combatant`.
//! Components are plain data; the rules that mutate them live in the sim crate.

use serde::{Deserialize, Serialize};

use crate::catalog::{StatusEffect, Ultimate};
use crate::enums::{Element, Rarity, Side, StatusKind};
use crate::types::{RollId, UnitId};

/// An active status on a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(flatten)]
    pub effect: StatusEffect,
    /// Remaining end-of-turn passes before removal.
    pub turns: i32,
}

impl Status {
    pub fn kind(&self) -> StatusKind {
        self.effect.kind()
    }
}

/// Battle-scoped state of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub template: UnitId,
    pub roll_id: Option<RollId>,
    pub name: String,
    pub element: Element,
    pub rarity: Rarity,
    pub side: Side,
    pub hp: u32,
    pub hp_max: u32,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    /// Absorbs damage before hp.
    pub shield: u32,
    /// Ult gauge, 0..=100.
    pub ult: u32,
    pub alive: bool,
    pub statuses: Vec<Status>,
    pub skills: Vec<String>,
    pub ultimate: Option<Ultimate>,
}

impl Combatant {
    /// Current hp as a fraction of max; 0 for a zero-hp template.
    pub fn hp_fraction(&self) -> f64 {
        if self.hp_max == 0 {
            0.0
        } else {
            self.hp as f64 / self.hp_max as f64
        }
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind() == kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.has_status(StatusKind::Stun)
    }

    /// Set hp, clamped to `[0, hp_max]`; death at 0.
    pub fn set_hp(&mut self, hp: i64) {
        self.hp = hp.clamp(0, self.hp_max as i64) as u32;
        if self.hp == 0 {
            self.alive = false;
        }
    }
}
