//! Player profile and the snapshot sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::constants::STARTING_SHARDS;
use crate::enums::*;
use crate::events::{BattleEvent, GameEvent, PullView};
use crate::types::{BannerId, NodeId, RollId, UnitId};

/// One entry of the append-only inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedUnit {
    pub unit: UnitId,
    /// Absent for the starter unit, which is identified by template id.
    #[serde(default)]
    pub roll_id: Option<RollId>,
}

impl OwnedUnit {
    /// Identity used for team membership: roll id, else template id.
    pub fn key(&self) -> &str {
        self.roll_id
            .as_ref()
            .map(|r| r.as_str())
            .unwrap_or(self.unit.as_str())
    }
}

/// Out-of-battle condition of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: u32,
    pub hp_max: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub owned: OwnedUnit,
    /// Written back when a battle ends; `None` until the unit has fought.
    #[serde(default)]
    pub vitals: Option<Vitals>,
}

/// Persistent player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub inventory: Vec<OwnedUnit>,
    pub team: Vec<TeamMember>,
    pub banner: BannerId,
    pub node: NodeId,
    pub shards: u32,
    /// Day label of the last daily bonus claim.
    #[serde(default)]
    pub last_daily: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            inventory: Vec::new(),
            team: Vec::new(),
            banner: BannerId::from("standard"),
            node: NodeId::from("start"),
            shards: STARTING_SHARDS,
            last_daily: None,
        }
    }
}

/// Complete engine state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub tick: u64,
    pub phase: BattlePhase,
    pub shards: u32,
    pub banner: BannerId,
    pub node: Option<NodeView>,
    pub inventory_size: usize,
    pub team: Vec<TeamMemberView>,
    pub last_pulls: Vec<PullView>,
    pub battle: Option<BattleView>,
    pub events: Vec<GameEvent>,
    pub battle_events: Vec<BattleEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub text: String,
    pub next: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberView {
    pub key: String,
    pub unit: UnitId,
    pub name: String,
    pub element: Element,
    pub rarity: Rarity,
    pub vitals: Option<Vitals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantView {
    pub name: String,
    pub unit: UnitId,
    pub element: Element,
    pub side: Side,
    pub hp: u32,
    pub hp_max: u32,
    pub shield: u32,
    pub ult: u32,
    pub alive: bool,
    pub statuses: Vec<StatusKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntryView {
    pub name: String,
    pub side: Side,
    /// Ult gauge percentage.
    pub ult: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleView {
    pub players: Vec<CombatantView>,
    pub enemies: Vec<CombatantView>,
    /// Upcoming turns, front first.
    pub queue: Vec<QueueEntryView>,
    /// Multiplier applied to the enemy squad's hp, atk and def.
    pub enemy_power: f64,
}

/// One row of the collection screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub unit: UnitId,
    pub name: String,
    pub rarity: Rarity,
    pub owned: bool,
}
