//! Player commands sent from the frontend to the engine.
//!
//! Commands are queued and processed at the next tick boundary, so a battle
//! action is never interrupted halfway.

use serde::{Deserialize, Serialize};

use crate::types::{BannerId, NodeId, RollId, UnitId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Gacha ---
    /// Make a banner the active one.
    SelectBanner { banner: BannerId },
    /// Spend shards on a ten-pull from the active banner.
    Summon,
    /// Collect the one-off exploration reward.
    Explore,
    /// Collect the daily bonus for `day` (any stable day label).
    ClaimDaily { day: String },

    // --- Team ---
    /// Add or remove an owned unit from the team.
    ToggleTeam {
        unit: UnitId,
        roll_id: Option<RollId>,
    },

    // --- Story ---
    /// Resolve the current story node.
    EnterNode,
    /// Move the story pointer.
    Advance { node: NodeId },

    // --- Battle ---
    /// Start a battle outside the story at the given power.
    StartBattle { power: f64 },
    /// Abandon the running battle.
    Retreat,
}
