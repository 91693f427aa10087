//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Elemental affinity of a unit.
///
/// Four elements form an advantage cycle (ember → gale → terra → aqua → ember).
/// Arc sits outside the cycle and is neutral against everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Ember,
    Aqua,
    Gale,
    Terra,
    Arc,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Ember,
        Element::Aqua,
        Element::Gale,
        Element::Terra,
        Element::Arc,
    ];

    /// The element this one has the advantage over, if any.
    pub fn beats(self) -> Option<Element> {
        match self {
            Element::Ember => Some(Element::Gale),
            Element::Gale => Some(Element::Terra),
            Element::Terra => Some(Element::Aqua),
            Element::Aqua => Some(Element::Ember),
            Element::Arc => None,
        }
    }
}

/// Gacha rarity tier, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    SS,
    S,
    A,
    B,
}

impl Rarity {
    /// True for A and above. A ten-pull with none of these triggers pity.
    pub fn is_pity_floor(self) -> bool {
        matches!(self, Rarity::SS | Rarity::S | Rarity::A)
    }
}

/// Which squad a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Status effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Burn,
    Bleed,
    Shock,
    Stun,
    Shield,
    Slow,
    AtkUp,
}

/// Targeting rule attached to a skill or ultimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetTag {
    /// Most-wounded living foe.
    #[default]
    #[serde(rename = "single")]
    Single,
    /// First two living foes in squad order.
    #[serde(rename = "multi2")]
    Multi2,
    /// Every living foe.
    #[serde(rename = "all")]
    All,
    /// Resolved exactly like `All`.
    #[serde(rename = "line")]
    Line,
    /// Strikes the most-wounded foe; its status (a shield) lands on the caster.
    #[serde(rename = "self")]
    SelfOnly,
    /// Support on the caster's own squad. Deals no damage.
    #[serde(rename = "allyAll")]
    AllyAll,
}

impl TargetTag {
    /// Whether the caller should hand this skill the caster's own squad.
    pub fn targets_allies(self) -> bool {
        matches!(self, TargetTag::AllyAll)
    }
}

/// Stat keys readable through status modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Atk,
    Def,
    Spd,
}

/// Story node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Camp,
    Battle,
    Loot,
    Elite,
    Boss,
}

impl NodeKind {
    pub fn starts_battle(self) -> bool {
        matches!(self, NodeKind::Battle | NodeKind::Elite | NodeKind::Boss)
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Turn scheduler phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No battle running.
    #[default]
    Idle,
    /// Battle running, queue non-empty.
    Active,
    /// Terminal condition reached on the last tick.
    Resolved(BattleOutcome),
}
