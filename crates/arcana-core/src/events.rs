//! Events emitted by the engine for the log, the cinematic layer and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{BannerId, NodeId, RollId, UnitId};

/// A status that stuck after a successful roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedStatus {
    pub kind: StatusKind,
    /// Name of the unit that received it (the caster, for shields).
    pub applied_to: String,
    /// New shield value when `kind` is shield.
    pub shield: Option<u32>,
}

/// Outcome of one skill or ultimate against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    pub target: String,
    /// Damage that reached hp after shield absorption.
    pub damage: u32,
    pub absorbed: u32,
    pub applied: Option<AppliedStatus>,
    pub defeated: bool,
}

/// Events produced by the turn scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    BattleStarted { power: f64, enemies: Vec<String> },
    /// Front entry belonged to a fallen unit.
    TurnSkipped { actor: String },
    Stunned { actor: String, side: Side },
    SkillUsed {
        actor: String,
        side: Side,
        skill: String,
        hits: Vec<HitReport>,
    },
    /// Fired before an ultimate resolves.
    Cinematic {
        actor: String,
        unit: UnitId,
        ultimate: String,
    },
    UltimateUsed {
        actor: String,
        side: Side,
        ultimate: String,
        hits: Vec<HitReport>,
    },
    StatusTick {
        unit: String,
        kind: StatusKind,
        damage: u32,
    },
    StatusExpired { unit: String, kind: StatusKind },
    Fell { unit: String, side: Side },
    Ended { outcome: BattleOutcome },
    Retreated,
}

impl BattleEvent {
    /// Human-readable battle log line, if the event has one.
    pub fn log_line(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { .. } => Some("A hostile squad approaches!".to_string()),
            BattleEvent::Stunned { actor, .. } => Some(format!("{actor} is stunned!")),
            BattleEvent::SkillUsed {
                actor, skill, hits, ..
            } => Some(format!("{actor} used {skill}. {}", format_hits(hits))),
            BattleEvent::UltimateUsed {
                actor,
                ultimate,
                hits,
                ..
            } => Some(format!("{actor} used {ultimate}! {}", format_hits(hits))),
            BattleEvent::Fell { unit, .. } => Some(format!("{unit} falls.")),
            BattleEvent::Ended {
                outcome: BattleOutcome::Victory,
            } => Some("Victory!".to_string()),
            BattleEvent::Ended {
                outcome: BattleOutcome::Defeat,
            } => Some("Defeat...".to_string()),
            BattleEvent::Retreated => Some("You retreat from battle.".to_string()),
            BattleEvent::TurnSkipped { .. }
            | BattleEvent::Cinematic { .. }
            | BattleEvent::StatusTick { .. }
            | BattleEvent::StatusExpired { .. } => None,
        }
    }
}

fn format_hits(hits: &[HitReport]) -> String {
    hits.iter()
        .map(|h| match &h.applied {
            Some(a) => format!("{} -{} +{:?}", h.target, h.damage, a.kind),
            None => format!("{} -{}", h.target, h.damage),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A unit as revealed by a summon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullView {
    pub unit: UnitId,
    pub name: String,
    pub rarity: Rarity,
    pub roll_id: RollId,
}

/// Events outside battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SummonCompleted {
        banner: BannerId,
        pulls: Vec<PullView>,
        pity: bool,
    },
    SummonRefused { shards: u32, cost: u32 },
    BannerSelected { banner: BannerId },
    ShardsGranted { amount: u32, reason: ShardSource },
    /// Duplicate explore or daily claim.
    AlreadyClaimed { reason: ShardSource },
    TeamChanged { size: usize },
    TeamFull,
    NodeEntered { node: NodeId, kind: NodeKind },
    Healed { fraction: f64 },
    NodeAdvanced { node: NodeId },
    /// Command not allowed in the current state.
    Rejected { reason: String },
}

/// Why shards were granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShardSource {
    Explore,
    Daily,
    Story,
    Victory,
}
