//! Story graph walker.

use arcana_core::catalog::{Catalog, StoryNode};
use arcana_core::constants::DEFAULT_ENEMY_POWER;
use arcana_core::state::TeamMember;
use arcana_core::types::NodeId;

/// What entering a node produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeOutcome {
    /// Rewards were applied on the spot.
    Rewarded { shards: u32, heal: Option<f64> },
    /// The caller should start a battle at this power.
    BattleRequested { enemy_power: f64 },
}

/// Apply a node's effect.
///
/// Camp and loot nodes pay out immediately: shards are added and the heal
/// fraction restores that share of max hp to every living member that has
/// fought. Battle, elite and boss nodes only report the requested power.
pub fn enter_node(node: &StoryNode, shards: &mut u32, team: &mut [TeamMember]) -> NodeOutcome {
    if node.kind.starts_battle() {
        return NodeOutcome::BattleRequested {
            enemy_power: node.enemy_power.unwrap_or(DEFAULT_ENEMY_POWER),
        };
    }

    let reward = node.reward.unwrap_or_default();
    let gained = reward.shards.unwrap_or(0);
    *shards = shards.saturating_add(gained);

    if let Some(fraction) = reward.heal {
        for vitals in team.iter_mut().filter_map(|m| m.vitals.as_mut()) {
            if !vitals.alive {
                continue;
            }
            let restored = (vitals.hp_max as f64 * fraction).floor().max(0.0) as u32;
            vitals.hp = vitals.hp.saturating_add(restored).min(vitals.hp_max);
        }
    }

    tracing::info!(
        target: "arcana::story",
        node = %node.id,
        shards = gained,
        heal = ?reward.heal,
        "story.rewarded"
    );
    NodeOutcome::Rewarded {
        shards: gained,
        heal: reward.heal,
    }
}

/// Moves the story pointer.
pub struct StoryWalker<'a> {
    current: &'a mut NodeId,
    catalog: &'a Catalog,
}

impl<'a> StoryWalker<'a> {
    pub fn new(current: &'a mut NodeId, catalog: &'a Catalog) -> Self {
        Self { current, catalog }
    }

    pub fn current(&self) -> Option<&'a StoryNode> {
        self.catalog.node(&*self.current)
    }

    /// Point at `to`. Reachability is not enforced; jumps off the graph's
    /// edges are only logged.
    pub fn advance(&mut self, to: NodeId) {
        let is_edge = self
            .current()
            .map(|n| n.next.contains(&to))
            .unwrap_or(false);
        if !is_edge {
            tracing::debug!(
                target: "arcana::story",
                from = %self.current,
                to = %to,
                "story.off_edge"
            );
        }
        tracing::info!(target: "arcana::story", node = %to, "story.advanced");
        *self.current = to;
    }
}
