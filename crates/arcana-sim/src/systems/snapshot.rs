//! Snapshot system: reads the battle world and profile into a
//! `GameStateSnapshot`. Read-only.

use hecs::{Entity, World};

use arcana_core::catalog::Catalog;
use arcana_core::components::Combatant;
use arcana_core::constants::QUEUE_PREVIEW_LEN;
use arcana_core::enums::BattlePhase;
use arcana_core::events::{BattleEvent, GameEvent, PullView};
use arcana_core::state::*;

use crate::battle::BattleSession;

/// Per-tick data that is not part of the profile or the battle.
#[derive(Debug, Default)]
pub struct TickOutput {
    pub tick: u64,
    pub last_pulls: Vec<PullView>,
    pub events: Vec<GameEvent>,
    pub battle_events: Vec<BattleEvent>,
}

pub fn build_snapshot(
    profile: &Profile,
    catalog: &Catalog,
    battle: &BattleSession,
    output: TickOutput,
) -> GameStateSnapshot {
    let phase = battle.phase();
    GameStateSnapshot {
        tick: output.tick,
        phase,
        shards: profile.shards,
        banner: profile.banner.clone(),
        node: build_node(profile, catalog),
        inventory_size: profile.inventory.len(),
        team: build_team(profile, catalog),
        last_pulls: output.last_pulls,
        battle: (phase != BattlePhase::Idle).then(|| build_battle(battle)),
        events: output.events,
        battle_events: output.battle_events,
    }
}

fn build_node(profile: &Profile, catalog: &Catalog) -> Option<NodeView> {
    catalog.node(&profile.node).map(|n| NodeView {
        id: n.id.clone(),
        kind: n.kind,
        text: n.text.clone(),
        next: n.next.clone(),
    })
}

fn build_team(profile: &Profile, catalog: &Catalog) -> Vec<TeamMemberView> {
    profile
        .team
        .iter()
        .filter_map(|member| {
            let template = catalog.unit(&member.owned.unit)?;
            Some(TeamMemberView {
                key: member.owned.key().to_string(),
                unit: template.id.clone(),
                name: template.name.clone(),
                element: template.element,
                rarity: template.rarity,
                vitals: member.vitals,
            })
        })
        .collect()
}

/// Both squads in squad order, plus the first turns of the queue.
pub fn build_battle(battle: &BattleSession) -> BattleView {
    let world = battle.world();
    let squad = |entities: &[Entity]| -> Vec<CombatantView> {
        entities
            .iter()
            .filter_map(|&e| combatant_view(world, e))
            .collect()
    };

    let queue = battle
        .queue()
        .iter()
        .take(QUEUE_PREVIEW_LEN)
        .filter_map(|entry| {
            let c = world.get::<&Combatant>(entry.entity).ok()?;
            Some(QueueEntryView {
                name: c.name.clone(),
                side: entry.side,
                ult: c.ult,
            })
        })
        .collect();

    BattleView {
        players: squad(battle.players()),
        enemies: squad(battle.enemies()),
        queue,
        enemy_power: battle.power(),
    }
}

fn combatant_view(world: &World, entity: Entity) -> Option<CombatantView> {
    let c = world.get::<&Combatant>(entity).ok()?;
    Some(CombatantView {
        name: c.name.clone(),
        unit: c.template.clone(),
        element: c.element,
        side: c.side,
        hp: c.hp,
        hp_max: c.hp_max,
        shield: c.shield,
        ult: c.ult,
        alive: c.alive,
        statuses: c.statuses.iter().map(|s| s.kind()).collect(),
    })
}
