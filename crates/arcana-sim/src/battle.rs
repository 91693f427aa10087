//! ATB battle session.
//!
//! `BattleSession` owns a hecs world holding one `Combatant` entity per
//! unit. The squads and the turn queue only store entity ids, so every
//! mutation goes through the world. One `tick` resolves exactly one action.

use std::cmp::Ordering;
use std::collections::HashMap;

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use arcana_core::catalog::Catalog;
use arcana_core::components::Combatant;
use arcana_core::constants::{SPEED_JITTER, ULT_MAX};
use arcana_core::enums::{BattleOutcome, BattlePhase, Side, StatKey};
use arcana_core::events::{BattleEvent, HitReport};
use arcana_core::state::{OwnedUnit, Vitals};
use arcana_core::types::NodeId;

use crate::combatant::roll_enemies;
use crate::systems::skills::{perform_skill, perform_ultimate};
use crate::systems::status::{effective_stat, end_of_turn};

/// Skill name used when a combatant has no skills at all.
const BASIC_ATTACK: &str = "Basic Attack";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BattleError {
    #[error("the team has no units")]
    EmptyTeam,
    #[error("no enemies to fight")]
    NoEnemies,
    #[error("a battle is already in progress")]
    AlreadyActive,
    #[error("unknown story node {0}")]
    UnknownNode(NodeId),
}

/// One slot in the turn queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnEntry {
    pub side: Side,
    pub entity: Entity,
    /// Jittered speed recorded on reinsertion; breaks speed ties.
    pub initiative: i64,
}

#[derive(Default)]
pub struct BattleSession {
    world: World,
    players: Vec<Entity>,
    enemies: Vec<Entity>,
    queue: Vec<TurnEntry>,
    phase: BattlePhase,
    power: f64,
    actions: u64,
}

impl BattleSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll a scaled enemy squad for `power` and start against it.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        players: Vec<Combatant>,
        catalog: &Catalog,
        power: f64,
        rng: &mut R,
    ) -> Result<BattleEvent, BattleError> {
        if self.phase == BattlePhase::Active {
            return Err(BattleError::AlreadyActive);
        }
        if players.is_empty() {
            return Err(BattleError::EmptyTeam);
        }
        let enemies = roll_enemies(catalog, power, rng);
        self.start_with(players, enemies, power)
    }

    /// Spawn both squads, seed the queue by effective speed and go Active.
    pub fn start_with(
        &mut self,
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
        power: f64,
    ) -> Result<BattleEvent, BattleError> {
        if self.phase == BattlePhase::Active {
            return Err(BattleError::AlreadyActive);
        }
        if players.is_empty() {
            return Err(BattleError::EmptyTeam);
        }
        if enemies.is_empty() {
            return Err(BattleError::NoEnemies);
        }

        self.clear();
        let enemy_names: Vec<String> = enemies.iter().map(|c| c.name.clone()).collect();

        for mut c in players {
            c.side = Side::Player;
            let entity = self.world.spawn((c,));
            self.players.push(entity);
        }
        for mut c in enemies {
            c.side = Side::Enemy;
            let entity = self.world.spawn((c,));
            self.enemies.push(entity);
        }

        let entries: Vec<TurnEntry> = self
            .players
            .iter()
            .map(|&e| (Side::Player, e))
            .chain(self.enemies.iter().map(|&e| (Side::Enemy, e)))
            .map(|(side, entity)| TurnEntry {
                side,
                entity,
                initiative: self.speed_of(entity).floor() as i64,
            })
            .collect();
        self.queue = entries;
        self.sort_queue();

        self.phase = BattlePhase::Active;
        self.power = power;
        self.actions = 0;

        tracing::info!(
            target: "arcana::battle",
            power,
            players = self.players.len(),
            enemies = self.enemies.len(),
            "battle.started"
        );
        Ok(BattleEvent::BattleStarted {
            power,
            enemies: enemy_names,
        })
    }

    /// Resolve one action. A no-op outside `Active`.
    pub fn tick<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) -> Vec<BattleEvent> {
        if self.phase != BattlePhase::Active || self.queue.is_empty() {
            return Vec::new();
        }
        self.actions += 1;
        let mut events = Vec::new();

        let entry = self.queue.remove(0);
        let Some(actor) = self.snapshot_of(entry.entity) else {
            return events;
        };
        if !actor.alive {
            events.push(BattleEvent::TurnSkipped { actor: actor.name });
            return events;
        }

        self.act(&entry, &actor, catalog, rng, &mut events);

        for entity in self.players.iter().chain(self.enemies.iter()) {
            if let Ok(mut combatant) = self.world.get::<&mut Combatant>(*entity) {
                events.extend(end_of_turn(&mut combatant));
            }
        }

        if self.squad_wiped(&self.enemies) {
            self.resolve(BattleOutcome::Victory, &mut events);
        } else if self.squad_wiped(&self.players) {
            self.resolve(BattleOutcome::Defeat, &mut events);
        } else {
            self.reinsert(entry, rng);
        }
        events
    }

    /// Abandon an active battle. Squads and queue are discarded; player
    /// vitals should be read before calling.
    pub fn retreat(&mut self) -> Option<BattleEvent> {
        if self.phase != BattlePhase::Active {
            return None;
        }
        tracing::info!(target: "arcana::battle", actions = self.actions, "battle.retreated");
        self.clear();
        self.phase = BattlePhase::Idle;
        Some(BattleEvent::Retreated)
    }

    /// Move a resolved battle back to Idle.
    pub fn conclude(&mut self) {
        if matches!(self.phase, BattlePhase::Resolved(_)) {
            self.clear();
            self.phase = BattlePhase::Idle;
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn players(&self) -> &[Entity] {
        &self.players
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn queue(&self) -> &[TurnEntry] {
        &self.queue
    }

    /// Current condition of each player combatant, keyed by inventory identity.
    pub fn player_vitals(&self) -> Vec<(OwnedUnit, Vitals)> {
        self.players
            .iter()
            .filter_map(|&e| self.world.get::<&Combatant>(e).ok())
            .map(|c| {
                (
                    OwnedUnit {
                        unit: c.template.clone(),
                        roll_id: c.roll_id.clone(),
                    },
                    Vitals {
                        hp: c.hp,
                        hp_max: c.hp_max,
                        alive: c.alive,
                    },
                )
            })
            .collect()
    }

    /// Mutable access to one combatant, for setting up scenarios.
    pub fn combatant_mut(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, Combatant>> {
        self.world.get::<&mut Combatant>(entity).ok()
    }

    fn act<R: Rng + ?Sized>(
        &mut self,
        entry: &TurnEntry,
        actor: &Combatant,
        catalog: &Catalog,
        rng: &mut R,
        events: &mut Vec<BattleEvent>,
    ) {
        if actor.is_stunned() {
            tracing::debug!(target: "arcana::battle", actor = %actor.name, "turn.stunned");
            events.push(BattleEvent::Stunned {
                actor: actor.name.clone(),
                side: entry.side,
            });
            return;
        }

        let foes = match entry.side {
            Side::Player => self.enemies.clone(),
            Side::Enemy => self.players.clone(),
        };

        if let (true, Some(ultimate)) = (actor.ult >= ULT_MAX, actor.ultimate.as_ref()) {
            events.push(BattleEvent::Cinematic {
                actor: actor.name.clone(),
                unit: actor.template.clone(),
                ultimate: ultimate.name.clone(),
            });
            let hits = self
                .with_participants(entry.entity, &foes, |attacker, targets| {
                    perform_ultimate(attacker, targets, ultimate, rng)
                })
                .unwrap_or_default();
            tracing::debug!(
                target: "arcana::battle",
                actor = %actor.name,
                ultimate = %ultimate.name,
                hits = hits.len(),
                "turn.ultimate"
            );
            let falls = falls(&hits, entry.side.opponent());
            events.push(BattleEvent::UltimateUsed {
                actor: actor.name.clone(),
                side: entry.side,
                ultimate: ultimate.name.clone(),
                hits,
            });
            events.extend(falls);
            return;
        }

        let skill_name = actor
            .skills
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| BASIC_ATTACK.to_string());
        let skill = catalog.skill_or_fallback(&skill_name);

        let targets = if skill.target.targets_allies() {
            let own = match entry.side {
                Side::Player => &self.players,
                Side::Enemy => &self.enemies,
            };
            own.iter().copied().filter(|&e| e != entry.entity).collect()
        } else {
            foes
        };

        let hits = self
            .with_participants(entry.entity, &targets, |attacker, targets| {
                perform_skill(attacker, targets, &skill, rng)
            })
            .unwrap_or_default();
        tracing::debug!(
            target: "arcana::battle",
            actor = %actor.name,
            skill = %skill.name,
            hits = hits.len(),
            "turn.skill"
        );
        let falls = falls(&hits, entry.side.opponent());
        events.push(BattleEvent::SkillUsed {
            actor: actor.name.clone(),
            side: entry.side,
            skill: skill.name,
            hits,
        });
        events.extend(falls);
    }

    /// Borrow the actor and `targets` (in the given order) mutably at once.
    fn with_participants<T>(
        &mut self,
        actor: Entity,
        targets: &[Entity],
        f: impl FnOnce(&mut Combatant, &mut [&mut Combatant]) -> T,
    ) -> Option<T> {
        let mut attacker = None;
        let mut by_entity: HashMap<Entity, &mut Combatant> = HashMap::new();
        for (entity, combatant) in self.world.query_mut::<&mut Combatant>() {
            if entity == actor {
                attacker = Some(combatant);
            } else if targets.contains(&entity) {
                by_entity.insert(entity, combatant);
            }
        }
        let mut ordered: Vec<&mut Combatant> =
            targets.iter().filter_map(|e| by_entity.remove(e)).collect();
        let attacker = attacker?;
        Some(f(attacker, &mut ordered))
    }

    fn reinsert<R: Rng + ?Sized>(&mut self, mut entry: TurnEntry, rng: &mut R) {
        let jitter = rng.gen_range(-SPEED_JITTER..SPEED_JITTER);
        entry.initiative = ((self.speed_of(entry.entity) + jitter).floor() as i64).max(1);
        self.queue.push(entry);
        self.sort_queue();
    }

    /// Descending effective speed; stable, initiative breaks ties.
    fn sort_queue(&mut self) {
        let world = &self.world;
        let speed = |e: &TurnEntry| {
            world
                .get::<&Combatant>(e.entity)
                .map(|c| effective_stat(&c, StatKey::Spd))
                .unwrap_or(0.0)
        };
        self.queue.sort_by(|a, b| {
            speed(b)
                .partial_cmp(&speed(a))
                .unwrap_or(Ordering::Equal)
                .then(b.initiative.cmp(&a.initiative))
        });
    }

    fn speed_of(&self, entity: Entity) -> f64 {
        self.world
            .get::<&Combatant>(entity)
            .map(|c| effective_stat(&c, StatKey::Spd))
            .unwrap_or(0.0)
    }

    fn snapshot_of(&self, entity: Entity) -> Option<Combatant> {
        self.world
            .get::<&Combatant>(entity)
            .ok()
            .map(|c| (*c).clone())
    }

    fn squad_wiped(&self, squad: &[Entity]) -> bool {
        squad.iter().all(|&e| {
            self.world
                .get::<&Combatant>(e)
                .map(|c| !c.alive)
                .unwrap_or(true)
        })
    }

    fn resolve(&mut self, outcome: BattleOutcome, events: &mut Vec<BattleEvent>) {
        tracing::info!(
            target: "arcana::battle",
            outcome = ?outcome,
            actions = self.actions,
            "battle.ended"
        );
        self.queue.clear();
        self.phase = BattlePhase::Resolved(outcome);
        events.push(BattleEvent::Ended { outcome });
    }

    fn clear(&mut self) {
        self.world.clear();
        self.players.clear();
        self.enemies.clear();
        self.queue.clear();
    }
}

fn falls(hits: &[HitReport], side: Side) -> Vec<BattleEvent> {
    hits.iter()
        .filter(|h| h.defeated && h.damage > 0)
        .map(|h| BattleEvent::Fell {
            unit: h.target.clone(),
            side,
        })
        .collect()
}
