//! Game engine: the core of Arcana Bonds.
//!
//! `GameEngine` owns the player profile, the battle session and the seeded
//! RNG, processes player commands at tick boundaries, drives one battle
//! action per tick and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arcana_core::catalog::Catalog;
use arcana_core::commands::PlayerCommand;
use arcana_core::constants::{
    DAILY_BONUS, EXPLORE_REWARD, PULL_COST, STARTING_SHARDS, VICTORY_SHARDS,
};
use arcana_core::enums::{BattleOutcome, BattlePhase};
use arcana_core::events::{BattleEvent, GameEvent, PullView, ShardSource};
use arcana_core::state::{CollectionEntry, GameStateSnapshot, OwnedUnit, Profile};
use arcana_core::types::{BannerId, NodeId};

use crate::battle::{BattleError, BattleSession};
use crate::roster::{self, TeamToggle};
use crate::story::{enter_node, NodeOutcome, StoryWalker};
use crate::systems::snapshot::{build_snapshot, TickOutput};

/// Shards paid out when a battle is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictoryReward {
    None,
    Fixed(u32),
}

impl Default for VictoryReward {
    fn default() -> Self {
        VictoryReward::Fixed(VICTORY_SHARDS)
    }
}

impl VictoryReward {
    pub fn amount(self) -> u32 {
        match self {
            VictoryReward::None => 0,
            VictoryReward::Fixed(n) => n,
        }
    }
}

/// Configuration for a new engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed. Same seed and commands give the same game.
    pub seed: u64,
    pub starting_shards: u32,
    pub pull_cost: u32,
    pub explore_reward: u32,
    pub daily_bonus: u32,
    pub victory_reward: VictoryReward,
    pub start_node: NodeId,
    pub default_banner: BannerId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_shards: STARTING_SHARDS,
            pull_cost: PULL_COST,
            explore_reward: EXPLORE_REWARD,
            daily_bonus: DAILY_BONUS,
            victory_reward: VictoryReward::default(),
            start_node: NodeId::from("start"),
            default_banner: BannerId::from("standard"),
        }
    }
}

pub struct GameEngine {
    config: EngineConfig,
    catalog: Arc<Catalog>,
    profile: Profile,
    battle: BattleSession,
    rng: ChaCha8Rng,
    tick: u64,
    command_queue: VecDeque<PlayerCommand>,
    explore_claimed: bool,
    last_pulls: Vec<PullView>,
    events: Vec<GameEvent>,
    battle_events: Vec<BattleEvent>,
}

impl GameEngine {
    /// Start from a fresh profile.
    pub fn new(config: EngineConfig, catalog: Arc<Catalog>) -> Self {
        let profile = Profile {
            inventory: Vec::new(),
            team: Vec::new(),
            banner: config.default_banner.clone(),
            node: config.start_node.clone(),
            shards: config.starting_shards,
            last_daily: None,
        };
        Self::with_profile(config, catalog, profile)
    }

    /// Resume a saved profile. An empty inventory gets a starter unit.
    pub fn with_profile(config: EngineConfig, catalog: Arc<Catalog>, mut profile: Profile) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        if profile.inventory.is_empty() {
            if let Some(starter) = roster::starter_unit(&catalog, &mut rng) {
                tracing::info!(target: "arcana::engine", unit = %starter.unit, "profile.starter");
                profile.inventory.push(starter);
            }
        }
        Self {
            config,
            catalog,
            profile,
            battle: BattleSession::new(),
            rng,
            tick: 0,
            command_queue: VecDeque::new(),
            explore_claimed: false,
            last_pulls: Vec::new(),
            events: Vec::new(),
            battle_events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process queued commands, resolve at most one battle action and
    /// return the resulting snapshot.
    ///
    /// A battle that resolved on the previous tick is concluded first, so
    /// its final state is visible in exactly one snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.tick += 1;
        self.battle.conclude();
        self.process_commands();

        if self.battle.phase() == BattlePhase::Active {
            let events = self.battle.tick(&self.catalog, &mut self.rng);
            self.battle_events.extend(events);
            if let BattlePhase::Resolved(outcome) = self.battle.phase() {
                self.finish_battle(outcome);
            }
        }

        build_snapshot(
            &self.profile,
            &self.catalog,
            &self.battle,
            TickOutput {
                tick: self.tick,
                last_pulls: self.last_pulls.clone(),
                events: std::mem::take(&mut self.events),
                battle_events: std::mem::take(&mut self.battle_events),
            },
        )
    }

    pub fn phase(&self) -> BattlePhase {
        self.battle.phase()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn battle(&self) -> &BattleSession {
        &self.battle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn collection(&self) -> Vec<CollectionEntry> {
        roster::collection(&self.catalog, &self.profile.inventory)
    }

    #[cfg(test)]
    pub(crate) fn battle_mut(&mut self) -> &mut BattleSession {
        &mut self.battle
    }

    #[cfg(test)]
    pub(crate) fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        tracing::debug!(target: "arcana::engine", command = ?command, "command.received");
        match command {
            PlayerCommand::SelectBanner { banner } => {
                let Some(resolved) = self.catalog.banner_or_default(&banner) else {
                    self.reject("no banners available");
                    return;
                };
                self.profile.banner = resolved.id.clone();
                self.events.push(GameEvent::BannerSelected {
                    banner: resolved.id.clone(),
                });
            }
            PlayerCommand::Summon => self.summon(),
            PlayerCommand::Explore => {
                if self.explore_claimed {
                    self.events.push(GameEvent::AlreadyClaimed {
                        reason: ShardSource::Explore,
                    });
                } else {
                    self.explore_claimed = true;
                    self.grant(self.config.explore_reward, ShardSource::Explore);
                }
            }
            PlayerCommand::ClaimDaily { day } => {
                if self.profile.last_daily.as_deref() == Some(day.as_str()) {
                    self.events.push(GameEvent::AlreadyClaimed {
                        reason: ShardSource::Daily,
                    });
                } else {
                    self.profile.last_daily = Some(day);
                    self.grant(self.config.daily_bonus, ShardSource::Daily);
                }
            }
            PlayerCommand::ToggleTeam { unit, roll_id } => {
                if self.battle.phase() == BattlePhase::Active {
                    self.reject("team is locked during battle");
                    return;
                }
                let key = roll_id
                    .as_ref()
                    .map(|r| r.as_str().to_string())
                    .unwrap_or_else(|| unit.as_str().to_string());
                match roster::toggle_team(&mut self.profile, &key) {
                    TeamToggle::Added | TeamToggle::Removed => {
                        self.events.push(GameEvent::TeamChanged {
                            size: self.profile.team.len(),
                        });
                    }
                    TeamToggle::Full => self.events.push(GameEvent::TeamFull),
                    TeamToggle::NotOwned => self.reject("unit not owned"),
                }
            }
            PlayerCommand::EnterNode => self.enter_current_node(),
            PlayerCommand::Advance { node } => {
                let catalog = Arc::clone(&self.catalog);
                StoryWalker::new(&mut self.profile.node, &catalog).advance(node.clone());
                self.events.push(GameEvent::NodeAdvanced { node });
            }
            PlayerCommand::StartBattle { power } => self.start_battle(power),
            PlayerCommand::Retreat => {
                if self.battle.phase() != BattlePhase::Active {
                    return;
                }
                let vitals = self.battle.player_vitals();
                roster::write_back(&mut self.profile.team, &vitals);
                if let Some(event) = self.battle.retreat() {
                    self.battle_events.push(event);
                }
            }
        }
    }

    fn summon(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let Some(banner) = catalog.banner_or_default(&self.profile.banner) else {
            self.reject("no banners available");
            return;
        };
        match arcana_gacha::try_summon(
            &mut self.profile.shards,
            self.config.pull_cost,
            banner,
            &catalog.units,
            &mut self.rng,
        ) {
            Some(batch) => {
                self.last_pulls = batch.pulls.iter().map(|p| p.view()).collect();
                self.profile
                    .inventory
                    .extend(batch.pulls.iter().map(|p| OwnedUnit {
                        unit: p.template.id.clone(),
                        roll_id: Some(p.roll_id.clone()),
                    }));
                self.events.push(GameEvent::SummonCompleted {
                    banner: banner.id.clone(),
                    pulls: self.last_pulls.clone(),
                    pity: batch.pity_applied,
                });
            }
            None => self.events.push(GameEvent::SummonRefused {
                shards: self.profile.shards,
                cost: self.config.pull_cost,
            }),
        }
    }

    fn enter_current_node(&mut self) {
        if self.battle.phase() == BattlePhase::Active {
            self.reject("battle in progress");
            return;
        }
        let catalog = Arc::clone(&self.catalog);
        let Some(node) = catalog.node(&self.profile.node) else {
            let err = BattleError::UnknownNode(self.profile.node.clone());
            tracing::warn!(target: "arcana::engine", error = %err, "story.enter_failed");
            self.reject(&err.to_string());
            return;
        };
        self.events.push(GameEvent::NodeEntered {
            node: node.id.clone(),
            kind: node.kind,
        });
        match enter_node(node, &mut self.profile.shards, &mut self.profile.team) {
            NodeOutcome::Rewarded { shards, heal } => {
                if shards > 0 {
                    self.events.push(GameEvent::ShardsGranted {
                        amount: shards,
                        reason: ShardSource::Story,
                    });
                }
                if let Some(fraction) = heal {
                    self.events.push(GameEvent::Healed { fraction });
                }
            }
            NodeOutcome::BattleRequested { enemy_power } => self.start_battle(enemy_power),
        }
    }

    fn start_battle(&mut self, power: f64) {
        let team = roster::build_team(&self.profile, &self.catalog);
        match self.battle.start(team, &self.catalog, power, &mut self.rng) {
            Ok(event) => self.battle_events.push(event),
            Err(err) => {
                tracing::debug!(target: "arcana::engine", error = %err, "battle.refused");
                self.reject(&err.to_string());
            }
        }
    }

    fn finish_battle(&mut self, outcome: BattleOutcome) {
        let vitals = self.battle.player_vitals();
        roster::write_back(&mut self.profile.team, &vitals);
        if outcome == BattleOutcome::Victory {
            let amount = self.config.victory_reward.amount();
            if amount > 0 {
                self.grant(amount, ShardSource::Victory);
            }
        }
    }

    fn grant(&mut self, amount: u32, reason: ShardSource) {
        self.profile.shards = self.profile.shards.saturating_add(amount);
        tracing::info!(
            target: "arcana::engine",
            amount,
            reason = ?reason,
            shards = self.profile.shards,
            "shards.granted"
        );
        self.events.push(GameEvent::ShardsGranted { amount, reason });
    }

    fn reject(&mut self, reason: &str) {
        self.events.push(GameEvent::Rejected {
            reason: reason.to_string(),
        });
    }
}
