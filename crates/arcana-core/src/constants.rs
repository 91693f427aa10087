//! Engine constants and tuning parameters.

/// Battle drive cadence (milliseconds per scheduler tick).
pub const TICK_MILLIS: u64 = 800;

// --- Gacha ---

/// Shards spent on one ten-pull.
pub const PULL_COST: u32 = 100;

/// Units per summon batch.
pub const PULL_BATCH: usize = 10;

/// Chance that a summon biases its pool toward the banner's featured units.
pub const FEATURED_BIAS_CHANCE: f64 = 0.5;

/// How many times featured entries are repeated in a biased pool.
pub const FEATURED_COPIES: usize = 2;

/// Prefix of roll ids produced by the pity fixup.
pub const PITY_ROLL_PREFIX: &str = "pity";

/// Length of the base36 suffix on roll ids.
pub const ROLL_SUFFIX_LEN: usize = 10;

/// Tolerance for banner weight sums.
pub const WEIGHT_EPSILON: f64 = 1e-6;

// --- Profile ---

pub const STARTING_SHARDS: u32 = 300;

/// One-off shard grant from exploring the world.
pub const EXPLORE_REWARD: u32 = 100;

/// Once-per-day shard grant.
pub const DAILY_BONUS: u32 = 150;

/// Default victory payout.
pub const VICTORY_SHARDS: u32 = 50;

/// Maximum team size.
pub const TEAM_CAP: usize = 3;

// --- Battle ---

/// Enemies generated per battle.
pub const ENEMY_SQUAD_SIZE: usize = 3;

/// Ult gauge gain per target hit.
pub const ULT_GAIN_PER_HIT: u32 = 18;

/// Ult gauge ceiling. An ultimate fires at this value.
pub const ULT_MAX: u32 = 100;

/// Fixed crit chance of every ultimate.
pub const ULT_CRIT_CHANCE: f64 = 0.25;

pub const CRIT_MULTIPLIER: f64 = 1.7;

/// Share of defender def subtracted from attacker atk.
pub const DEF_FACTOR: f64 = 0.4;

pub const VARIANCE_MIN: f64 = 0.9;
pub const VARIANCE_MAX: f64 = 1.1;

pub const ELEMENT_ADVANTAGE: f64 = 1.2;
pub const ELEMENT_DISADVANTAGE: f64 = 0.8;

/// Half-width of the uniform speed jitter applied on reinsertion.
pub const SPEED_JITTER: f64 = 5.0;

/// Enemy power when a node does not specify one.
pub const DEFAULT_ENEMY_POWER: f64 = 1.0;

/// Queue entries shown in snapshots.
pub const QUEUE_PREVIEW_LEN: usize = 8;

// --- Status defaults ---

pub const DEFAULT_DOT_PCT: f64 = 0.05;
pub const DEFAULT_SHIELD_PCT: f64 = 0.15;
pub const DEFAULT_STATUS_TURNS: i32 = 1;
