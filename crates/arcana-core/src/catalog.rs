//! Static game catalog: unit templates, skills, ultimates, banners and story nodes.
//!
//! The builtin catalog ships as JSON embedded in the binary. Setting
//! `ARCANA_CATALOG_PATH` swaps in a file from disk; if that file cannot be
//! read or fails validation the builtin is used and a warning is logged.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_DOT_PCT, DEFAULT_SHIELD_PCT, DEFAULT_STATUS_TURNS, WEIGHT_EPSILON,
};
use crate::enums::{Element, NodeKind, Rarity, StatKey, StatusKind, TargetTag};
use crate::types::{BannerId, NodeId, Stats, UltimateId, UnitId};

pub const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Environment variable naming a catalog file that replaces the builtin one.
pub const CATALOG_PATH_ENV: &str = "ARCANA_CATALOG_PATH";

fn default_turns() -> i32 {
    DEFAULT_STATUS_TURNS
}

fn default_dot_pct() -> f64 {
    DEFAULT_DOT_PCT
}

fn default_shield_pct() -> f64 {
    DEFAULT_SHIELD_PCT
}

/// Kind-specific payload of a status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StatusEffect {
    Burn {
        #[serde(default = "default_dot_pct")]
        dmg_pct: f64,
    },
    Bleed {
        #[serde(default = "default_dot_pct")]
        dmg_pct: f64,
    },
    Shock {
        #[serde(default = "default_dot_pct")]
        dmg_pct: f64,
    },
    Stun,
    /// Sizes the caster's shield as a fraction of its max hp.
    Shield {
        #[serde(default = "default_shield_pct")]
        pct: f64,
    },
    Slow {
        spd_mod: f64,
    },
    AtkUp {
        atk_mod: f64,
    },
}

impl StatusEffect {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusEffect::Burn { .. } => StatusKind::Burn,
            StatusEffect::Bleed { .. } => StatusKind::Bleed,
            StatusEffect::Shock { .. } => StatusKind::Shock,
            StatusEffect::Stun => StatusKind::Stun,
            StatusEffect::Shield { .. } => StatusKind::Shield,
            StatusEffect::Slow { .. } => StatusKind::Slow,
            StatusEffect::AtkUp { .. } => StatusKind::AtkUp,
        }
    }

    /// Fraction of max hp lost per end of turn, for damage-over-time kinds.
    pub fn dot_pct(&self) -> Option<f64> {
        match self {
            StatusEffect::Burn { dmg_pct }
            | StatusEffect::Bleed { dmg_pct }
            | StatusEffect::Shock { dmg_pct } => Some(*dmg_pct),
            _ => None,
        }
    }

    /// Flat modifier this effect contributes to `key`.
    pub fn modifier(&self, key: StatKey) -> f64 {
        match (self, key) {
            (StatusEffect::AtkUp { atk_mod }, StatKey::Atk) => *atk_mod,
            (StatusEffect::Slow { spd_mod }, StatKey::Spd) => *spd_mod,
            _ => 0.0,
        }
    }
}

/// A status attached to a skill or ultimate, applied on a successful roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub chance: f64,
    #[serde(default = "default_turns")]
    pub turns: i32,
    #[serde(flatten)]
    pub effect: StatusEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub power: f64,
    pub crit: f64,
    pub target: TargetTag,
    #[serde(default)]
    pub status: Option<StatusSpec>,
}

impl Skill {
    /// Stand-in for a skill name the catalog does not know.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            power: 1.0,
            crit: 0.05,
            target: TargetTag::Single,
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ultimate {
    pub id: UltimateId,
    pub name: String,
    pub power: f64,
    pub target: TargetTag,
    #[serde(default)]
    pub status: Option<StatusSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub id: UnitId,
    pub name: String,
    pub element: Element,
    pub rarity: Rarity,
    pub stats: Stats,
    pub skills: Vec<String>,
    #[serde(default)]
    pub ultimate: Option<UltimateId>,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub portrait: String,
}

impl UnitTemplate {
    /// Copy with hp/atk/def multiplied by `power`; speed unchanged.
    pub fn scaled(&self, power: f64) -> Self {
        Self {
            stats: self.stats.scaled(power),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: Rarity,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered highest tier first; weights sum to 1.
    pub rates: Vec<RarityWeight>,
    #[serde(default)]
    pub featured: Vec<UnitId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub shards: Option<u32>,
    /// Fraction of max hp restored to each living team member.
    #[serde(default)]
    pub heal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub text: String,
    #[serde(default)]
    pub next: Vec<NodeId>,
    #[serde(default)]
    pub reward: Option<Reward>,
    #[serde(default)]
    pub enemy_power: Option<f64>,
}

/// Everything the engine reads but never mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub units: Vec<UnitTemplate>,
    pub skills: Vec<Skill>,
    pub ultimates: Vec<Ultimate>,
    pub banners: Vec<Banner>,
    pub story: Vec<StoryNode>,
    pub start_node: NodeId,
}

impl Catalog {
    /// Parse and validate the embedded catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(data: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(data)?;
        validate_catalog(&catalog)?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn unit(&self, id: &UnitId) -> Option<&UnitTemplate> {
        self.units.iter().find(|u| &u.id == id)
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Named skill, or the default single-target strike if unknown.
    pub fn skill_or_fallback(&self, name: &str) -> Skill {
        self.skill(name)
            .cloned()
            .unwrap_or_else(|| Skill::fallback(name))
    }

    pub fn ultimate(&self, id: &UltimateId) -> Option<&Ultimate> {
        self.ultimates.iter().find(|u| &u.id == id)
    }

    pub fn banner(&self, id: &BannerId) -> Option<&Banner> {
        self.banners.iter().find(|b| &b.id == id)
    }

    /// Banner by id; unknown ids resolve to the first banner.
    pub fn banner_or_default(&self, id: &BannerId) -> Option<&Banner> {
        self.banner(id).or_else(|| self.banners.first())
    }

    pub fn node(&self, id: &NodeId) -> Option<&StoryNode> {
        self.story.iter().find(|n| &n.id == id)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid catalog: {0}")]
    Invalid(#[from] CatalogIssue),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogIssue {
    #[error("catalog has no units")]
    NoUnits,
    #[error("catalog has no banners")]
    NoBanners,
    #[error("banner {banner} has an empty rate table")]
    EmptyRates { banner: BannerId },
    #[error("banner {banner} weights sum to {sum}, expected 1.0")]
    WeightSum { banner: BannerId, sum: f64 },
    #[error("banner {banner} weight for {rarity:?} is negative")]
    NegativeWeight { banner: BannerId, rarity: Rarity },
    #[error("banner {banner} features unknown unit {unit}")]
    UnknownFeatured { banner: BannerId, unit: UnitId },
    #[error("unit {unit} references unknown ultimate {ultimate}")]
    UnknownUltimate { unit: UnitId, ultimate: UltimateId },
    #[error("story node {node} links to unknown node {next}")]
    UnknownNextNode { node: NodeId, next: NodeId },
    #[error("start node {0} is not in the story graph")]
    MissingStartNode(NodeId),
    #[error("status chance {chance} on {owner} is outside [0, 1]")]
    ChanceOutOfRange { owner: String, chance: f64 },
}

/// Check cross references and banner tables. Skill names are not checked:
/// unknown names resolve to the fallback skill at battle time.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogIssue> {
    if catalog.units.is_empty() {
        return Err(CatalogIssue::NoUnits);
    }
    if catalog.banners.is_empty() {
        return Err(CatalogIssue::NoBanners);
    }

    for banner in &catalog.banners {
        if banner.rates.is_empty() {
            return Err(CatalogIssue::EmptyRates {
                banner: banner.id.clone(),
            });
        }
        if let Some(w) = banner.rates.iter().find(|w| w.weight < 0.0) {
            return Err(CatalogIssue::NegativeWeight {
                banner: banner.id.clone(),
                rarity: w.rarity,
            });
        }
        let sum: f64 = banner.rates.iter().map(|w| w.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(CatalogIssue::WeightSum {
                banner: banner.id.clone(),
                sum,
            });
        }
        if let Some(unit) = banner.featured.iter().find(|id| catalog.unit(id).is_none()) {
            return Err(CatalogIssue::UnknownFeatured {
                banner: banner.id.clone(),
                unit: unit.clone(),
            });
        }
    }

    for unit in &catalog.units {
        if let Some(ult) = &unit.ultimate {
            if catalog.ultimate(ult).is_none() {
                return Err(CatalogIssue::UnknownUltimate {
                    unit: unit.id.clone(),
                    ultimate: ult.clone(),
                });
            }
        }
    }

    let skill_specs = catalog
        .skills
        .iter()
        .filter_map(|s| s.status.as_ref().map(|st| (s.name.as_str(), st)));
    let ult_specs = catalog
        .ultimates
        .iter()
        .filter_map(|u| u.status.as_ref().map(|st| (u.name.as_str(), st)));
    for (owner, spec) in skill_specs.chain(ult_specs) {
        if !(0.0..=1.0).contains(&spec.chance) {
            return Err(CatalogIssue::ChanceOutOfRange {
                owner: owner.to_string(),
                chance: spec.chance,
            });
        }
    }

    for node in &catalog.story {
        if let Some(next) = node.next.iter().find(|id| catalog.node(id).is_none()) {
            return Err(CatalogIssue::UnknownNextNode {
                node: node.id.clone(),
                next: next.clone(),
            });
        }
    }
    if catalog.node(&catalog.start_node).is_none() {
        return Err(CatalogIssue::MissingStartNode(catalog.start_node.clone()));
    }

    Ok(())
}

/// Load the catalog named by `ARCANA_CATALOG_PATH`, falling back to the builtin.
pub fn load_catalog_from_env() -> Result<Catalog, CatalogError> {
    let path = env::var(CATALOG_PATH_ENV).ok().map(PathBuf::from);
    load_catalog(path.as_deref())
}

/// Load an override catalog from `path`. A missing path or a file that
/// fails to load yields the builtin catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    if let Some(path) = path {
        match Catalog::from_file(path) {
            Ok(catalog) => {
                tracing::info!(
                    target: "arcana::catalog",
                    path = %path.display(),
                    units = catalog.units.len(),
                    "catalog.loaded_override"
                );
                return Ok(catalog);
            }
            Err(err) => {
                tracing::warn!(
                    target: "arcana::catalog",
                    path = %path.display(),
                    error = %err,
                    "catalog.load_failed"
                );
            }
        }
    }
    Catalog::builtin()
}
