//! Single pulls, ten-pulls with pity, and the cost gate.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use arcana_core::catalog::{Banner, UnitTemplate};
use arcana_core::constants::{
    FEATURED_BIAS_CHANCE, FEATURED_COPIES, PITY_ROLL_PREFIX, PULL_BATCH, ROLL_SUFFIX_LEN,
};
use arcana_core::enums::Rarity;
use arcana_core::events::PullView;
use arcana_core::types::RollId;

use crate::rates::roll_rarity;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A template copy tagged with its unique roll id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulledUnit {
    pub template: UnitTemplate,
    pub roll_id: RollId,
}

impl PulledUnit {
    pub fn rarity(&self) -> Rarity {
        self.template.rarity
    }

    pub fn view(&self) -> PullView {
        PullView {
            unit: self.template.id.clone(),
            name: self.template.name.clone(),
            rarity: self.template.rarity,
            roll_id: self.roll_id.clone(),
        }
    }
}

/// Result of a ten-pull.
#[derive(Debug, Clone, PartialEq)]
pub struct SummonBatch {
    pub pulls: Vec<PulledUnit>,
    /// Whether the last slot was replaced by the pity rule.
    pub pity_applied: bool,
}

/// `<prefix>-<base36>` roll id drawn from `rng`.
pub fn roll_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> RollId {
    let suffix: String = (0..ROLL_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    RollId(format!("{prefix}-{suffix}"))
}

/// Pull one unit from `units` under `banner`.
///
/// Returns `None` only when `units` is empty. A tier with no templates
/// widens the pool to every unit.
pub fn summon_one<R: Rng + ?Sized>(
    banner: &Banner,
    units: &[UnitTemplate],
    rng: &mut R,
) -> Option<PulledUnit> {
    let rarity = roll_rarity(banner, rng);
    let mut pool: Vec<&UnitTemplate> = units.iter().filter(|u| u.rarity == rarity).collect();
    if pool.is_empty() {
        pool = units.iter().collect();
    }

    if !banner.featured.is_empty() && rng.gen::<f64>() < FEATURED_BIAS_CHANCE {
        let featured: Vec<&UnitTemplate> = pool
            .iter()
            .copied()
            .filter(|u| banner.featured.contains(&u.id))
            .collect();
        if !featured.is_empty() {
            let mut biased = Vec::with_capacity(featured.len() * FEATURED_COPIES + pool.len());
            for _ in 0..FEATURED_COPIES {
                biased.extend(featured.iter().copied());
            }
            biased.extend(pool);
            pool = biased;
        }
    }

    let template = (*pool.choose(rng)?).clone();
    let roll_id = roll_id(template.id.as_str(), rng);
    Some(PulledUnit { template, roll_id })
}

/// Ten independent pulls. If none is A or better, the tenth slot is
/// replaced by a uniform A-tier pull tagged with a `pity-` roll id.
/// The replacement is not checked again.
pub fn summon_ten<R: Rng + ?Sized>(
    banner: &Banner,
    units: &[UnitTemplate],
    rng: &mut R,
) -> SummonBatch {
    let mut pulls: Vec<PulledUnit> = (0..PULL_BATCH)
        .filter_map(|_| summon_one(banner, units, rng))
        .collect();

    let mut pity_applied = false;
    if !pulls.iter().any(|p| p.rarity().is_pity_floor()) {
        let a_tier: Vec<&UnitTemplate> = units.iter().filter(|u| u.rarity == Rarity::A).collect();
        if let (Some(slot), Some(template)) = (pulls.last_mut(), a_tier.choose(rng)) {
            *slot = PulledUnit {
                template: (*template).clone(),
                roll_id: roll_id(PITY_ROLL_PREFIX, rng),
            };
            pity_applied = true;
        }
    }

    SummonBatch {
        pulls,
        pity_applied,
    }
}

/// Run a ten-pull if `wallet` covers `cost`, deducting exactly `cost`.
/// Refused pulls leave the wallet untouched.
pub fn try_summon<R: Rng + ?Sized>(
    wallet: &mut u32,
    cost: u32,
    banner: &Banner,
    units: &[UnitTemplate],
    rng: &mut R,
) -> Option<SummonBatch> {
    if *wallet < cost {
        tracing::debug!(
            target: "arcana::gacha",
            shards = *wallet,
            cost,
            "summon.refused"
        );
        return None;
    }
    *wallet -= cost;
    let batch = summon_ten(banner, units, rng);
    tracing::info!(
        target: "arcana::gacha",
        banner = %banner.id,
        pity = batch.pity_applied,
        shards = *wallet,
        "summon.completed"
    );
    Some(batch)
}
