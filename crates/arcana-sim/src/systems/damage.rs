//! Damage formula and elemental modifiers.
//!
//! `raw = max(1, atk - def * 0.4)`, then power, variance, element and crit
//! multipliers, floored. Attacker atk and defender def are read through
//! `effective_stat`, so atk buffs raise damage.

use rand::Rng;

use arcana_core::components::Combatant;
use arcana_core::constants::{
    CRIT_MULTIPLIER, DEF_FACTOR, ELEMENT_ADVANTAGE, ELEMENT_DISADVANTAGE, VARIANCE_MAX,
    VARIANCE_MIN,
};
use arcana_core::enums::{Element, StatKey};

use super::status::effective_stat;

/// The random inputs of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRolls {
    /// Multiplier in `[0.9, 1.1)`.
    pub variance: f64,
    pub crit: bool,
}

impl DamageRolls {
    /// Variance pinned to 1.0, no crit.
    pub fn neutral() -> Self {
        Self {
            variance: 1.0,
            crit: false,
        }
    }

    /// Draw variance, then the crit roll.
    pub fn draw<R: Rng + ?Sized>(crit_chance: f64, rng: &mut R) -> Self {
        let variance = rng.gen_range(VARIANCE_MIN..VARIANCE_MAX);
        let crit = rng.gen::<f64>() < crit_chance;
        Self { variance, crit }
    }
}

pub fn element_modifier(attacker: Element, defender: Element) -> f64 {
    if attacker.beats() == Some(defender) {
        ELEMENT_ADVANTAGE
    } else if defender.beats() == Some(attacker) {
        ELEMENT_DISADVANTAGE
    } else {
        1.0
    }
}

/// Damage with explicit rolls. Never negative.
pub fn damage_with_rolls(
    attacker: &Combatant,
    defender: &Combatant,
    power: f64,
    rolls: DamageRolls,
) -> u32 {
    let atk = effective_stat(attacker, StatKey::Atk);
    let def = effective_stat(defender, StatKey::Def);
    let raw = (atk - def * DEF_FACTOR).max(1.0);
    let crit = if rolls.crit { CRIT_MULTIPLIER } else { 1.0 };
    let dmg = raw
        * power
        * rolls.variance
        * element_modifier(attacker.element, defender.element)
        * crit;
    dmg.floor().max(0.0) as u32
}

pub fn base_damage<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    power: f64,
    crit_chance: f64,
    rng: &mut R,
) -> u32 {
    damage_with_rolls(attacker, defender, power, DamageRolls::draw(crit_chance, rng))
}
