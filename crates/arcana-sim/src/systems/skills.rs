//! Skill and ultimate resolution.

use rand::Rng;

use arcana_core::catalog::{Skill, StatusSpec, Ultimate};
use arcana_core::components::Combatant;
use arcana_core::constants::{ULT_CRIT_CHANCE, ULT_GAIN_PER_HIT, ULT_MAX};
use arcana_core::enums::TargetTag;
use arcana_core::events::{AppliedStatus, HitReport};

use super::damage::base_damage;
use super::status::{apply_status_roll, apply_status_roll_to_self};
use super::targeting::resolve_targets;

/// Resolve `skill` from `attacker` against `targets`.
///
/// `targets` is the foe squad, except for `AllyAll` skills where it is the
/// caster's squad without the caster; the caster is buffed as well.
/// A stunned attacker resolves nothing. Every target hit adds 18 to the
/// attacker's ult gauge.
pub fn perform_skill<R: Rng + ?Sized>(
    attacker: &mut Combatant,
    targets: &mut [&mut Combatant],
    skill: &Skill,
    rng: &mut R,
) -> Vec<HitReport> {
    if attacker.is_stunned() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    if skill.target == TargetTag::AllyAll {
        let applied = apply_status_roll_to_self(attacker, skill.status.as_ref(), rng);
        hits.push(support_report(&attacker.name, applied));
        gain_ult(attacker);
        for i in resolve_targets(skill.target, targets) {
            let ally = &mut *targets[i];
            let applied = apply_status_roll(ally, skill.status.as_ref(), attacker, rng);
            hits.push(support_report(&ally.name, applied));
            gain_ult(attacker);
        }
        return hits;
    }

    for i in resolve_targets(skill.target, targets) {
        let hit = strike(
            attacker,
            &mut *targets[i],
            skill.power,
            skill.crit,
            skill.status.as_ref(),
            rng,
        );
        hits.push(hit);
        gain_ult(attacker);
    }
    hits
}

/// Resolve the attacker's ultimate. Crit chance is fixed at 0.25 and the
/// gauge resets to 0 even when nothing was hit.
pub fn perform_ultimate<R: Rng + ?Sized>(
    attacker: &mut Combatant,
    targets: &mut [&mut Combatant],
    ultimate: &Ultimate,
    rng: &mut R,
) -> Vec<HitReport> {
    let mut hits = Vec::new();
    for i in resolve_targets(ultimate.target, targets) {
        let hit = strike(
            attacker,
            &mut *targets[i],
            ultimate.power,
            ULT_CRIT_CHANCE,
            ultimate.status.as_ref(),
            rng,
        );
        hits.push(hit);
    }
    attacker.ult = 0;
    hits
}

fn strike<R: Rng + ?Sized>(
    attacker: &mut Combatant,
    target: &mut Combatant,
    power: f64,
    crit_chance: f64,
    status: Option<&StatusSpec>,
    rng: &mut R,
) -> HitReport {
    let dmg = base_damage(attacker, target, power, crit_chance, rng);
    let absorbed = dmg.min(target.shield);
    target.shield -= absorbed;
    let damage = dmg - absorbed;
    target.set_hp(target.hp as i64 - damage as i64);

    let applied = apply_status_roll(target, status, attacker, rng);
    HitReport {
        target: target.name.clone(),
        damage,
        absorbed,
        applied,
        defeated: !target.alive,
    }
}

fn support_report(name: &str, applied: Option<AppliedStatus>) -> HitReport {
    HitReport {
        target: name.to_string(),
        damage: 0,
        absorbed: 0,
        applied,
        defeated: false,
    }
}

fn gain_ult(attacker: &mut Combatant) {
    attacker.ult = (attacker.ult + ULT_GAIN_PER_HIT).min(ULT_MAX);
}
