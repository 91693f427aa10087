//! Status application, end-of-turn ticking, and stat modifiers.

use rand::Rng;

use arcana_core::catalog::{StatusEffect, StatusSpec};
use arcana_core::components::{Combatant, Status};
use arcana_core::enums::{StatKey, StatusKind};
use arcana_core::events::{AppliedStatus, BattleEvent};

/// Base stat plus the matching modifiers of every active status.
/// Def has no modifiers.
pub fn effective_stat(combatant: &Combatant, key: StatKey) -> f64 {
    let base = match key {
        StatKey::Atk => combatant.atk,
        StatKey::Def => combatant.def,
        StatKey::Spd => combatant.spd,
    };
    combatant
        .statuses
        .iter()
        .fold(base, |acc, s| acc + s.effect.modifier(key))
}

/// Roll `spec` and attach it to `target` on success.
///
/// Shields never attach: they set `source.shield` to a fraction of the
/// source's max hp, overwriting any previous shield.
pub fn apply_status_roll<R: Rng + ?Sized>(
    target: &mut Combatant,
    spec: Option<&StatusSpec>,
    source: &mut Combatant,
    rng: &mut R,
) -> Option<AppliedStatus> {
    let status = roll(spec, rng)?;
    Some(match status.effect {
        StatusEffect::Shield { pct } => raise_shield(source, pct),
        _ => attach(target, status),
    })
}

/// `apply_status_roll` where the caster is also the target.
pub fn apply_status_roll_to_self<R: Rng + ?Sized>(
    unit: &mut Combatant,
    spec: Option<&StatusSpec>,
    rng: &mut R,
) -> Option<AppliedStatus> {
    let status = roll(spec, rng)?;
    Some(match status.effect {
        StatusEffect::Shield { pct } => raise_shield(unit, pct),
        _ => attach(unit, status),
    })
}

fn roll<R: Rng + ?Sized>(spec: Option<&StatusSpec>, rng: &mut R) -> Option<Status> {
    let spec = spec?;
    if rng.gen::<f64>() >= spec.chance {
        return None;
    }
    Some(Status {
        effect: spec.effect.clone(),
        turns: spec.turns,
    })
}

fn raise_shield(source: &mut Combatant, pct: f64) -> AppliedStatus {
    source.shield = (source.hp_max as f64 * pct).floor().max(0.0) as u32;
    AppliedStatus {
        kind: StatusKind::Shield,
        applied_to: source.name.clone(),
        shield: Some(source.shield),
    }
}

fn attach(target: &mut Combatant, status: Status) -> AppliedStatus {
    let applied = AppliedStatus {
        kind: status.kind(),
        applied_to: target.name.clone(),
        shield: None,
    };
    target.statuses.push(status);
    applied
}

/// Damage-over-time, then decrement every status and drop expired ones.
///
/// Runs for every combatant after every action, including the dead.
pub fn end_of_turn(combatant: &mut Combatant) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    let was_alive = combatant.alive;

    let dots: Vec<_> = combatant
        .statuses
        .iter()
        .filter_map(|s| s.effect.dot_pct().map(|pct| (s.kind(), pct)))
        .collect();
    for (kind, pct) in dots {
        let tick = (combatant.hp_max as f64 * pct).floor() as i64;
        let before = combatant.hp;
        combatant.set_hp(combatant.hp as i64 - tick);
        let lost = before - combatant.hp;
        if lost > 0 {
            events.push(BattleEvent::StatusTick {
                unit: combatant.name.clone(),
                kind,
                damage: lost,
            });
        }
    }

    let mut expired = Vec::new();
    combatant.statuses.retain_mut(|s| {
        s.turns -= 1;
        if s.turns > 0 {
            true
        } else {
            expired.push(s.kind());
            false
        }
    });
    for kind in expired {
        events.push(BattleEvent::StatusExpired {
            unit: combatant.name.clone(),
            kind,
        });
    }

    if was_alive && !combatant.alive {
        events.push(BattleEvent::Fell {
            unit: combatant.name.clone(),
            side: combatant.side,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_combatant;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spec(chance: f64, turns: i32, effect: StatusEffect) -> StatusSpec {
        StatusSpec {
            chance,
            turns,
            effect,
        }
    }

    #[test]
    fn test_missing_spec_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = test_combatant("t", 1000, 100.0, 50.0, 100.0);
        let mut source = test_combatant("s", 1000, 100.0, 50.0, 100.0);
        assert!(apply_status_roll(&mut target, None, &mut source, &mut rng).is_none());
        assert!(target.statuses.is_empty());
    }

    #[test]
    fn test_zero_chance_never_applies() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = test_combatant("t", 1000, 100.0, 50.0, 100.0);
        let mut source = test_combatant("s", 1000, 100.0, 50.0, 100.0);
        let burn = spec(0.0, 2, StatusEffect::Burn { dmg_pct: 0.08 });
        for _ in 0..100 {
            assert!(apply_status_roll(&mut target, Some(&burn), &mut source, &mut rng).is_none());
        }
        assert!(target.statuses.is_empty());
    }

    #[test]
    fn test_statuses_stack_without_merging() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = test_combatant("t", 1000, 100.0, 50.0, 100.0);
        let mut source = test_combatant("s", 1000, 100.0, 50.0, 100.0);
        let burn = spec(1.0, 2, StatusEffect::Burn { dmg_pct: 0.08 });
        apply_status_roll(&mut target, Some(&burn), &mut source, &mut rng);
        let applied = apply_status_roll(&mut target, Some(&burn), &mut source, &mut rng).unwrap();
        assert_eq!(applied.kind, StatusKind::Burn);
        assert_eq!(applied.applied_to, "t");
        assert_eq!(target.statuses.len(), 2);
    }

    #[test]
    fn test_shield_lands_on_source_and_overwrites() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = test_combatant("t", 1000, 100.0, 50.0, 100.0);
        let mut source = test_combatant("s", 1500, 100.0, 50.0, 100.0);
        source.shield = 999;
        let aegis = spec(1.0, 2, StatusEffect::Shield { pct: 0.2 });

        let applied = apply_status_roll(&mut target, Some(&aegis), &mut source, &mut rng).unwrap();
        assert_eq!(source.shield, 300);
        assert_eq!(applied.applied_to, "s");
        assert_eq!(applied.shield, Some(300));
        assert!(target.statuses.is_empty());
        assert!(source.statuses.is_empty());
        assert_eq!(target.shield, 0);
    }

    #[test]
    fn test_dot_ticks_then_expires() {
        let mut unit = test_combatant("u", 1000, 100.0, 50.0, 100.0);
        unit.statuses.push(Status {
            effect: StatusEffect::Burn { dmg_pct: 0.08 },
            turns: 2,
        });

        let events = end_of_turn(&mut unit);
        assert_eq!(unit.hp, 920);
        assert_eq!(unit.statuses.len(), 1);
        assert_eq!(
            events,
            vec![BattleEvent::StatusTick {
                unit: "u".to_string(),
                kind: StatusKind::Burn,
                damage: 80,
            }]
        );

        end_of_turn(&mut unit);
        assert_eq!(unit.hp, 840);
        assert!(unit.statuses.is_empty());
    }

    #[test]
    fn test_one_turn_status_removed_after_one_pass() {
        let mut unit = test_combatant("u", 1000, 100.0, 50.0, 100.0);
        unit.statuses.push(Status {
            effect: StatusEffect::Stun,
            turns: 1,
        });
        let events = end_of_turn(&mut unit);
        assert!(unit.statuses.is_empty());
        assert!(events.contains(&BattleEvent::StatusExpired {
            unit: "u".to_string(),
            kind: StatusKind::Stun,
        }));
    }

    #[test]
    fn test_dot_can_kill() {
        let mut unit = test_combatant("u", 1000, 100.0, 50.0, 100.0);
        unit.hp = 30;
        unit.statuses.push(Status {
            effect: StatusEffect::Bleed { dmg_pct: 0.07 },
            turns: 2,
        });
        let events = end_of_turn(&mut unit);
        assert_eq!(unit.hp, 0);
        assert!(!unit.alive);
        assert!(matches!(events.last(), Some(BattleEvent::Fell { .. })));
    }

    #[test]
    fn test_modifiers_sum_into_effective_stats() {
        let mut unit = test_combatant("u", 1000, 100.0, 50.0, 120.0);
        unit.statuses.push(Status {
            effect: StatusEffect::Slow { spd_mod: -20.0 },
            turns: 2,
        });
        unit.statuses.push(Status {
            effect: StatusEffect::Slow { spd_mod: -20.0 },
            turns: 1,
        });
        unit.statuses.push(Status {
            effect: StatusEffect::AtkUp { atk_mod: 25.0 },
            turns: 2,
        });
        assert_eq!(effective_stat(&unit, StatKey::Spd), 80.0);
        assert_eq!(effective_stat(&unit, StatKey::Atk), 125.0);
        assert_eq!(effective_stat(&unit, StatKey::Def), 50.0);

        end_of_turn(&mut unit);
        assert_eq!(effective_stat(&unit, StatKey::Spd), 100.0);
    }
}
