//! Target selection for skills and ultimates.

use arcana_core::components::Combatant;
use arcana_core::enums::TargetTag;

/// Index of the living candidate with the lowest hp fraction.
///
/// Ties keep the earliest candidate, so the choice is deterministic for a
/// given squad order. `None` when nobody is alive.
pub fn choose_target<'a, I>(candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Combatant>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in candidates.into_iter().enumerate() {
        if !c.alive {
            continue;
        }
        let frac = c.hp_fraction();
        match best {
            Some((_, f)) if f <= frac => {}
            _ => best = Some((i, frac)),
        }
    }
    best.map(|(i, _)| i)
}

/// Indices into `candidates` that a `tag` resolves to.
pub fn resolve_targets(tag: TargetTag, candidates: &[&mut Combatant]) -> Vec<usize> {
    let living = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.alive)
        .map(|(i, _)| i);
    match tag {
        TargetTag::Single | TargetTag::SelfOnly => {
            choose_target(candidates.iter().map(|c| &**c))
                .into_iter()
                .collect()
        }
        TargetTag::Multi2 => living.take(2).collect(),
        // Line has no geometry; it hits the whole squad.
        TargetTag::All | TargetTag::Line | TargetTag::AllyAll => living.collect(),
    }
}
