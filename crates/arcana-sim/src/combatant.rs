//! Combatant construction from catalog templates.

use rand::seq::SliceRandom;
use rand::Rng;

use arcana_core::catalog::{Catalog, UnitTemplate};
use arcana_core::components::Combatant;
use arcana_core::constants::ENEMY_SQUAD_SIZE;
use arcana_core::enums::Side;
use arcana_core::types::RollId;

/// Fresh battle snapshot of `template`: full hp (floored), empty gauge,
/// no statuses, ultimate resolved from the catalog.
pub fn build_combatant(
    template: &UnitTemplate,
    side: Side,
    roll_id: Option<RollId>,
    catalog: &Catalog,
) -> Combatant {
    let hp_max = template.stats.hp.floor().max(0.0) as u32;
    Combatant {
        template: template.id.clone(),
        roll_id,
        name: template.name.clone(),
        element: template.element,
        rarity: template.rarity,
        side,
        hp: hp_max,
        hp_max,
        atk: template.stats.atk,
        def: template.stats.def,
        spd: template.stats.spd,
        shield: 0,
        ult: 0,
        alive: true,
        statuses: Vec::new(),
        skills: template.skills.clone(),
        ultimate: template
            .ultimate
            .as_ref()
            .and_then(|id| catalog.ultimate(id))
            .cloned(),
    }
}

/// Three random templates scaled by `power` (speed unscaled).
pub fn roll_enemies<R: Rng + ?Sized>(catalog: &Catalog, power: f64, rng: &mut R) -> Vec<Combatant> {
    (0..ENEMY_SQUAD_SIZE)
        .filter_map(|_| catalog.units.choose(rng))
        .map(|template| build_combatant(&template.scaled(power), Side::Enemy, None, catalog))
        .collect()
}

#[cfg(test)]
pub(crate) fn test_combatant(name: &str, hp: u32, atk: f64, def: f64, spd: f64) -> Combatant {
    use arcana_core::enums::{Element, Rarity};
    use arcana_core::types::UnitId;

    Combatant {
        template: UnitId::new(name),
        roll_id: None,
        name: name.to_string(),
        element: Element::Arc,
        rarity: Rarity::B,
        side: Side::Player,
        hp,
        hp_max: hp,
        atk,
        def,
        spd,
        shield: 0,
        ult: 0,
        alive: true,
        statuses: Vec::new(),
        skills: vec!["Arc Strike".to_string()],
        ultimate: None,
    }
}
