//! Inventory and team management.

use rand::seq::SliceRandom;
use rand::Rng;

use arcana_core::catalog::Catalog;
use arcana_core::components::Combatant;
use arcana_core::constants::TEAM_CAP;
use arcana_core::enums::Side;
use arcana_core::state::{CollectionEntry, OwnedUnit, Profile, TeamMember, Vitals};

use crate::combatant::build_combatant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamToggle {
    Added,
    Removed,
    /// The team already holds `TEAM_CAP` members.
    Full,
    /// No inventory entry carries that identity.
    NotOwned,
}

/// Add or remove the inventory entry identified by `key` (roll id, or
/// template id for the starter unit).
pub fn toggle_team(profile: &mut Profile, key: &str) -> TeamToggle {
    if let Some(pos) = profile.team.iter().position(|m| m.owned.key() == key) {
        profile.team.remove(pos);
        return TeamToggle::Removed;
    }
    let Some(owned) = profile.inventory.iter().find(|o| o.key() == key) else {
        return TeamToggle::NotOwned;
    };
    if profile.team.len() >= TEAM_CAP {
        return TeamToggle::Full;
    }
    profile.team.push(TeamMember {
        owned: owned.clone(),
        vitals: None,
    });
    TeamToggle::Added
}

/// Every template with whether the inventory holds at least one copy.
pub fn collection(catalog: &Catalog, inventory: &[OwnedUnit]) -> Vec<CollectionEntry> {
    catalog
        .units
        .iter()
        .map(|t| CollectionEntry {
            unit: t.id.clone(),
            name: t.name.clone(),
            rarity: t.rarity,
            owned: inventory.iter().any(|o| o.unit == t.id),
        })
        .collect()
}

/// A random template for a brand new profile. Carries no roll id.
pub fn starter_unit<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Option<OwnedUnit> {
    catalog.units.choose(rng).map(|t| OwnedUnit {
        unit: t.id.clone(),
        roll_id: None,
    })
}

/// Battle snapshots of the team at full stats. Members whose template is
/// missing from the catalog are skipped.
pub fn build_team(profile: &Profile, catalog: &Catalog) -> Vec<Combatant> {
    profile
        .team
        .iter()
        .filter_map(|m| {
            let template = catalog.unit(&m.owned.unit)?;
            Some(build_combatant(
                template,
                Side::Player,
                m.owned.roll_id.clone(),
                catalog,
            ))
        })
        .collect()
}

/// Copy post-battle vitals onto the matching team members.
pub fn write_back(team: &mut [TeamMember], vitals: &[(OwnedUnit, Vitals)]) {
    for member in team.iter_mut() {
        if let Some((_, v)) = vitals.iter().find(|(o, _)| o.key() == member.owned.key()) {
            member.vitals = Some(*v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::types::{RollId, UnitId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn owned(unit: &str, roll: Option<&str>) -> OwnedUnit {
        OwnedUnit {
            unit: UnitId::from(unit),
            roll_id: roll.map(RollId::from),
        }
    }

    fn profile_with(n: usize) -> Profile {
        let mut profile = Profile::default();
        profile.inventory = (0..n)
            .map(|i| owned("gale-duelist", Some(&format!("roll-{i}"))))
            .collect();
        profile
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut profile = profile_with(2);
        assert_eq!(toggle_team(&mut profile, "roll-0"), TeamToggle::Added);
        assert_eq!(profile.team.len(), 1);
        assert_eq!(toggle_team(&mut profile, "roll-0"), TeamToggle::Removed);
        assert!(profile.team.is_empty());
    }

    #[test]
    fn test_duplicate_templates_are_distinct_members() {
        let mut profile = profile_with(2);
        toggle_team(&mut profile, "roll-0");
        toggle_team(&mut profile, "roll-1");
        assert_eq!(profile.team.len(), 2);
        assert_eq!(profile.team[0].owned.unit, profile.team[1].owned.unit);
    }

    #[test]
    fn test_team_caps_at_three() {
        let mut profile = profile_with(5);
        for i in 0..3 {
            assert_eq!(
                toggle_team(&mut profile, &format!("roll-{i}")),
                TeamToggle::Added
            );
        }
        assert_eq!(toggle_team(&mut profile, "roll-3"), TeamToggle::Full);
        assert_eq!(profile.team.len(), 3);
    }

    #[test]
    fn test_unknown_key_is_not_owned() {
        let mut profile = profile_with(1);
        assert_eq!(toggle_team(&mut profile, "nope"), TeamToggle::NotOwned);
    }

    #[test]
    fn test_starter_is_keyed_by_template() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let starter = starter_unit(&catalog, &mut rng).unwrap();
        assert!(starter.roll_id.is_none());
        assert!(catalog.unit(&starter.unit).is_some());

        let mut profile = Profile::default();
        let key = starter.key().to_string();
        profile.inventory.push(starter);
        assert_eq!(toggle_team(&mut profile, &key), TeamToggle::Added);
    }

    #[test]
    fn test_collection_marks_owned_templates() {
        let catalog = Catalog::builtin().unwrap();
        let inventory = vec![owned("arc-oracle", Some("r1")), owned("arc-oracle", Some("r2"))];
        let entries = collection(&catalog, &inventory);
        assert_eq!(entries.len(), catalog.units.len());
        let owned: Vec<_> = entries.iter().filter(|e| e.owned).collect();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].unit.as_str(), "arc-oracle");
    }

    #[test]
    fn test_build_and_write_back_vitals() {
        let catalog = Catalog::builtin().unwrap();
        let mut profile = Profile::default();
        profile.inventory.push(owned("tidal-warden", Some("r1")));
        profile.inventory.push(owned("missing-unit", Some("r2")));
        toggle_team(&mut profile, "r1");
        toggle_team(&mut profile, "r2");

        let team = build_team(&profile, &catalog);
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].hp, 1300);

        let vitals = vec![(
            owned("tidal-warden", Some("r1")),
            Vitals {
                hp: 20,
                hp_max: 1300,
                alive: true,
            },
        )];
        write_back(&mut profile.team, &vitals);
        assert_eq!(profile.team[0].vitals.unwrap().hp, 20);
        assert!(profile.team[1].vitals.is_none());
    }
}
