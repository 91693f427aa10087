use crate::catalog::StatusEffect;
use crate::commands::PlayerCommand;
use crate::components::{Combatant, Status};
use crate::enums::*;
use crate::events::{AppliedStatus, BattleEvent, HitReport};
use crate::state::{GameStateSnapshot, OwnedUnit, Profile};
use crate::types::{RollId, UnitId};

fn dummy(hp: u32) -> Combatant {
    Combatant {
        template: UnitId::from("gale-duelist"),
        roll_id: None,
        name: "Gale Duelist".to_string(),
        element: Element::Gale,
        rarity: Rarity::B,
        side: Side::Player,
        hp,
        hp_max: 900,
        atk: 120.0,
        def: 80.0,
        spd: 128.0,
        shield: 0,
        ult: 0,
        alive: true,
        statuses: Vec::new(),
        skills: vec!["Tempest Flurry".to_string()],
        ultimate: None,
    }
}

#[test]
fn test_element_cycle_is_closed() {
    let mut e = Element::Ember;
    for _ in 0..4 {
        e = e.beats().unwrap();
    }
    assert_eq!(e, Element::Ember);
    assert_eq!(Element::Arc.beats(), None);
    for el in Element::ALL {
        assert_ne!(el.beats(), Some(Element::Arc));
    }
}

#[test]
fn test_target_tags_use_catalog_names() {
    let tags: Vec<TargetTag> =
        serde_json::from_str(r#"["single","multi2","all","line","self","allyAll"]"#).unwrap();
    assert_eq!(
        tags,
        vec![
            TargetTag::Single,
            TargetTag::Multi2,
            TargetTag::All,
            TargetTag::Line,
            TargetTag::SelfOnly,
            TargetTag::AllyAll,
        ]
    );
}

#[test]
fn test_pity_floor_is_a_and_above() {
    assert!(Rarity::SS.is_pity_floor());
    assert!(Rarity::S.is_pity_floor());
    assert!(Rarity::A.is_pity_floor());
    assert!(!Rarity::B.is_pity_floor());
}

#[test]
fn test_battle_nodes_start_battles() {
    assert!(NodeKind::Battle.starts_battle());
    assert!(NodeKind::Elite.starts_battle());
    assert!(NodeKind::Boss.starts_battle());
    assert!(!NodeKind::Camp.starts_battle());
    assert!(!NodeKind::Loot.starts_battle());
}

#[test]
fn test_command_tagged_by_type() {
    let cmd: PlayerCommand =
        serde_json::from_str(r#"{"type":"Advance","node":"n3"}"#).unwrap();
    assert!(matches!(cmd, PlayerCommand::Advance { ref node } if node.as_str() == "n3"));

    let json = serde_json::to_string(&PlayerCommand::Summon).unwrap();
    assert_eq!(json, r#"{"type":"Summon"}"#);
}

#[test]
fn test_set_hp_clamps_and_kills() {
    let mut c = dummy(900);
    c.set_hp(2000);
    assert_eq!(c.hp, 900);
    assert!(c.alive);
    c.set_hp(-15);
    assert_eq!(c.hp, 0);
    assert!(!c.alive);
}

#[test]
fn test_hp_fraction_and_stun_query() {
    let mut c = dummy(450);
    assert!((c.hp_fraction() - 0.5).abs() < 1e-12);
    assert!(!c.is_stunned());
    c.statuses.push(Status {
        effect: StatusEffect::Stun,
        turns: 1,
    });
    assert!(c.is_stunned());
}

#[test]
fn test_owned_unit_key_prefers_roll_id() {
    let starter = OwnedUnit {
        unit: UnitId::from("ignis-ronin"),
        roll_id: None,
    };
    assert_eq!(starter.key(), "ignis-ronin");

    let pulled = OwnedUnit {
        unit: UnitId::from("ignis-ronin"),
        roll_id: Some(RollId::from("ignis-ronin-abc123")),
    };
    assert_eq!(pulled.key(), "ignis-ronin-abc123");
}

#[test]
fn test_default_profile_starts_at_camp_with_shards() {
    let p = Profile::default();
    assert_eq!(p.shards, 300);
    assert_eq!(p.node.as_str(), "start");
    assert_eq!(p.banner.as_str(), "standard");
    assert!(p.inventory.is_empty());
}

#[test]
fn test_log_lines_render_hits() {
    let event = BattleEvent::SkillUsed {
        actor: "Ignis Ronin".to_string(),
        side: Side::Player,
        skill: "Hellbrand".to_string(),
        hits: vec![HitReport {
            target: "Brine Slinger".to_string(),
            damage: 120,
            absorbed: 0,
            applied: Some(AppliedStatus {
                kind: StatusKind::Burn,
                applied_to: "Brine Slinger".to_string(),
                shield: None,
            }),
            defeated: false,
        }],
    };
    assert_eq!(
        event.log_line().unwrap(),
        "Ignis Ronin used Hellbrand. Brine Slinger -120 +Burn"
    );
    assert!(BattleEvent::StatusTick {
        unit: "x".to_string(),
        kind: StatusKind::Burn,
        damage: 3,
    }
    .log_line()
    .is_none());
}

#[test]
fn test_default_snapshot_serializes() {
    let snap = GameStateSnapshot::default();
    let json = serde_json::to_string(&snap).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.phase, BattlePhase::Idle);
    assert!(back.battle.is_none());
}

#[test]
fn test_status_serializes_flat() {
    let s = Status {
        effect: StatusEffect::Slow { spd_mod: -20.0 },
        turns: 2,
    };
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["type"], "slow");
    assert_eq!(json["turns"], 2);
    assert_eq!(json["spd_mod"], -20.0);
}
