use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arcana_core::catalog::{Banner, Catalog, RarityWeight};
use arcana_core::enums::Rarity;
use arcana_core::types::{BannerId, UnitId};

use crate::rates::{rarity_at, roll_rarity};
use crate::summon::{roll_id, summon_one, summon_ten, try_summon};

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn banner(catalog: &Catalog, id: &str) -> Banner {
    catalog.banner(&BannerId::from(id)).unwrap().clone()
}

/// A banner that can only produce B units, forcing pity.
fn b_only_banner() -> Banner {
    Banner {
        id: BannerId::from("b-only"),
        name: "B Only".to_string(),
        description: String::new(),
        rates: vec![RarityWeight {
            rarity: Rarity::B,
            weight: 1.0,
        }],
        featured: Vec::new(),
    }
}

#[test]
fn test_builtin_banner_weights_sum_to_one() {
    for b in &catalog().banners {
        let sum: f64 = b.rates.iter().map(|w| w.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", b.id, sum);
    }
}

#[test]
fn test_summon_ten_returns_ten() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..50 {
        let batch = summon_ten(&standard, &catalog.units, &mut rng);
        assert_eq!(batch.pulls.len(), 10);
    }
}

#[test]
fn test_pity_replaces_tenth_slot_with_a_tier() {
    let catalog = catalog();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let batch = summon_ten(&b_only_banner(), &catalog.units, &mut rng);

    assert!(batch.pity_applied);
    assert_eq!(batch.pulls.len(), 10);
    for pull in &batch.pulls[..9] {
        assert_eq!(pull.rarity(), Rarity::B);
    }
    let last = &batch.pulls[9];
    assert_eq!(last.rarity(), Rarity::A);
    assert!(last.roll_id.as_str().starts_with("pity-"));
}

#[test]
fn test_batch_with_high_rarity_is_untouched() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..100 {
        let batch = summon_ten(&standard, &catalog.units, &mut rng);
        if !batch.pity_applied {
            assert!(batch.pulls.iter().any(|p| p.rarity().is_pity_floor()));
            assert!(batch
                .pulls
                .iter()
                .all(|p| !p.roll_id.as_str().starts_with("pity-")));
        }
    }
}

#[test]
fn test_roll_ids_are_prefixed_and_distinct() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        for pull in summon_ten(&standard, &catalog.units, &mut rng).pulls {
            if !pull.roll_id.as_str().starts_with("pity-") {
                assert!(pull
                    .roll_id
                    .as_str()
                    .starts_with(&format!("{}-", pull.template.id)));
            }
            assert!(seen.insert(pull.roll_id));
        }
    }
}

#[test]
fn test_roll_id_suffix_is_base36() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let id = roll_id("arc-oracle", &mut rng);
    let suffix = id.as_str().strip_prefix("arc-oracle-").unwrap();
    assert_eq!(suffix.len(), 10);
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_featured_bias_raises_featured_share() {
    let catalog = catalog();
    let starfall = banner(&catalog, "starfall");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let scribe = UnitId::from("quantum-scribe");

    let mut s_pulls = 0u32;
    let mut scribe_pulls = 0u32;
    for _ in 0..20_000 {
        let pull = summon_one(&starfall, &catalog.units, &mut rng).unwrap();
        if pull.rarity() == Rarity::S {
            s_pulls += 1;
            if pull.template.id == scribe {
                scribe_pulls += 1;
            }
        }
    }
    // Three S units; unbiased share would be 1/3, biased share is 1/3 * 0.5 + 3/5 * 0.5.
    let share = scribe_pulls as f64 / s_pulls as f64;
    assert!(share > 0.4, "featured share {share}");
    assert!(share < 0.55, "featured share {share}");
}

#[test]
fn test_empty_catalog_pulls_nothing() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    assert!(summon_one(&standard, &[], &mut rng).is_none());
    let batch = summon_ten(&standard, &[], &mut rng);
    assert!(batch.pulls.is_empty());
    assert!(!batch.pity_applied);
}

#[test]
fn test_insufficient_shards_refuses_pull() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut wallet = 50;
    let result = try_summon(&mut wallet, 100, &standard, &catalog.units, &mut rng);
    assert!(result.is_none());
    assert_eq!(wallet, 50);
}

#[test]
fn test_exact_cost_is_deducted() {
    let catalog = catalog();
    let standard = banner(&catalog, "standard");
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut wallet = 250;
    let batch = try_summon(&mut wallet, 100, &standard, &catalog.units, &mut rng).unwrap();
    assert_eq!(batch.pulls.len(), 10);
    assert_eq!(wallet, 150);

    let mut wallet = 100;
    assert!(try_summon(&mut wallet, 100, &standard, &catalog.units, &mut rng).is_some());
    assert_eq!(wallet, 0);
}

#[test]
fn test_seeded_rolls_are_reproducible() {
    let catalog = catalog();
    let earthwall = banner(&catalog, "earthwall");
    let mut a = ChaCha8Rng::seed_from_u64(77);
    let mut b = ChaCha8Rng::seed_from_u64(77);
    assert_eq!(
        summon_ten(&earthwall, &catalog.units, &mut a),
        summon_ten(&earthwall, &catalog.units, &mut b)
    );
}

proptest! {
    #[test]
    fn test_rarity_always_in_table(seed in any::<u64>()) {
        let catalog = catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for b in &catalog.banners {
            let r = roll_rarity(b, &mut rng);
            prop_assert!(b.rates.iter().any(|w| w.rarity == r));
        }
    }

    #[test]
    fn test_arbitrary_draw_lands_in_table(x in 0.0f64..1.0, w1 in 0.0f64..1.0) {
        let rates = vec![
            RarityWeight { rarity: Rarity::S, weight: w1 },
            RarityWeight { rarity: Rarity::A, weight: (1.0 - w1) * 0.5 },
        ];
        let r = rarity_at(&rates, x);
        prop_assert!(r == Rarity::S || r == Rarity::A);
    }

    #[test]
    fn test_ten_pull_meets_pity_floor(seed in any::<u64>()) {
        let catalog = catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let batch = summon_ten(&b_only_banner(), &catalog.units, &mut rng);
        prop_assert_eq!(batch.pulls.len(), 10);
        prop_assert!(batch.pulls.iter().any(|p| p.rarity().is_pity_floor()));
    }
}
