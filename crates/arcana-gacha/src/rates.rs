//! Weighted rarity draw.

use rand::Rng;

use arcana_core::catalog::{Banner, RarityWeight};
use arcana_core::enums::Rarity;

/// Draw a rarity tier from the banner's weight table.
pub fn roll_rarity<R: Rng + ?Sized>(banner: &Banner, rng: &mut R) -> Rarity {
    rarity_at(&banner.rates, rng.gen::<f64>())
}

/// Tier selected by a draw `x` in `[0, 1)`: the first tier whose cumulative
/// weight reaches `x`.
///
/// When float rounding leaves the accumulation just short of `x`, the
/// lowest tier is returned. That is B when the table has it, otherwise the
/// table's last entry, so the result always appears in the table.
pub fn rarity_at(rates: &[RarityWeight], x: f64) -> Rarity {
    let mut acc = 0.0;
    for tier in rates {
        acc += tier.weight;
        if x <= acc {
            return tier.rarity;
        }
    }
    fallback_tier(rates)
}

fn fallback_tier(rates: &[RarityWeight]) -> Rarity {
    if rates.iter().any(|t| t.rarity == Rarity::B) {
        return Rarity::B;
    }
    rates.last().map(|t| t.rarity).unwrap_or(Rarity::B)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<RarityWeight> {
        vec![
            RarityWeight { rarity: Rarity::SS, weight: 0.02 },
            RarityWeight { rarity: Rarity::S, weight: 0.08 },
            RarityWeight { rarity: Rarity::A, weight: 0.25 },
            RarityWeight { rarity: Rarity::B, weight: 0.65 },
        ]
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let rates = table();
        assert_eq!(rarity_at(&rates, 0.0), Rarity::SS);
        assert_eq!(rarity_at(&rates, 0.02), Rarity::SS);
        assert_eq!(rarity_at(&rates, 0.021), Rarity::S);
        assert_eq!(rarity_at(&rates, 0.3), Rarity::A);
        assert_eq!(rarity_at(&rates, 0.5), Rarity::B);
    }

    #[test]
    fn test_shortfall_falls_back_to_lowest_tier() {
        let rates = vec![
            RarityWeight { rarity: Rarity::S, weight: 0.3 },
            RarityWeight { rarity: Rarity::B, weight: 0.3 },
        ];
        assert_eq!(rarity_at(&rates, 0.9), Rarity::B);
    }

    #[test]
    fn test_fallback_stays_inside_table_without_b() {
        let rates = vec![
            RarityWeight { rarity: Rarity::SS, weight: 0.4 },
            RarityWeight { rarity: Rarity::A, weight: 0.4 },
        ];
        assert_eq!(rarity_at(&rates, 0.95), Rarity::A);
    }
}
