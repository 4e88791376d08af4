//! Balance → tier lookup.
//!
//! The cumulative Baraka balance places a learner in one of seven tiers. Each
//! tier carries a reward multiplier; higher tiers earn slightly more per
//! completion.

use super::multiplier::Multiplier;

/// One row of the tier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BalanceTier {
    /// 0-based position in [`BALANCE_TIERS`].
    pub rank: u8,
    pub name: &'static str,
    /// Minimum balance to hold this tier.
    pub threshold: u64,
    pub multiplier: Multiplier,
}

/// Ordered by threshold, strictly increasing.
pub static BALANCE_TIERS: [BalanceTier; 7] = [
    tier(0, "seedling", 0, 10_000),
    tier(1, "sprout", 1_000, 10_500),
    tier(2, "sapling", 10_000, 11_000),
    tier(3, "grove", 50_000, 11_500),
    tier(4, "forest", 100_000, 12_000),
    tier(5, "canopy", 500_000, 12_500),
    tier(6, "summit", 1_000_000, 13_000),
];

const fn tier(rank: u8, name: &'static str, threshold: u64, multiplier_bp: u32) -> BalanceTier {
    BalanceTier {
        rank,
        name,
        threshold,
        multiplier: Multiplier::from_basis_points(multiplier_bp),
    }
}

/// Distance to the next tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NextTier {
    pub tier: &'static BalanceTier,
    pub remaining: u64,
    /// `floor(balance * 100 / next threshold)`.
    pub progress_percent: u8,
}

/// Highest tier whose threshold is ≤ `balance`.
pub fn tier_for(balance: u64) -> &'static BalanceTier {
    BALANCE_TIERS
        .iter()
        .rev()
        .find(|tier| tier.threshold <= balance)
        .unwrap_or(&BALANCE_TIERS[0])
}

/// Smallest tier whose threshold is > `balance`, or `None` at the top tier.
pub fn next_tier(balance: u64) -> Option<NextTier> {
    let tier = BALANCE_TIERS.iter().find(|tier| tier.threshold > balance)?;
    let progress = (balance as u128 * 100) / tier.threshold as u128;
    Some(NextTier {
        tier,
        remaining: tier.threshold - balance,
        progress_percent: progress.min(100) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_map_to_their_tier() {
        assert_eq!(tier_for(0).name, "seedling");
        assert_eq!(tier_for(999).name, "seedling");
        assert_eq!(tier_for(1_000).name, "sprout");
        assert_eq!(tier_for(75_000).name, "grove");
        assert_eq!(tier_for(u64::MAX).name, "summit");
    }

    #[test]
    fn tier_is_monotonic_in_balance() {
        let samples = [
            0, 1, 999, 1_000, 1_001, 9_999, 10_000, 49_999, 50_000, 99_999, 100_000, 499_999,
            500_000, 999_999, 1_000_000, 5_000_000,
        ];
        for pair in samples.windows(2) {
            let (low, high) = (tier_for(pair[0]), tier_for(pair[1]));
            assert!(low.rank <= high.rank);
            assert!(low.multiplier <= high.multiplier);
        }
    }

    #[test]
    fn next_tier_threshold_exceeds_balance() {
        for balance in [0, 500, 999, 1_000, 42_000, 999_999] {
            let next = next_tier(balance).expect("below top tier");
            assert!(next.tier.threshold > balance);
            assert_eq!(next.tier.rank, tier_for(balance).rank + 1);
        }
        assert!(next_tier(1_000_000).is_none());
    }

    #[test]
    fn progress_toward_next_tier() {
        let next = next_tier(950).unwrap();
        assert_eq!(next.tier.threshold, 1_000);
        assert_eq!(next.progress_percent, 95);
        assert_eq!(next.remaining, 50);
    }

    #[test]
    fn multipliers_stay_in_band() {
        for tier in &BALANCE_TIERS {
            assert!(tier.multiplier.basis_points() >= 10_000);
            assert!(tier.multiplier.basis_points() <= 13_000);
        }
    }
}
