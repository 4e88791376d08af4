//! Bonus rules.
//!
//! Bonuses are added to the base before any multiplier applies:
//! `final = floor((base + Σ bonuses) × Π multipliers)`.
//!
//! | Bonus         | Amount                                          |
//! |---------------|-------------------------------------------------|
//! | perfect score | flat, per activity kind                         |
//! | first try     | flat, per activity kind                         |
//! | speed         | `min(days_ahead × 5 %, 50 %)` of base           |
//! | streak        | `min((streak_days − 2) × 2 %, 100 %)` of base, from 3 days |
//! | party         | flat per other party member, per activity kind  |

use bitflags::bitflags;

use super::quote::ActivityRewards;

bitflags! {
    /// Which bonus rules are switched on for a quote.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BonusFlags: u8 {
        const PERFECT_SCORE = 1 << 0;
        const FIRST_TRY     = 1 << 1;
        const SPEED         = 1 << 2;
        const STREAK        = 1 << 3;
        const PARTY         = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BonusKind {
    PerfectScore,
    FirstTry,
    Speed,
    Streak,
    Party,
}

/// One applied bonus line of a quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bonus {
    pub kind: BonusKind,
    pub amount: u64,
}

/// Inputs the bonus rules read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusInputs {
    pub flags: BonusFlags,
    /// Days finished before the due date.
    pub days_ahead: u32,
    /// Consecutive active days including today.
    pub streak_days: u32,
    /// Other party members sharing the completion.
    pub party_members: u32,
}

pub const SPEED_PERCENT_PER_DAY: u32 = 5;
pub const SPEED_PERCENT_CAP: u32 = 50;
pub const STREAK_MIN_DAYS: u32 = 3;
pub const STREAK_PERCENT_PER_DAY: u32 = 2;
pub const STREAK_PERCENT_CAP: u32 = 100;

pub fn speed_bonus_percent(days_ahead: u32) -> u32 {
    days_ahead
        .saturating_mul(SPEED_PERCENT_PER_DAY)
        .min(SPEED_PERCENT_CAP)
}

pub fn streak_bonus_percent(streak_days: u32) -> u32 {
    if streak_days < STREAK_MIN_DAYS {
        return 0;
    }
    (streak_days - 2)
        .saturating_mul(STREAK_PERCENT_PER_DAY)
        .min(STREAK_PERCENT_CAP)
}

/// `floor(base × percent / 100)`.
pub fn percent_of(base: u64, percent: u32) -> u64 {
    ((base as u128 * percent as u128) / 100).min(u64::MAX as u128) as u64
}

/// Applies every enabled rule. Rules that come out to zero are left out.
pub fn compute_bonuses(base: u64, inputs: &BonusInputs, rewards: &ActivityRewards) -> Vec<Bonus> {
    let flags = inputs.flags;
    let candidates = [
        (
            BonusKind::PerfectScore,
            flags.contains(BonusFlags::PERFECT_SCORE),
            rewards.perfect_score,
        ),
        (
            BonusKind::FirstTry,
            flags.contains(BonusFlags::FIRST_TRY),
            rewards.first_try,
        ),
        (
            BonusKind::Speed,
            flags.contains(BonusFlags::SPEED),
            percent_of(base, speed_bonus_percent(inputs.days_ahead)),
        ),
        (
            BonusKind::Streak,
            flags.contains(BonusFlags::STREAK),
            percent_of(base, streak_bonus_percent(inputs.streak_days)),
        ),
        (
            BonusKind::Party,
            flags.contains(BonusFlags::PARTY),
            rewards
                .party_per_member
                .saturating_mul(inputs.party_members as u64),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(_, enabled, amount)| *enabled && *amount > 0)
        .map(|(kind, _, amount)| Bonus { kind, amount })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewards() -> ActivityRewards {
        ActivityRewards {
            base_baraka: 100,
            base_xp: 100,
            perfect_score: 25,
            first_try: 15,
            party_per_member: 5,
        }
    }

    #[test]
    fn streak_of_ten_days_is_sixteen_percent() {
        assert_eq!(streak_bonus_percent(10), 16);
        assert_eq!(percent_of(200, streak_bonus_percent(10)), 32);
    }

    #[test]
    fn streak_needs_three_days_and_caps_at_double() {
        assert_eq!(streak_bonus_percent(0), 0);
        assert_eq!(streak_bonus_percent(2), 0);
        assert_eq!(streak_bonus_percent(3), 2);
        assert_eq!(streak_bonus_percent(52), 100);
        assert_eq!(streak_bonus_percent(500), 100);
    }

    #[test]
    fn speed_caps_at_half() {
        assert_eq!(speed_bonus_percent(1), 5);
        assert_eq!(speed_bonus_percent(10), 50);
        assert_eq!(speed_bonus_percent(30), 50);
    }

    #[test]
    fn only_enabled_rules_apply() {
        let inputs = BonusInputs {
            flags: BonusFlags::FIRST_TRY | BonusFlags::STREAK,
            days_ahead: 4,
            streak_days: 10,
            party_members: 3,
        };
        let bonuses = compute_bonuses(100, &inputs, &rewards());
        assert_eq!(
            bonuses,
            vec![
                Bonus {
                    kind: BonusKind::FirstTry,
                    amount: 15
                },
                Bonus {
                    kind: BonusKind::Streak,
                    amount: 16
                },
            ]
        );
    }

    #[test]
    fn percentage_rules_vanish_on_zero_base() {
        let inputs = BonusInputs {
            flags: BonusFlags::all(),
            days_ahead: 4,
            streak_days: 10,
            party_members: 2,
        };
        let kinds: Vec<BonusKind> = compute_bonuses(0, &inputs, &rewards())
            .into_iter()
            .map(|bonus| bonus.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![BonusKind::PerfectScore, BonusKind::FirstTry, BonusKind::Party]
        );
    }
}
