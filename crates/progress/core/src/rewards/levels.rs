//! XP → level curve.
//!
//! Level `n` (n > 1) requires `floor(100 × 1.5^(n−2))` XP on top of everything
//! needed for level `n−1`. The level is found by walking upward and summing
//! those floored requirements, never by inverting the exponential: the closed
//! form drifts from the stepwise sums by accumulated rounding.
//!
//! Cumulative XP for level 100 is roughly 5.7 × 10^19, past `u64::MAX`, so XP
//! totals are `u128`.

pub const BASE_XP: u32 = 100;
pub const GROWTH_NUMERATOR: u32 = 3;
pub const GROWTH_DENOMINATOR: u32 = 2;
pub const MAX_LEVEL: u32 = 100;

/// XP needed to go from level `n − 1` to level `n`. Zero for level 1 and below.
pub fn xp_for_level(level: u32) -> u128 {
    if level <= 1 {
        return 0;
    }
    let growth = GROWTH_NUMERATOR as f64 / GROWTH_DENOMINATOR as f64;
    (BASE_XP as f64 * growth.powi(level as i32 - 2)).floor() as u128
}

/// Cumulative XP needed to reach `level` from zero.
pub fn total_xp_for_level(level: u32) -> u128 {
    (2..=level.min(MAX_LEVEL)).map(xp_for_level).sum()
}

/// Highest level whose cumulative requirement is ≤ `total`, capped at
/// [`MAX_LEVEL`].
pub fn level_from_xp(total: u128) -> u32 {
    let mut level = 1;
    let mut accumulated: u128 = 0;
    while level < MAX_LEVEL {
        let next = accumulated + xp_for_level(level + 1);
        if next > total {
            break;
        }
        accumulated = next;
        level += 1;
    }
    level
}

/// Progress-bar view of a learner's XP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelProgress {
    pub level: u32,
    /// XP earned past the current level's threshold.
    pub xp_into_level: u128,
    /// XP between the current and the next level. `None` at [`MAX_LEVEL`].
    pub xp_for_next: Option<u128>,
    /// 0..=100, floored. 100 at [`MAX_LEVEL`].
    pub percent: u8,
}

pub fn level_progress(total: u128) -> LevelProgress {
    let level = level_from_xp(total);
    let xp_into_level = total - total_xp_for_level(level);

    if level >= MAX_LEVEL {
        return LevelProgress {
            level,
            xp_into_level,
            xp_for_next: None,
            percent: 100,
        };
    }

    let needed = xp_for_level(level + 1);
    LevelProgress {
        level,
        xp_into_level,
        xp_for_next: Some(needed),
        percent: (xp_into_level * 100 / needed.max(1)).min(100) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_requirements() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100);
        assert_eq!(xp_for_level(3), 150);
        assert_eq!(xp_for_level(4), 225);
        assert_eq!(xp_for_level(5), 337);
        assert_eq!(total_xp_for_level(5), 100 + 150 + 225 + 337);
    }

    #[test]
    fn level_round_trips_for_every_level() {
        for level in 1..=MAX_LEVEL {
            let total = total_xp_for_level(level);
            assert_eq!(level_from_xp(total), level, "level {level}");
            if level > 1 {
                assert_eq!(level_from_xp(total - 1), level - 1, "just below level {level}");
            }
        }
    }

    /// `floor(100 × (1.5^(n−1) − 1) / 0.5)` in exact integers. Fits `u128`
    /// well past level 30.
    fn closed_form_total(level: u32) -> u128 {
        let steps = level - 1;
        let (three, two) = (3u128.pow(steps), 2u128.pow(steps));
        200 * (three - two) / two
    }

    /// Level reached by accumulating requirements one at a time.
    fn walked_level(total: u128, thresholds: &[u128]) -> u32 {
        thresholds.iter().take_while(|&&needed| needed <= total).count() as u32
    }

    #[test]
    fn requirements_are_exact_floors() {
        for level in 2..=30 {
            let steps = level - 2;
            let exact = 100 * 3u128.pow(steps) / 2u128.pow(steps);
            assert_eq!(xp_for_level(level), exact, "level {level}");
        }
    }

    #[test]
    fn floored_sums_drift_below_the_closed_form() {
        for level in 1..=6 {
            assert_eq!(total_xp_for_level(level), closed_form_total(level), "level {level}");
        }

        assert_eq!(total_xp_for_level(7), 2_077);
        assert_eq!(closed_form_total(7), 2_078);
        assert_eq!(total_xp_for_level(30), 25_566_595);
        assert_eq!(closed_form_total(30), 25_566_607);

        for level in 2..=30 {
            let walked = total_xp_for_level(level);
            let closed = closed_form_total(level);
            assert!(walked <= closed, "level {level}");
            // Each requirement loses less than one XP to flooring.
            assert!(closed - walked <= u128::from(level - 2), "level {level}");
        }
    }

    #[test]
    fn level_matches_a_stepwise_walk_at_every_boundary() {
        // thresholds[i] is the cumulative XP for level i + 1.
        let mut thresholds = Vec::with_capacity(MAX_LEVEL as usize);
        let mut running: u128 = 0;
        for level in 1..=MAX_LEVEL {
            running += xp_for_level(level);
            thresholds.push(running);
        }
        assert_eq!(thresholds[MAX_LEVEL as usize - 1], total_xp_for_level(MAX_LEVEL));
        assert!(total_xp_for_level(MAX_LEVEL) > u64::MAX as u128);

        for &boundary in &thresholds {
            for total in [boundary.saturating_sub(1), boundary, boundary + 1] {
                assert_eq!(
                    level_from_xp(total),
                    walked_level(total, &thresholds),
                    "total {total}"
                );
            }
        }
    }

    #[test]
    fn level_is_capped() {
        assert_eq!(level_from_xp(u128::MAX), MAX_LEVEL);
        assert_eq!(level_from_xp(0), 1);
    }

    #[test]
    fn progress_within_level() {
        let progress = level_progress(175);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp_into_level, 75);
        assert_eq!(progress.xp_for_next, Some(150));
        assert_eq!(progress.percent, 50);

        let top = level_progress(total_xp_for_level(MAX_LEVEL) + 5);
        assert_eq!(top.level, MAX_LEVEL);
        assert_eq!(top.xp_for_next, None);
        assert_eq!(top.percent, 100);
    }
}
