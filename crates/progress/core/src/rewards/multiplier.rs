//! Multiplier stack.
//!
//! Every reward multiplier (subscription, adventure difficulty, balance tier,
//! seasonal events) composes multiplicatively. Factors are kept as exact basis
//! points and the product is floored once at the end, so
//! `floor(100 × 1.15)` is 115 and not 114 through float drift.

use bitflags::bitflags;

use crate::curriculum::AdventureId;

use super::tiers::tier_for;

/// Multiplicative factor in basis points (10 000 = ×1.0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Multiplier(u32);

impl Multiplier {
    pub const BASIS: u32 = 10_000;
    pub const ONE: Self = Self(Self::BASIS);

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::BASIS as f64
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

/// Where a factor in the stack came from. Carried for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum MultiplierSource {
    Subscription,
    Adventure,
    BalanceTier,
    DoubleXp,
    Weekend,
    Holiday,
}

/// Ordered collection of factors applied together.
///
/// # Example
/// ```
/// # use progress_core::rewards::{Multiplier, MultiplierSource, MultiplierStack};
/// let mut stack = MultiplierStack::new();
/// stack.add(MultiplierSource::Subscription, Multiplier::from_basis_points(11_000));
/// stack.add(MultiplierSource::Weekend, Multiplier::from_basis_points(15_000));
///
/// // floor(100 × 1.1 × 1.5) = 165
/// assert_eq!(stack.apply(100), 165);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplierStack {
    factors: Vec<(MultiplierSource, Multiplier)>,
}

impl MultiplierStack {
    pub fn new() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    pub fn add(&mut self, source: MultiplierSource, factor: Multiplier) {
        self.factors.push((source, factor));
    }

    pub fn factors(&self) -> &[(MultiplierSource, Multiplier)] {
        &self.factors
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Product of all factors, for display.
    pub fn combined(&self) -> f64 {
        self.factors
            .iter()
            .map(|(_, factor)| factor.as_f64())
            .product()
    }

    /// `floor(amount × Π factors)`.
    ///
    /// Exact rational arithmetic; falls back to saturating float math only if
    /// the exact product would overflow `u128`.
    pub fn apply(&self, amount: u64) -> u64 {
        match self.apply_exact(amount) {
            Some(result) => result,
            None => (amount as f64 * self.combined()).floor() as u64,
        }
    }

    fn apply_exact(&self, amount: u64) -> Option<u64> {
        let mut numerator = amount as u128;
        let mut denominator: u128 = 1;
        for (_, factor) in &self.factors {
            numerator = numerator.checked_mul(factor.0 as u128)?;
            denominator = denominator.checked_mul(Multiplier::BASIS as u128)?;
            let divisor = gcd(numerator, denominator);
            numerator /= divisor;
            denominator /= divisor;
        }
        Some((numerator / denominator).min(u64::MAX as u128) as u64)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Subscription plan.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Plus,
    Premium,
}

impl SubscriptionTier {
    pub const fn multiplier(self) -> Multiplier {
        match self {
            Self::Free => Multiplier::ONE,
            Self::Plus => Multiplier::from_basis_points(11_000),
            Self::Premium => Multiplier::from_basis_points(12_500),
        }
    }
}

bitflags! {
    /// Time-limited events that boost every reward while active.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EventFlags: u8 {
        const DOUBLE_XP = 1 << 0;
        const WEEKEND   = 1 << 1;
        const HOLIDAY   = 1 << 2;
    }
}

impl EventFlags {
    fn factors(self) -> impl Iterator<Item = (MultiplierSource, Multiplier)> {
        [
            (
                Self::DOUBLE_XP,
                MultiplierSource::DoubleXp,
                Multiplier::from_basis_points(20_000),
            ),
            (
                Self::WEEKEND,
                MultiplierSource::Weekend,
                Multiplier::from_basis_points(15_000),
            ),
            (
                Self::HOLIDAY,
                MultiplierSource::Holiday,
                Multiplier::from_basis_points(12_500),
            ),
        ]
        .into_iter()
        .filter(move |(flag, _, _)| self.contains(*flag))
        .map(|(_, source, factor)| (source, factor))
    }
}

/// Everything about the learner that scales a reward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplierContext {
    pub subscription: SubscriptionTier,
    /// Adventure the activity belongs to; `None` skips the difficulty factor.
    pub adventure: Option<AdventureId>,
    /// Current Baraka balance, used to pick the tier factor.
    pub balance: u64,
    pub events: EventFlags,
}

impl MultiplierContext {
    /// Full stack for Baraka: subscription × adventure × tier × events.
    pub fn stack(&self) -> MultiplierStack {
        let mut stack = MultiplierStack::new();
        stack.add(MultiplierSource::Subscription, self.subscription.multiplier());
        if let Some(adventure) = self.adventure {
            stack.add(
                MultiplierSource::Adventure,
                Multiplier::from_basis_points(adventure.difficulty_bp()),
            );
        }
        stack.add(MultiplierSource::BalanceTier, tier_for(self.balance).multiplier);
        for (source, factor) in self.events.factors() {
            stack.add(source, factor);
        }
        stack
    }

    /// Event factors only. XP is not scaled by wealth or plan.
    pub fn event_stack(&self) -> MultiplierStack {
        let mut stack = MultiplierStack::new();
        for (source, factor) in self.events.factors() {
            stack.add(source, factor);
        }
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_identity() {
        assert_eq!(MultiplierStack::new().apply(1234), 1234);
        assert_eq!(MultiplierStack::new().combined(), 1.0);
    }

    #[test]
    fn exact_floor_avoids_float_drift() {
        let mut stack = MultiplierStack::new();
        stack.add(MultiplierSource::BalanceTier, Multiplier::from_basis_points(11_500));
        // 100 × 1.15 in f64 is 114.99999999999999.
        assert_eq!(stack.apply(100), 115);
    }

    #[test]
    fn factors_multiply_rather_than_add() {
        let context = MultiplierContext {
            subscription: SubscriptionTier::Plus,
            adventure: Some(AdventureId::new(3).unwrap()),
            balance: 1_000,
            events: EventFlags::DOUBLE_XP,
        };
        let stack = context.stack();
        assert_eq!(stack.len(), 4);
        // 1.1 × 1.1 × 1.05 × 2.0 = 2.541
        assert_eq!(stack.apply(1_000), 2_541);
        assert!((stack.combined() - 2.541).abs() < 1e-9);
    }

    #[test]
    fn event_stack_ignores_plan_and_tier() {
        let context = MultiplierContext {
            subscription: SubscriptionTier::Premium,
            adventure: None,
            balance: 2_000_000,
            events: EventFlags::WEEKEND | EventFlags::HOLIDAY,
        };
        // 1.5 × 1.25
        assert_eq!(context.event_stack().apply(80), 150);
    }

    #[test]
    fn overflow_falls_back_to_saturating_float() {
        let mut stack = MultiplierStack::new();
        for _ in 0..12 {
            stack.add(MultiplierSource::Holiday, Multiplier::from_basis_points(10_001));
        }
        assert!(stack.apply(u64::MAX) >= u64::MAX - 1);
    }
}
