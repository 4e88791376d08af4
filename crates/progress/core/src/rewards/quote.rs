//! Reward quotes.
//!
//! A quote is a pure description of what a completion is worth. Nothing here
//! touches a balance or ledger; callers apply the quote themselves.

use super::bonus::{Bonus, BonusFlags, BonusInputs, compute_bonuses};
use super::multiplier::{MultiplierContext, MultiplierStack};

/// What was completed.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum ActivityKind {
    /// A bite whose checkpoint was passed.
    Checkpoint,
    Mission,
    Stage,
    Adventure,
}

/// Base amounts and flat bonus amounts for one activity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityRewards {
    pub base_baraka: u64,
    pub base_xp: u64,
    pub perfect_score: u64,
    pub first_try: u64,
    pub party_per_member: u64,
}

/// Per-kind reward amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardTable {
    pub checkpoint: ActivityRewards,
    pub mission: ActivityRewards,
    pub stage: ActivityRewards,
    pub adventure: ActivityRewards,
}

impl RewardTable {
    pub const DEFAULT: Self = Self {
        checkpoint: ActivityRewards {
            base_baraka: 10,
            base_xp: 20,
            perfect_score: 5,
            first_try: 3,
            party_per_member: 1,
        },
        mission: ActivityRewards {
            base_baraka: 50,
            base_xp: 100,
            perfect_score: 25,
            first_try: 15,
            party_per_member: 5,
        },
        stage: ActivityRewards {
            base_baraka: 250,
            base_xp: 500,
            perfect_score: 100,
            first_try: 50,
            party_per_member: 20,
        },
        adventure: ActivityRewards {
            base_baraka: 1_000,
            base_xp: 2_000,
            perfect_score: 500,
            first_try: 250,
            party_per_member: 100,
        },
    };

    pub fn for_kind(&self, kind: ActivityKind) -> &ActivityRewards {
        match kind {
            ActivityKind::Checkpoint => &self.checkpoint,
            ActivityKind::Mission => &self.mission,
            ActivityKind::Stage => &self.stage,
            ActivityKind::Adventure => &self.adventure,
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Priced completion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardQuote {
    pub activity: ActivityKind,
    pub base_amount: u64,
    pub bonuses: Vec<Bonus>,
    /// Product of every applied factor.
    pub multiplier: f64,
    /// `floor((base + Σ bonuses) × multiplier)`, computed exactly.
    pub final_amount: u64,
}

impl RewardQuote {
    pub fn bonus_total(&self) -> u64 {
        self.bonuses
            .iter()
            .fold(0u64, |total, bonus| total.saturating_add(bonus.amount))
    }
}

/// Quotes `base_amount` with the given bonus inputs and multiplier stack.
pub fn quote(
    activity: ActivityKind,
    base_amount: u64,
    inputs: &BonusInputs,
    stack: &MultiplierStack,
    table: &RewardTable,
) -> RewardQuote {
    let bonuses = compute_bonuses(base_amount, inputs, table.for_kind(activity));
    let subtotal = bonuses
        .iter()
        .fold(base_amount, |total, bonus| total.saturating_add(bonus.amount));

    RewardQuote {
        activity,
        base_amount,
        bonuses,
        multiplier: stack.combined(),
        final_amount: stack.apply(subtotal),
    }
}

/// Typed per-activity options. Each converts into the common [`BonusInputs`].
pub trait ActivityOptions {
    const KIND: ActivityKind;

    fn bonus_inputs(&self) -> BonusInputs;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointOptions {
    pub first_try: bool,
    pub perfect_score: bool,
    pub streak_days: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionOptions {
    pub first_try: bool,
    pub perfect_score: bool,
    pub days_ahead: u32,
    pub streak_days: u32,
    pub party_members: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageOptions {
    pub first_try: bool,
    pub perfect_score: bool,
    pub days_ahead: u32,
    pub streak_days: u32,
    pub party_members: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdventureOptions {
    pub perfect_score: bool,
    pub days_ahead: u32,
    pub party_members: u32,
}

fn flags_from(
    perfect_score: bool,
    first_try: bool,
    days_ahead: u32,
    streak_days: u32,
    party_members: u32,
) -> BonusFlags {
    let mut flags = BonusFlags::empty();
    flags.set(BonusFlags::PERFECT_SCORE, perfect_score);
    flags.set(BonusFlags::FIRST_TRY, first_try);
    flags.set(BonusFlags::SPEED, days_ahead > 0);
    flags.set(BonusFlags::STREAK, streak_days > 0);
    flags.set(BonusFlags::PARTY, party_members > 0);
    flags
}

impl ActivityOptions for CheckpointOptions {
    const KIND: ActivityKind = ActivityKind::Checkpoint;

    fn bonus_inputs(&self) -> BonusInputs {
        BonusInputs {
            flags: flags_from(self.perfect_score, self.first_try, 0, self.streak_days, 0),
            days_ahead: 0,
            streak_days: self.streak_days,
            party_members: 0,
        }
    }
}

impl ActivityOptions for MissionOptions {
    const KIND: ActivityKind = ActivityKind::Mission;

    fn bonus_inputs(&self) -> BonusInputs {
        BonusInputs {
            flags: flags_from(
                self.perfect_score,
                self.first_try,
                self.days_ahead,
                self.streak_days,
                self.party_members,
            ),
            days_ahead: self.days_ahead,
            streak_days: self.streak_days,
            party_members: self.party_members,
        }
    }
}

impl ActivityOptions for StageOptions {
    const KIND: ActivityKind = ActivityKind::Stage;

    fn bonus_inputs(&self) -> BonusInputs {
        BonusInputs {
            flags: flags_from(
                self.perfect_score,
                self.first_try,
                self.days_ahead,
                self.streak_days,
                self.party_members,
            ),
            days_ahead: self.days_ahead,
            streak_days: self.streak_days,
            party_members: self.party_members,
        }
    }
}

impl ActivityOptions for AdventureOptions {
    const KIND: ActivityKind = ActivityKind::Adventure;

    fn bonus_inputs(&self) -> BonusInputs {
        BonusInputs {
            flags: flags_from(self.perfect_score, false, self.days_ahead, 0, self.party_members),
            days_ahead: self.days_ahead,
            streak_days: 0,
            party_members: self.party_members,
        }
    }
}

/// Quotes activities against a configured [`RewardTable`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardCalculator {
    table: RewardTable,
}

impl RewardCalculator {
    pub fn new(table: RewardTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RewardTable {
        &self.table
    }

    /// Baraka quote with an explicit base.
    pub fn quote(
        &self,
        activity: ActivityKind,
        base_amount: u64,
        inputs: &BonusInputs,
        context: &MultiplierContext,
    ) -> RewardQuote {
        quote(activity, base_amount, inputs, &context.stack(), &self.table)
    }

    /// Baraka quote using the table's base for the activity kind.
    pub fn baraka<O: ActivityOptions>(
        &self,
        options: &O,
        context: &MultiplierContext,
    ) -> RewardQuote {
        let base = self.table.for_kind(O::KIND).base_baraka;
        self.quote(O::KIND, base, &options.bonus_inputs(), context)
    }

    /// XP quote: same bonus rules, event multipliers only.
    pub fn xp<O: ActivityOptions>(&self, options: &O, context: &MultiplierContext) -> RewardQuote {
        let base = self.table.for_kind(O::KIND).base_xp;
        quote(
            O::KIND,
            base,
            &options.bonus_inputs(),
            &context.event_stack(),
            &self.table,
        )
    }
}
