//! Reward engine: tier tables, level curve, and the reward calculator.
//!
//! # Calculation order
//!
//! ```text
//! base (per activity kind)
//!   + bonuses (perfect, first try, speed, streak, party)
//!   × subscription × adventure difficulty × balance tier × events
//!   → floor
//! ```
//!
//! XP quotes run the same bonus rules but only event multipliers.

pub mod bonus;
pub mod levels;
pub mod multiplier;
pub mod quote;
pub mod tiers;

pub use bonus::{Bonus, BonusFlags, BonusInputs, BonusKind, compute_bonuses};
pub use levels::{
    LevelProgress, MAX_LEVEL, level_from_xp, level_progress, total_xp_for_level, xp_for_level,
};
pub use multiplier::{
    EventFlags, Multiplier, MultiplierContext, MultiplierSource, MultiplierStack,
    SubscriptionTier,
};
pub use quote::{
    ActivityKind, ActivityOptions, ActivityRewards, AdventureOptions, CheckpointOptions,
    MissionOptions, RewardCalculator, RewardQuote, RewardTable, StageOptions, quote,
};
pub use tiers::{BALANCE_TIERS, BalanceTier, NextTier, next_tier, tier_for};
