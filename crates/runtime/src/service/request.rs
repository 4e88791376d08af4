//! Mutation inputs and outputs.

use progress_core::rewards::MultiplierContext;
use progress_core::{Applied, Change, Milestone, ProgressChain, RewardQuote};
use serde_json::Value;

use crate::entity::Entity;

/// Everything about the learner that affects reward amounts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LearnerContext {
    /// Adventure is filled per milestone; any value set here is ignored.
    pub multipliers: MultiplierContext,
    pub streak_days: u32,
    pub days_ahead: u32,
    pub party_members: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MutationRequest {
    pub change: Change,
    /// Edit content for `SaveBiteDraft` and `PauseMission`.
    pub draft: Option<Value>,
    pub learner: LearnerContext,
}

impl MutationRequest {
    pub fn new(change: Change) -> Self {
        Self {
            change,
            draft: None,
            learner: LearnerContext::default(),
        }
    }

    pub fn with_draft(mut self, draft: Value) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn with_learner(mut self, learner: LearnerContext) -> Self {
        self.learner = learner;
        self
    }
}

impl From<Change> for MutationRequest {
    fn from(change: Change) -> Self {
        Self::new(change)
    }
}

/// Baraka and XP earned by one newly completed node.
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneReward {
    pub milestone: Milestone,
    pub baraka: RewardQuote,
    pub xp: RewardQuote,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MutationOutcome {
    pub applied: Applied,
    /// Mission as returned by the data source.
    pub persisted: Entity,
    pub chain: ProgressChain,
    pub rewards: Vec<MilestoneReward>,
}

impl MutationOutcome {
    pub fn total_baraka(&self) -> u64 {
        self.rewards
            .iter()
            .fold(0u64, |total, reward| total.saturating_add(reward.baraka.final_amount))
    }

    pub fn total_xp(&self) -> u64 {
        self.rewards
            .iter()
            .fold(0u64, |total, reward| total.saturating_add(reward.xp.final_amount))
    }
}
