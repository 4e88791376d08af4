//! Deterministic curriculum progress and reward rules.
//!
//! `progress-core` defines the canonical learning model (adventures, stages,
//! missions, bites), the lock and retry rules, the progress aggregator, and the
//! reward engine. Every API is pure: callers pass `now` explicitly and own all
//! state, so the same inputs always produce the same snapshots and quotes.
//! All learner mutations flow through [`change::Change::apply`].
pub mod change;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod progress;
pub mod retry;
pub mod rewards;
pub mod state;

pub use change::{Applied, Change, Milestone};
pub use config::EngineConfig;
pub use curriculum::{AdventureId, BiteId, IdError, MissionId, StageNumber};
pub use error::{EngineError, ErrorSeverity, ProgressError};
pub use progress::{
    AdventureProgress, CurrentPosition, MissionProgress, OverallProgress, ProgressChain,
    ProgressSnapshot, ProgressStatus, StageProgress,
};
pub use retry::{RetryAction, RetryPhase, RetryState};
pub use rewards::{
    ActivityKind, BonusFlags, BonusInputs, EventFlags, MultiplierContext, RewardCalculator,
    RewardQuote, RewardTable, SubscriptionTier,
};
pub use state::{Adventure, Bite, Briefing, Curriculum, Mission, Stage, Timestamp};
