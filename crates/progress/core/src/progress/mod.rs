//! Progress aggregation and the lock rule.
//!
//! # Architecture
//!
//! ```text
//! [ Bite flags (source of truth) ]
//!      ↓
//! [ MissionProgress  ]  bites / 5
//!      ↓
//! [ StageProgress    ]  missions / 5
//!      ↓
//! [ AdventureProgress]  stages / table range
//!      ↓
//! [ OverallProgress  ]  adventures / 8 + current position
//! ```
//!
//! All functions are pure and recompute from scratch. The whole curriculum is
//! 875 bites, so a full recomputation is cheap enough to run on every mutation.

mod aggregate;
mod locks;
mod status;

pub use aggregate::{
    AdventureProgress, CurrentPosition, MissionProgress, OverallProgress, ProgressChain,
    StageProgress, adventure_progress, mission_progress, overall_progress, progress_chain,
    stage_progress,
};
pub use locks::{is_mission_unlocked, is_stage_unlocked, refresh_locks};
pub use status::{ProgressSnapshot, ProgressStatus, Tally, percentage};
