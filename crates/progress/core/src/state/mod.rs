//! Learner-owned entities: bites, missions, stages, and the full curriculum.
//!
//! Bite completion flags are the single source of truth. Lock flags and every
//! status the aggregator reports are derived from them and can always be
//! recomputed.

mod adventure;
mod bite;
mod briefing;
mod curriculum;
mod mission;
mod stage;
mod time;

pub use adventure::Adventure;
pub use bite::Bite;
pub use briefing::Briefing;
pub use curriculum::Curriculum;
pub use mission::{Mission, MissionBites};
pub use stage::{Stage, StageMissions};
pub use time::Timestamp;
