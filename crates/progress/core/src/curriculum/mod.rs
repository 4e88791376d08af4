//! Curriculum shape: validated ids and the fixed Adventure → Stage table.
//!
//! Adventures → Stages → Missions → Bites. Everything here is static; the
//! learner's completion state lives in [`crate::state`].

mod ids;
mod table;

pub use ids::{AdventureId, BiteId, IdError, MissionId, StageNumber};
pub use table::{ADVENTURE_DIFFICULTY_BP, ADVENTURE_STAGES};
