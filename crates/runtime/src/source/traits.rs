//! Data source contract.

use async_trait::async_trait;
use progress_core::{Change, Timestamp};

use super::Result;
use crate::cache::Target;
use crate::entity::Entity;

/// Remote source of truth for learner progress.
///
/// Implementations may be a network client, a database, or the in-memory
/// fixture used by tests and the demo binary. Both calls are fallible and the
/// service never retries them.
#[async_trait]
pub trait ProgressSource: Send + Sync {
    /// Current value of `target`.
    async fn fetch(&self, target: &Target) -> Result<Entity>;

    /// Applies `change` and returns the updated mission.
    async fn persist(&self, change: &Change, now: Timestamp) -> Result<Entity>;
}
