//! In-memory ProgressSource implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use progress_core::{Adventure, AdventureId, Briefing, Change, Curriculum, MissionId, Timestamp};

use super::{ProgressSource, Result, SourceError};
use crate::cache::Target;
use crate::entity::Entity;

/// In-memory implementation of ProgressSource.
///
/// Holds one learner's curriculum plus presentation content. Counts fetches
/// so callers can observe cache behaviour, and can be switched offline to
/// simulate an unreachable backend.
pub struct InMemorySource {
    curriculum: RwLock<Curriculum>,
    adventures: Vec<Adventure>,
    briefings: HashMap<MissionId, Briefing>,
    fetches: AtomicUsize,
    offline: AtomicBool,
}

impl InMemorySource {
    pub fn new(curriculum: Curriculum) -> Self {
        Self {
            curriculum: RwLock::new(curriculum),
            adventures: AdventureId::all().map(Adventure::new).collect(),
            briefings: HashMap::new(),
            fetches: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Replaces the adventure display metadata and briefings.
    pub fn with_content(
        mut self,
        adventures: impl IntoIterator<Item = Adventure>,
        briefings: impl IntoIterator<Item = Briefing>,
    ) -> Self {
        for adventure in adventures {
            let index = adventure.id.index();
            self.adventures[index] = adventure;
        }
        self.briefings = briefings
            .into_iter()
            .map(|briefing| (briefing.mission, briefing))
            .collect();
        self
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// While offline every call fails with [`SourceError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Copy of the stored curriculum, bypassing the counters.
    pub fn snapshot(&self) -> Result<Curriculum> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Curriculum>> {
        self.curriculum
            .read()
            .map_err(|_| SourceError::LockPoisoned)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("in-memory source is offline".into()));
        }
        Ok(())
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(Curriculum::default())
    }
}

#[async_trait]
impl ProgressSource for InMemorySource {
    async fn fetch(&self, target: &Target) -> Result<Entity> {
        self.ensure_online()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let entity = match *target {
            Target::Briefing(mission) => self
                .briefings
                .get(&mission)
                .cloned()
                .map(Entity::Briefing)
                .ok_or_else(|| SourceError::NotFound(target.key()))?,
            Target::Adventure(adventure) => {
                Entity::Adventure(self.adventures[adventure.index()].clone())
            }
            Target::Bite(bite) => Entity::Bite(self.read()?.bite(bite).clone()),
            Target::MissionBites(mission) => {
                Entity::Bites(self.read()?.mission(mission).bites.to_vec())
            }
            Target::Mission(mission) => Entity::Mission(self.read()?.mission(mission).clone()),
            Target::StageMissions(stage) => {
                Entity::Missions(self.read()?.stage(stage).missions.to_vec())
            }
            Target::Stage(stage) => Entity::Stage(self.read()?.stage(stage).clone()),
            Target::Curriculum => Entity::Curriculum(Box::new(self.read()?.clone())),
        };
        Ok(entity)
    }

    async fn persist(&self, change: &Change, now: Timestamp) -> Result<Entity> {
        self.ensure_online()?;
        let mut curriculum = self
            .curriculum
            .write()
            .map_err(|_| SourceError::LockPoisoned)?;
        change.apply(&mut curriculum, now)?;
        Ok(Entity::Mission(curriculum.mission(change.mission()).clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_reads_current_state() {
        let source = InMemorySource::default();
        let bite = "S1M1B1".parse().unwrap();

        source
            .persist(
                &Change::SubmitBite {
                    bite,
                    checkpoint_passed: true,
                    perfect_score: true,
                },
                Timestamp::from_millis(1),
            )
            .await
            .unwrap();

        match source.fetch(&Target::Bite(bite)).await.unwrap() {
            Entity::Bite(record) => assert!(record.is_completed),
            other => panic!("unexpected {}", other.label()),
        }
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn missing_briefing_is_not_found() {
        let source = InMemorySource::default();
        let err = source
            .fetch(&Target::Briefing(MissionId::FIRST))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(key) if key == "briefing_S1M1"));
    }

    #[tokio::test]
    async fn offline_source_fails_without_counting() {
        let source = InMemorySource::default();
        source.set_offline(true);
        assert!(matches!(
            source.fetch(&Target::Curriculum).await,
            Err(SourceError::Unavailable(_))
        ));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn locked_change_is_rejected() {
        let source = InMemorySource::default();
        let err = source
            .persist(
                &Change::StartBite {
                    bite: "S2M1B1".parse().unwrap(),
                },
                Timestamp::from_millis(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Rejected(inner) if inner.is_locked()));
    }
}
