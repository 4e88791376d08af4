use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::curriculum::{BiteId, MissionId};
use crate::error::ProgressError;
use crate::retry::RetryState;

use super::Bite;

/// Exactly five bites, in order.
pub type MissionBites = ArrayVec<Bite, { EngineConfig::BITES_PER_MISSION }>;

/// Group of five bites with its own retry rights.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMission"))]
pub struct Mission {
    pub id: MissionId,
    pub bites: MissionBites,
    /// Derived by the lock rule; see [`crate::progress::refresh_locks`].
    pub is_locked: bool,
    pub retry: RetryState,
}

/// Wire shape of [`Mission`]; decoding goes through [`Mission::from_parts`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMission {
    id: MissionId,
    bites: Vec<Bite>,
    is_locked: bool,
    retry: RetryState,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMission> for Mission {
    type Error = ProgressError;

    fn try_from(raw: RawMission) -> Result<Self, Self::Error> {
        Self::from_parts(raw.id, raw.bites, raw.is_locked, raw.retry)
    }
}

impl Mission {
    /// Untouched mission. Only the first mission of the curriculum starts
    /// unlocked.
    pub fn new(id: MissionId, max_retries: u32) -> Self {
        Self {
            id,
            bites: id.bites().map(Bite::new).collect(),
            is_locked: !id.is_first(),
            retry: RetryState::new(max_retries),
        }
    }

    /// Builds a mission from records handed in by a data source, checking that
    /// exactly the mission's five bites are present, in order.
    pub fn from_parts(
        id: MissionId,
        bites: Vec<Bite>,
        is_locked: bool,
        retry: RetryState,
    ) -> Result<Self, ProgressError> {
        let malformed = |reason| ProgressError::MalformedEntity {
            entity: format!("mission {id}"),
            reason,
        };

        if bites.len() != EngineConfig::BITES_PER_MISSION {
            return Err(malformed("expected exactly 5 bites"));
        }
        if !bites.iter().zip(id.bites()).all(|(bite, expected)| bite.id == expected) {
            return Err(malformed("bites out of order or from another mission"));
        }
        if retry.retry_attempts > retry.max_retries {
            return Err(malformed("retry attempts exceed max retries"));
        }

        Ok(Self {
            id,
            bites: bites.into_iter().collect(),
            is_locked,
            retry,
        })
    }

    pub fn bite(&self, id: BiteId) -> Option<&Bite> {
        (id.mission() == self.id).then(|| &self.bites[id.index()])
    }

    pub fn bite_mut(&mut self, id: BiteId) -> Option<&mut Bite> {
        if id.mission() == self.id {
            Some(&mut self.bites[id.index()])
        } else {
            None
        }
    }

    pub fn completed_bites(&self) -> usize {
        self.bites.iter().filter(|bite| bite.is_completed).count()
    }

    pub fn checkpoints_passed(&self) -> usize {
        self.bites.iter().filter(|bite| bite.checkpoint_passed).count()
    }

    /// All five bites completed.
    pub fn is_completed(&self) -> bool {
        self.bites.iter().all(|bite| bite.is_completed)
    }

    pub fn is_started(&self) -> bool {
        self.bites.iter().any(Bite::is_started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_mission_starts_unlocked() {
        assert!(!Mission::new(MissionId::FIRST, 3).is_locked);
        assert!(Mission::new(MissionId::new(1, 2).unwrap(), 3).is_locked);
    }

    #[test]
    fn from_parts_rejects_foreign_bites() {
        let id = MissionId::new(2, 3).unwrap();
        let other = MissionId::new(2, 4).unwrap();

        let good: Vec<Bite> = id.bites().map(Bite::new).collect();
        assert!(Mission::from_parts(id, good, true, RetryState::new(3)).is_ok());

        let foreign: Vec<Bite> = other.bites().map(Bite::new).collect();
        assert!(matches!(
            Mission::from_parts(id, foreign, true, RetryState::new(3)),
            Err(ProgressError::MalformedEntity { .. })
        ));

        let short: Vec<Bite> = id.bites().take(4).map(Bite::new).collect();
        assert!(Mission::from_parts(id, short, true, RetryState::new(3)).is_err());
    }

    #[test]
    fn bite_lookup_checks_parent() {
        let mission = Mission::new(MissionId::FIRST, 3);
        assert!(mission.bite("S1M1B3".parse().unwrap()).is_some());
        assert!(mission.bite("S1M2B3".parse().unwrap()).is_none());
    }
}
