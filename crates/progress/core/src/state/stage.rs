use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::curriculum::{AdventureId, MissionId, StageNumber};
use crate::error::ProgressError;

use super::Mission;

/// Exactly five missions, in order.
pub type StageMissions = ArrayVec<Mission, { EngineConfig::MISSIONS_PER_STAGE }>;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawStage"))]
pub struct Stage {
    pub number: StageNumber,
    pub missions: StageMissions,
    pub is_locked: bool,
}

/// Wire shape of [`Stage`]; decoding goes through [`Stage::from_parts`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawStage {
    number: StageNumber,
    missions: Vec<Mission>,
    is_locked: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStage> for Stage {
    type Error = ProgressError;

    fn try_from(raw: RawStage) -> Result<Self, Self::Error> {
        Self::from_parts(raw.number, raw.missions, raw.is_locked)
    }
}

impl Stage {
    pub fn new(number: StageNumber, max_retries: u32) -> Self {
        Self {
            number,
            missions: number
                .missions()
                .map(|id| Mission::new(id, max_retries))
                .collect(),
            is_locked: number != StageNumber::FIRST,
        }
    }

    pub fn from_parts(
        number: StageNumber,
        missions: Vec<Mission>,
        is_locked: bool,
    ) -> Result<Self, ProgressError> {
        let malformed = |reason| ProgressError::MalformedEntity {
            entity: format!("stage {number}"),
            reason,
        };

        if missions.len() != EngineConfig::MISSIONS_PER_STAGE {
            return Err(malformed("expected exactly 5 missions"));
        }
        if !missions
            .iter()
            .zip(number.missions())
            .all(|(mission, expected)| mission.id == expected)
        {
            return Err(malformed("missions out of order or from another stage"));
        }

        Ok(Self {
            number,
            missions: missions.into_iter().collect(),
            is_locked,
        })
    }

    pub fn adventure(&self) -> AdventureId {
        self.number.adventure()
    }

    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        (id.stage() == self.number).then(|| &self.missions[id.index()])
    }

    pub fn mission_mut(&mut self, id: MissionId) -> Option<&mut Mission> {
        if id.stage() == self.number {
            Some(&mut self.missions[id.index()])
        } else {
            None
        }
    }

    pub fn completed_missions(&self) -> usize {
        self.missions.iter().filter(|mission| mission.is_completed()).count()
    }

    pub fn is_completed(&self) -> bool {
        self.missions.iter().all(Mission::is_completed)
    }

    pub fn is_started(&self) -> bool {
        self.missions.iter().any(Mission::is_started)
    }
}
