use crate::config::EngineConfig;
use crate::curriculum::{AdventureId, BiteId, MissionId, StageNumber};
use crate::error::ProgressError;

use super::{Adventure, Bite, Mission, Stage};

/// One learner's copy of the full 35-stage tree.
///
/// Stage `n` always sits at index `n - 1`; constructors enforce it, so lookups
/// by validated id cannot miss.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCurriculum"))]
pub struct Curriculum {
    stages: Vec<Stage>,
}

/// Wire shape of [`Curriculum`]; decoding goes through
/// [`Curriculum::from_stages`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCurriculum {
    stages: Vec<Stage>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCurriculum> for Curriculum {
    type Error = ProgressError;

    fn try_from(raw: RawCurriculum) -> Result<Self, Self::Error> {
        Self::from_stages(raw.stages)
    }
}

impl Curriculum {
    /// Fresh curriculum: nothing started, only `S1M1` unlocked.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            stages: StageNumber::all()
                .map(|number| Stage::new(number, config.max_retries))
                .collect(),
        }
    }

    /// Assembles a curriculum from stage records and re-derives every lock
    /// flag from bite completion.
    pub fn from_stages(mut stages: Vec<Stage>) -> Result<Self, ProgressError> {
        if stages.len() != EngineConfig::STAGE_COUNT {
            return Err(ProgressError::MalformedEntity {
                entity: "curriculum".to_string(),
                reason: "expected exactly 35 stages",
            });
        }
        stages.sort_by_key(|stage| stage.number);
        if !stages
            .iter()
            .zip(StageNumber::all())
            .all(|(stage, expected)| stage.number == expected)
        {
            return Err(ProgressError::MalformedEntity {
                entity: "curriculum".to_string(),
                reason: "duplicate stage numbers",
            });
        }

        let mut curriculum = Self { stages };
        curriculum.refresh_locks();
        Ok(curriculum)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, number: StageNumber) -> &Stage {
        &self.stages[number.index()]
    }

    pub fn stage_mut(&mut self, number: StageNumber) -> &mut Stage {
        &mut self.stages[number.index()]
    }

    pub fn mission(&self, id: MissionId) -> &Mission {
        &self.stage(id.stage()).missions[id.index()]
    }

    pub fn mission_mut(&mut self, id: MissionId) -> &mut Mission {
        &mut self.stage_mut(id.stage()).missions[id.index()]
    }

    pub fn bite(&self, id: BiteId) -> &Bite {
        &self.mission(id.mission()).bites[id.index()]
    }

    pub fn bite_mut(&mut self, id: BiteId) -> &mut Bite {
        &mut self.mission_mut(id.mission()).bites[id.index()]
    }

    /// Every mission in unlock-chain order.
    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.stages.iter().flat_map(|stage| stage.missions.iter())
    }

    /// Every bite in curriculum order.
    pub fn bites(&self) -> impl Iterator<Item = &Bite> {
        self.missions().flat_map(|mission| mission.bites.iter())
    }

    /// Stages belonging to `adventure`, in order.
    pub fn adventure_stages(&self, adventure: AdventureId) -> impl Iterator<Item = &Stage> {
        adventure.stages().map(|number| self.stage(number))
    }

    pub fn adventure(&self, id: AdventureId) -> Adventure {
        Adventure::new(id)
    }

    /// Re-applies the lock rule to every mission and stage.
    pub fn refresh_locks(&mut self) {
        crate::progress::refresh_locks(self);
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_curriculum_has_full_shape() {
        let curriculum = Curriculum::default();
        assert_eq!(curriculum.stages().len(), EngineConfig::STAGE_COUNT);
        assert_eq!(curriculum.missions().count(), EngineConfig::TOTAL_MISSIONS);
        assert_eq!(curriculum.bites().count(), EngineConfig::TOTAL_BITES);
    }

    #[test]
    fn lookups_resolve_by_id() {
        let curriculum = Curriculum::default();
        let bite: BiteId = "S12M3B4".parse().unwrap();
        assert_eq!(curriculum.bite(bite).id, bite);
        assert_eq!(curriculum.mission(bite.mission()).id, bite.mission());
    }

    #[test]
    fn short_stage_list_is_malformed() {
        let mut stages = Curriculum::default().stages().to_vec();
        stages.pop();
        let err = Curriculum::from_stages(stages).unwrap_err();
        assert!(matches!(err, ProgressError::MalformedEntity { .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decoding_validates_shape_and_rederives_locks() {
        let err = serde_json::from_str::<Curriculum>(r#"{"stages":[]}"#).unwrap_err();
        assert!(err.to_string().contains("expected exactly 35 stages"));

        // Lock flags on the wire are not trusted.
        let mut value = serde_json::to_value(Curriculum::default()).unwrap();
        value["stages"][0]["missions"][1]["is_locked"] = serde_json::Value::Bool(false);
        let decoded: Curriculum = serde_json::from_value(value).unwrap();
        assert!(decoded.mission("S1M2".parse().unwrap()).is_locked);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decoding_rejects_misplaced_bites() {
        let mut value = serde_json::to_value(Curriculum::default()).unwrap();
        value["stages"][0]["missions"][0]["bites"]
            .as_array_mut()
            .unwrap()
            .swap(0, 1);
        let err = serde_json::from_value::<Curriculum>(value).unwrap_err();
        assert!(err.to_string().contains("bites out of order"));
    }

    #[test]
    fn from_stages_accepts_any_order_and_rejects_gaps() {
        let mut stages = Curriculum::default().stages().to_vec();
        stages.reverse();
        let rebuilt = Curriculum::from_stages(stages.clone()).unwrap();
        assert_eq!(rebuilt, Curriculum::default());

        stages.pop();
        assert!(Curriculum::from_stages(stages).is_err());
    }
}
