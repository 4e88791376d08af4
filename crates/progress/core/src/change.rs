//! Learner changes and their application to a [`Curriculum`].
//!
//! Every change goes through the same two steps:
//!
//! 1. [`Change::pre_validate`] checks the lock rule and retry rights against the
//!    state **before** mutation.
//! 2. [`Change::apply`] mutates, re-derives locks, and reports the milestones
//!    the change reached so the caller can price them.
//!
//! Bite completion drives locks and progress. Rewards follow judgements: a
//! checkpoint pays when it passes, and a mission pays when it is judged
//! passed, along with any stage or adventure whose missions have now all
//! passed. A failed judgement pays nothing.
//!
//! A refused change leaves the curriculum untouched.

use crate::curriculum::{AdventureId, BiteId, MissionId};
use crate::error::ProgressError;
use crate::progress::is_mission_unlocked;
use crate::retry::RetryPhase;
use crate::rewards::ActivityKind;
use crate::state::{Curriculum, Mission, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Change {
    /// Opens a bite.
    StartBite { bite: BiteId },
    /// Stores an in-progress edit. The edit content itself is kept by the
    /// draft layer; the bite only records that it was opened.
    SaveBiteDraft { bite: BiteId },
    /// Hands a bite in. Completes it and records the checkpoint result.
    SubmitBite {
        bite: BiteId,
        checkpoint_passed: bool,
        /// Full marks on the checkpoint. Ignored unless it passed.
        #[cfg_attr(feature = "serde", serde(default))]
        perfect_score: bool,
    },
    /// Leaves a mission mid-way.
    PauseMission { mission: MissionId },
    /// Judges a mission whose five bites are all handed in.
    CompleteMission { mission: MissionId, passed: bool },
    GrantProvisionalRetry {
        mission: MissionId,
        expires_at: Timestamp,
    },
    GrantFullRetry { mission: MissionId },
    ConvertProvisionalRetry { mission: MissionId },
}

impl Change {
    pub fn mission(&self) -> MissionId {
        match self {
            Self::StartBite { bite }
            | Self::SaveBiteDraft { bite }
            | Self::SubmitBite { bite, .. } => bite.mission(),
            Self::PauseMission { mission }
            | Self::CompleteMission { mission, .. }
            | Self::GrantProvisionalRetry { mission, .. }
            | Self::GrantFullRetry { mission }
            | Self::ConvertProvisionalRetry { mission } => *mission,
        }
    }

    pub fn bite(&self) -> Option<BiteId> {
        match self {
            Self::StartBite { bite }
            | Self::SaveBiteDraft { bite }
            | Self::SubmitBite { bite, .. } => Some(*bite),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StartBite { .. } => "start_bite",
            Self::SaveBiteDraft { .. } => "save_bite_draft",
            Self::SubmitBite { .. } => "submit_bite",
            Self::PauseMission { .. } => "pause_mission",
            Self::CompleteMission { .. } => "complete_mission",
            Self::GrantProvisionalRetry { .. } => "grant_provisional_retry",
            Self::GrantFullRetry { .. } => "grant_full_retry",
            Self::ConvertProvisionalRetry { .. } => "convert_provisional_retry",
        }
    }

    /// Whether the change touches retry rights rather than bite work.
    pub fn is_retry_grant(&self) -> bool {
        matches!(
            self,
            Self::GrantProvisionalRetry { .. }
                | Self::GrantFullRetry { .. }
                | Self::ConvertProvisionalRetry { .. }
        )
    }

    /// Checks the change against the current state without mutating it.
    pub fn pre_validate(
        &self,
        curriculum: &Curriculum,
        now: Timestamp,
    ) -> Result<(), ProgressError> {
        let mission_id = self.mission();
        let mission = curriculum.mission(mission_id);

        if !self.is_retry_grant() && !is_mission_unlocked(curriculum, mission_id) {
            return Err(ProgressError::LockedContent {
                mission: mission_id,
            });
        }

        match self {
            Self::StartBite { .. } | Self::SaveBiteDraft { .. } | Self::SubmitBite { .. } => {
                if !mission.retry.permits_work(now) {
                    return Err(ProgressError::RetryExhausted {
                        mission: mission_id,
                        attempts: mission.retry.retry_attempts,
                        max_retries: mission.retry.max_retries,
                    });
                }
                Ok(())
            }
            Self::PauseMission { .. } => Ok(()),
            Self::CompleteMission { passed, .. } => {
                let completed = mission.completed_bites();
                if !mission.is_completed() {
                    return Err(ProgressError::IncompleteMission {
                        mission: mission_id,
                        completed,
                    });
                }
                // Dry run on a copy; the state machine refuses without mutating.
                mission
                    .retry
                    .clone()
                    .record_result(mission_id, *passed, now)
                    .map(|_| ())
            }
            Self::GrantProvisionalRetry { expires_at, .. } => mission
                .retry
                .clone()
                .grant_provisional(mission_id, *expires_at, now)
                .map(|_| ()),
            Self::GrantFullRetry { .. } => mission
                .retry
                .clone()
                .grant_full(mission_id, now)
                .map(|_| ()),
            Self::ConvertProvisionalRetry { .. } => mission
                .retry
                .clone()
                .convert_provisional(mission_id, now)
                .map(|_| ()),
        }
    }

    /// Validates, then mutates `curriculum`.
    pub fn apply(
        &self,
        curriculum: &mut Curriculum,
        now: Timestamp,
    ) -> Result<Applied, ProgressError> {
        self.pre_validate(curriculum, now)?;

        let mission_id = self.mission();
        let before = Completion::capture(curriculum, mission_id);
        let mut milestones = Vec::new();

        match self {
            Self::StartBite { bite } | Self::SaveBiteDraft { bite } => {
                curriculum.bite_mut(*bite).start(now);
            }
            Self::SubmitBite {
                bite,
                checkpoint_passed,
                perfect_score,
            } => {
                let had_passed = curriculum.bite(*bite).checkpoint_passed;
                let record = curriculum.bite_mut(*bite);
                record.submit(*checkpoint_passed, now);
                if record.checkpoint_passed && !had_passed {
                    milestones.push(Milestone {
                        kind: ActivityKind::Checkpoint,
                        mission: mission_id,
                        adventure: mission_id.stage().adventure(),
                        first_try: record.attempts == 1,
                        perfect_score: *perfect_score,
                    });
                }
            }
            Self::PauseMission { .. } => {}
            Self::CompleteMission { passed, .. } => {
                curriculum
                    .mission_mut(mission_id)
                    .retry
                    .record_result(mission_id, *passed, now)?;
            }
            Self::GrantProvisionalRetry { expires_at, .. } => {
                curriculum
                    .mission_mut(mission_id)
                    .retry
                    .grant_provisional(mission_id, *expires_at, now)?;
            }
            Self::GrantFullRetry { .. } => {
                curriculum
                    .mission_mut(mission_id)
                    .retry
                    .grant_full(mission_id, now)?;
            }
            Self::ConvertProvisionalRetry { .. } => {
                curriculum
                    .mission_mut(mission_id)
                    .retry
                    .convert_provisional(mission_id, now)?;
            }
        }

        curriculum.refresh_locks();

        let after = Completion::capture(curriculum, mission_id);
        milestones.extend(before.newly_passed(&after, curriculum, mission_id));

        Ok(Applied {
            change: self.clone(),
            retry_phase: curriculum.mission(mission_id).retry.effective_phase(now),
            milestones,
        })
    }
}

/// Something a change achieved: a checkpoint that newly passed, or a mission,
/// stage, or adventure whose missions are now all judged passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Milestone {
    pub kind: ActivityKind,
    /// Mission the triggering change targeted.
    pub mission: MissionId,
    pub adventure: AdventureId,
    /// No failed attempt: for a checkpoint, passed on the first submission;
    /// otherwise no failed judgement anywhere under the node.
    pub first_try: bool,
    /// Full marks for a checkpoint; every checkpoint passed for larger nodes.
    pub perfect_score: bool,
}

/// Result of a successfully applied change.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Applied {
    pub change: Change,
    pub retry_phase: RetryPhase,
    /// In completion order: checkpoint, mission, stage, adventure.
    pub milestones: Vec<Milestone>,
}

/// Which levels around one mission are fully judged passed.
#[derive(Clone, Copy)]
struct Completion {
    mission: bool,
    stage: bool,
    adventure: bool,
}

impl Completion {
    fn capture(curriculum: &Curriculum, mission: MissionId) -> Self {
        let stage = mission.stage();
        Self {
            mission: is_passed(curriculum.mission(mission)),
            stage: curriculum.stage(stage).missions.iter().all(is_passed),
            adventure: curriculum
                .adventure_stages(stage.adventure())
                .flat_map(|stage| stage.missions.iter())
                .all(is_passed),
        }
    }

    fn newly_passed(
        self,
        after: &Self,
        curriculum: &Curriculum,
        mission_id: MissionId,
    ) -> Vec<Milestone> {
        let stage_number = mission_id.stage();
        let adventure = stage_number.adventure();
        let mut milestones = Vec::new();

        if after.mission && !self.mission {
            let mission = curriculum.mission(mission_id);
            milestones.push(Milestone {
                kind: ActivityKind::Mission,
                mission: mission_id,
                adventure,
                first_try: mission.retry.retry_attempts == 0,
                perfect_score: mission.checkpoints_passed() == mission.bites.len(),
            });
        }
        if after.stage && !self.stage {
            let stage = curriculum.stage(stage_number);
            milestones.push(Milestone {
                kind: ActivityKind::Stage,
                mission: mission_id,
                adventure,
                first_try: stage
                    .missions
                    .iter()
                    .all(|mission| mission.retry.retry_attempts == 0),
                perfect_score: stage
                    .missions
                    .iter()
                    .all(|mission| mission.checkpoints_passed() == mission.bites.len()),
            });
        }
        if after.adventure && !self.adventure {
            let missions = || {
                curriculum
                    .adventure_stages(adventure)
                    .flat_map(|stage| stage.missions.iter())
            };
            milestones.push(Milestone {
                kind: ActivityKind::Adventure,
                mission: mission_id,
                adventure,
                first_try: missions().all(|mission| mission.retry.retry_attempts == 0),
                perfect_score: missions()
                    .all(|mission| mission.checkpoints_passed() == mission.bites.len()),
            });
        }
        milestones
    }
}

fn is_passed(mission: &Mission) -> bool {
    mission.retry.phase == RetryPhase::Passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::curriculum::StageNumber;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    fn submit(bite: BiteId, passed: bool) -> Change {
        Change::SubmitBite {
            bite,
            checkpoint_passed: passed,
            perfect_score: passed,
        }
    }

    fn submit_all(curriculum: &mut Curriculum, mission: MissionId, passed: bool) -> Vec<Milestone> {
        let mut milestones = Vec::new();
        for bite in mission.bites() {
            let applied = submit(bite, passed).apply(curriculum, at(10)).unwrap();
            milestones.extend(applied.milestones);
        }
        milestones
    }

    fn judge(curriculum: &mut Curriculum, mission: MissionId, passed: bool) -> Applied {
        Change::CompleteMission { mission, passed }
            .apply(curriculum, at(20))
            .unwrap()
    }

    fn kinds(milestones: &[Milestone]) -> Vec<ActivityKind> {
        milestones.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn locked_mission_refuses_work_without_mutation() {
        let mut curriculum = Curriculum::default();
        let snapshot = curriculum.clone();
        let bite: BiteId = "S1M2B1".parse().unwrap();

        let err = Change::StartBite { bite }
            .apply(&mut curriculum, at(1))
            .unwrap_err();

        assert!(err.is_locked());
        assert_eq!(curriculum, snapshot);
    }

    #[test]
    fn finishing_bites_unlocks_the_next_mission_but_pays_only_checkpoints() {
        let mut curriculum = Curriculum::default();
        let next = MissionId::new(1, 2).unwrap();
        assert!(curriculum.mission(next).is_locked);

        let milestones = submit_all(&mut curriculum, MissionId::FIRST, true);

        assert!(!curriculum.mission(next).is_locked);
        assert_eq!(kinds(&milestones), vec![ActivityKind::Checkpoint; 5]);

        let applied = judge(&mut curriculum, MissionId::FIRST, true);
        assert_eq!(kinds(&applied.milestones), vec![ActivityKind::Mission]);
        let mission = applied.milestones[0];
        assert!(mission.first_try && mission.perfect_score);
    }

    #[test]
    fn failed_judgement_pays_nothing_and_the_passing_retry_is_not_first_try() {
        let mut curriculum = Curriculum::default();
        let mission = MissionId::FIRST;
        submit_all(&mut curriculum, mission, true);

        let failed = judge(&mut curriculum, mission, false);
        assert!(failed.milestones.is_empty());

        Change::GrantFullRetry { mission }
            .apply(&mut curriculum, at(30))
            .unwrap();
        let passed = Change::CompleteMission {
            mission,
            passed: true,
        }
        .apply(&mut curriculum, at(40))
        .unwrap();

        assert_eq!(passed.retry_phase, RetryPhase::Passed);
        assert_eq!(kinds(&passed.milestones), vec![ActivityKind::Mission]);
        assert!(!passed.milestones[0].first_try);
        assert!(passed.milestones[0].perfect_score);
    }

    #[test]
    fn checkpoint_flags_follow_the_submission() {
        let mut curriculum = Curriculum::default();
        let first: BiteId = "S1M1B1".parse().unwrap();
        let second: BiteId = "S1M1B2".parse().unwrap();

        let applied = Change::SubmitBite {
            bite: first,
            checkpoint_passed: true,
            perfect_score: false,
        }
        .apply(&mut curriculum, at(1))
        .unwrap();
        let checkpoint = applied.milestones[0];
        assert!(checkpoint.first_try);
        assert!(!checkpoint.perfect_score);

        let failed = submit(second, false).apply(&mut curriculum, at(2)).unwrap();
        assert!(failed.milestones.is_empty());
        let applied = submit(second, true).apply(&mut curriculum, at(3)).unwrap();
        let checkpoint = applied.milestones[0];
        assert!(!checkpoint.first_try);
        assert!(checkpoint.perfect_score);
    }

    #[test]
    fn passing_stage_one_also_passes_adventure_zero() {
        let mut curriculum = Curriculum::default();
        let mut last = Vec::new();
        for mission in StageNumber::FIRST.missions() {
            submit_all(&mut curriculum, mission, false);
            last = judge(&mut curriculum, mission, true).milestones;
        }
        assert_eq!(
            kinds(&last),
            vec![ActivityKind::Mission, ActivityKind::Stage, ActivityKind::Adventure]
        );
        assert!(last.iter().all(|m| m.first_try && !m.perfect_score));
        assert!(!curriculum.stage(StageNumber::new(2).unwrap()).is_locked);
    }

    #[test]
    fn completing_requires_every_bite() {
        let mut curriculum = Curriculum::default();
        submit("S1M1B1".parse().unwrap(), true)
            .apply(&mut curriculum, at(1))
            .unwrap();

        let err = Change::CompleteMission {
            mission: MissionId::FIRST,
            passed: true,
        }
        .apply(&mut curriculum, at(2))
        .unwrap_err();
        assert_eq!(
            err,
            ProgressError::IncompleteMission {
                mission: MissionId::FIRST,
                completed: 1
            }
        );
    }

    #[test]
    fn failed_mission_blocks_work_until_a_grant() {
        let config = EngineConfig::default();
        let mut curriculum = Curriculum::new(&config);
        let mission = MissionId::FIRST;
        submit_all(&mut curriculum, mission, true);

        let applied = Change::CompleteMission {
            mission,
            passed: false,
        }
        .apply(&mut curriculum, at(100))
        .unwrap();
        assert_eq!(applied.retry_phase, RetryPhase::FailedAwaitingRetry);

        let bite = mission.bites().next().unwrap();
        let err = Change::StartBite { bite }
            .apply(&mut curriculum, at(101))
            .unwrap_err();
        assert!(err.is_retry_exhausted());

        let expires_at = config.provisional_expiry(at(200));
        Change::GrantProvisionalRetry {
            mission,
            expires_at,
        }
        .apply(&mut curriculum, at(200))
        .unwrap();
        Change::StartBite { bite }
            .apply(&mut curriculum, at(300))
            .unwrap();

        // Past the window the grant no longer permits work.
        let err = submit(bite, true)
            .apply(&mut curriculum, expires_at)
            .unwrap_err();
        assert!(err.is_retry_exhausted());
    }

    #[test]
    fn pause_only_checks_the_lock() {
        let mut curriculum = Curriculum::default();
        let applied = Change::PauseMission {
            mission: MissionId::FIRST,
        }
        .apply(&mut curriculum, at(5))
        .unwrap();
        assert!(applied.milestones.is_empty());
        assert_eq!(curriculum, Curriculum::default());

        let err = Change::PauseMission {
            mission: MissionId::new(2, 1).unwrap(),
        }
        .pre_validate(&curriculum, at(5))
        .unwrap_err();
        assert!(err.is_locked());
    }

    #[test]
    fn resubmitting_does_not_repeat_milestones() {
        let mut curriculum = Curriculum::default();
        submit_all(&mut curriculum, MissionId::FIRST, true);
        let again = submit("S1M1B3".parse().unwrap(), true)
            .apply(&mut curriculum, at(50))
            .unwrap();
        assert!(again.milestones.is_empty());
        assert_eq!(curriculum.bite("S1M1B3".parse().unwrap()).attempts, 2);
    }
}
