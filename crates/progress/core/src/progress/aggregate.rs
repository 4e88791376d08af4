//! Bottom-up roll-up: bite → mission → stage → adventure → overall.
//!
//! Every level is computed strictly from the level below on every call.
//! Nothing here caches; the runtime decides whether to cache the result.

use crate::config::EngineConfig;
use crate::curriculum::{AdventureId, MissionId, StageNumber};
use crate::state::{Curriculum, Mission, Stage};

use super::status::{ProgressSnapshot, ProgressStatus, Tally};

/// Mission roll-up. `snapshot` counts bites.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionProgress {
    pub mission: MissionId,
    pub snapshot: ProgressSnapshot,
    pub bites: Tally,
    pub checkpoints: Tally,
}

/// Stage roll-up. `snapshot` counts missions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageProgress {
    pub stage: StageNumber,
    pub snapshot: ProgressSnapshot,
    pub missions: Tally,
    pub bites: Tally,
    pub checkpoints: Tally,
    pub children: Vec<MissionProgress>,
}

/// Adventure roll-up. `snapshot` counts stages.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdventureProgress {
    pub adventure: AdventureId,
    pub snapshot: ProgressSnapshot,
    pub stages: Tally,
    pub missions: Tally,
    pub bites: Tally,
    pub checkpoints: Tally,
    pub children: Vec<StageProgress>,
}

/// Where the learner should continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentPosition {
    pub adventure: AdventureId,
    pub stage: Option<StageNumber>,
}

/// Whole-curriculum roll-up. `snapshot` counts adventures.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverallProgress {
    pub snapshot: ProgressSnapshot,
    pub adventures: Tally,
    pub stages: Tally,
    pub missions: Tally,
    pub bites: Tally,
    pub checkpoints: Tally,
    /// `None` once the whole curriculum is completed.
    pub current_position: Option<CurrentPosition>,
    pub children: Vec<AdventureProgress>,
}

/// The chain of aggregates a single mission contributes to. This is what a
/// mutation hands back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressChain {
    pub mission: MissionProgress,
    pub stage: StageProgress,
    pub adventure: AdventureProgress,
    pub overall: OverallProgress,
}

/// `completed / 5` bites; status from the mission's stored lock flag.
pub fn mission_progress(mission: &Mission) -> MissionProgress {
    let bites = Tally::new(mission.completed_bites(), EngineConfig::BITES_PER_MISSION);
    MissionProgress {
        mission: mission.id,
        snapshot: ProgressSnapshot::new(bites, mission.is_locked, mission.is_started()),
        bites,
        checkpoints: Tally::new(mission.checkpoints_passed(), EngineConfig::BITES_PER_MISSION),
    }
}

pub fn stage_progress(stage: &Stage) -> StageProgress {
    let children: Vec<MissionProgress> = stage.missions.iter().map(mission_progress).collect();
    let missions = Tally::new(
        children
            .iter()
            .filter(|child| child.bites.completed == child.bites.total)
            .count(),
        children.len(),
    );
    let started = children.iter().any(|child| is_active(child.snapshot.status))
        || stage.is_started();

    StageProgress {
        stage: stage.number,
        snapshot: ProgressSnapshot::new(missions, stage.is_locked, started),
        missions,
        bites: children.iter().map(|child| child.bites).sum(),
        checkpoints: children.iter().map(|child| child.checkpoints).sum(),
        children,
    }
}

/// Sums across the adventure's stages from the fixed table. Locked while its
/// first stage is locked.
pub fn adventure_progress(curriculum: &Curriculum, adventure: AdventureId) -> AdventureProgress {
    let children: Vec<StageProgress> = curriculum
        .adventure_stages(adventure)
        .map(stage_progress)
        .collect();
    let stages = Tally::new(
        children
            .iter()
            .filter(|child| child.missions.completed == child.missions.total)
            .count(),
        children.len(),
    );
    let locked = curriculum.stage(adventure.first_stage()).is_locked;
    let started = children
        .iter()
        .any(|child| child.bites.completed > 0 || is_active(child.snapshot.status))
        || curriculum
            .adventure_stages(adventure)
            .any(Stage::is_started);

    AdventureProgress {
        adventure,
        snapshot: ProgressSnapshot::new(stages, locked, started),
        stages,
        missions: children.iter().map(|child| child.missions).sum(),
        bites: children.iter().map(|child| child.bites).sum(),
        checkpoints: children.iter().map(|child| child.checkpoints).sum(),
        children,
    }
}

pub fn overall_progress(curriculum: &Curriculum) -> OverallProgress {
    let children: Vec<AdventureProgress> = AdventureId::all()
        .map(|adventure| adventure_progress(curriculum, adventure))
        .collect();
    let adventures = Tally::new(
        children
            .iter()
            .filter(|child| child.stages.completed == child.stages.total)
            .count(),
        children.len(),
    );
    let started = children.iter().any(|child| child.bites.completed > 0)
        || curriculum.bites().any(|bite| bite.is_started());

    OverallProgress {
        // The first node of the curriculum is never locked, so neither is the whole.
        snapshot: ProgressSnapshot::new(adventures, false, started),
        adventures,
        stages: children.iter().map(|child| child.stages).sum(),
        missions: children.iter().map(|child| child.missions).sum(),
        bites: children.iter().map(|child| child.bites).sum(),
        checkpoints: children.iter().map(|child| child.checkpoints).sum(),
        current_position: current_position(&children),
        children,
    }
}

/// Aggregates for `mission` and everything above it.
pub fn progress_chain(curriculum: &Curriculum, mission: MissionId) -> ProgressChain {
    let overall = overall_progress(curriculum);
    let stage_number = mission.stage();
    let adventure_id = stage_number.adventure();

    let adventure = overall
        .children
        .iter()
        .find(|child| child.adventure == adventure_id)
        .cloned()
        .unwrap_or_else(|| adventure_progress(curriculum, adventure_id));
    let stage = adventure
        .children
        .iter()
        .find(|child| child.stage == stage_number)
        .cloned()
        .unwrap_or_else(|| stage_progress(curriculum.stage(stage_number)));
    let mission = stage
        .children
        .get(mission.index())
        .cloned()
        .unwrap_or_else(|| mission_progress(curriculum.mission(mission)));

    ProgressChain {
        mission,
        stage,
        adventure,
        overall,
    }
}

/// First adventure in progress, else first not started; within it, the first
/// stage picked by the same rule.
fn current_position(adventures: &[AdventureProgress]) -> Option<CurrentPosition> {
    let adventure = first_by_status(adventures, |child| child.snapshot.status)?;
    Some(CurrentPosition {
        adventure: adventure.adventure,
        stage: first_by_status(&adventure.children, |child| child.snapshot.status)
            .map(|stage| stage.stage),
    })
}

fn first_by_status<T>(items: &[T], status: impl Fn(&T) -> ProgressStatus) -> Option<&T> {
    items
        .iter()
        .find(|item| status(item) == ProgressStatus::InProgress)
        .or_else(|| {
            items
                .iter()
                .find(|item| status(item) == ProgressStatus::NotStarted)
        })
}

fn is_active(status: ProgressStatus) -> bool {
    matches!(status, ProgressStatus::InProgress | ProgressStatus::Completed)
}
