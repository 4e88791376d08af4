//! Composite cache keys.
//!
//! Relationships between cached entries exist only in their keys:
//!
//! | Target            | Key                   | Kind     |
//! |-------------------|-----------------------|----------|
//! | one bite          | `bite_S3M2B4`         | detail   |
//! | bites of mission  | `bites_mission_S3M2`  | list     |
//! | one mission       | `mission_S3M2`        | detail   |
//! | missions of stage | `missions_stage_3`    | list     |
//! | one stage         | `stage_3`             | detail   |
//! | one adventure     | `adventure_2`         | detail   |
//! | mission briefing  | `briefing_S3M2`       | briefing |
//! | whole curriculum  | `curriculum`          | detail   |

use progress_core::{AdventureId, BiteId, Change, MissionId, StageNumber};

/// Freshness class of a cached entity. Each class has its own TTL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Detail,
    List,
    Briefing,
}

/// Something the service can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Bite(BiteId),
    MissionBites(MissionId),
    Mission(MissionId),
    StageMissions(StageNumber),
    Stage(StageNumber),
    Adventure(AdventureId),
    Briefing(MissionId),
    Curriculum,
}

impl Target {
    pub fn key(&self) -> String {
        match self {
            Self::Bite(bite) => format!("bite_{bite}"),
            Self::MissionBites(mission) => format!("bites_mission_{mission}"),
            Self::Mission(mission) => format!("mission_{mission}"),
            Self::StageMissions(stage) => format!("missions_stage_{stage}"),
            Self::Stage(stage) => format!("stage_{stage}"),
            Self::Adventure(adventure) => format!("adventure_{}", adventure.get()),
            Self::Briefing(mission) => format!("briefing_{mission}"),
            Self::Curriculum => "curriculum".to_string(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::MissionBites(_) | Self::StageMissions(_) => EntityKind::List,
            Self::Briefing(_) => EntityKind::Briefing,
            _ => EntityKind::Detail,
        }
    }
}

/// Keys a change makes stale: the node itself, every list and aggregate it
/// appears in, and the node it may unlock.
pub fn stale_keys(change: &Change) -> Vec<String> {
    let mission = change.mission();
    let mut targets = Vec::new();

    if let Some(bite) = change.bite() {
        targets.push(Target::Bite(bite));
    }
    push_mission_scope(&mut targets, mission);

    // Completion can unlock the successor, which may sit in the next stage
    // or adventure.
    let completes = matches!(
        change,
        Change::SubmitBite { .. } | Change::CompleteMission { .. }
    );
    if let Some(next) = mission.successor().filter(|_| completes) {
        push_mission_scope(&mut targets, next);
    }

    targets.push(Target::Curriculum);

    let mut keys: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets {
        let key = target.key();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn push_mission_scope(targets: &mut Vec<Target>, mission: MissionId) {
    let stage = mission.stage();
    targets.extend([
        Target::MissionBites(mission),
        Target::Mission(mission),
        Target::StageMissions(stage),
        Target::Stage(stage),
        Target::Adventure(stage.adventure()),
    ]);
}

/// Prefix covering every cached bite of `mission`.
pub fn bite_scope(mission: MissionId) -> String {
    format!("bite_{mission}B")
}
