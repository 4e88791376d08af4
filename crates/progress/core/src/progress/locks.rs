//! The linear unlock chain.
//!
//! A node is unlocked when it is the first node of the whole curriculum or its
//! immediate predecessor is completed. Missions chain across stage boundaries
//! (`S2M1` follows `S1M5`), stages chain across the whole sequence. There is
//! exactly one path through all 175 missions.

use crate::curriculum::{MissionId, StageNumber};
use crate::state::Curriculum;

pub fn is_mission_unlocked(curriculum: &Curriculum, id: MissionId) -> bool {
    match id.predecessor() {
        None => true,
        Some(previous) => curriculum.mission(previous).is_completed(),
    }
}

pub fn is_stage_unlocked(curriculum: &Curriculum, number: StageNumber) -> bool {
    match number.predecessor() {
        None => true,
        Some(previous) => curriculum.stage(previous).is_completed(),
    }
}

/// Writes the derived lock flag of every mission and stage.
pub fn refresh_locks(curriculum: &mut Curriculum) {
    let mission_locks: Vec<(MissionId, bool)> = MissionId::all()
        .map(|id| (id, !is_mission_unlocked(curriculum, id)))
        .collect();
    let stage_locks: Vec<(StageNumber, bool)> = StageNumber::all()
        .map(|number| (number, !is_stage_unlocked(curriculum, number)))
        .collect();

    for (id, locked) in mission_locks {
        curriculum.mission_mut(id).is_locked = locked;
    }
    for (number, locked) in stage_locks {
        curriculum.stage_mut(number).is_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Timestamp;

    fn complete_mission(curriculum: &mut Curriculum, id: MissionId) {
        for bite in id.bites() {
            curriculum.bite_mut(bite).submit(true, Timestamp::from_millis(1));
        }
    }

    #[test]
    fn only_first_mission_is_unlocked_initially() {
        let mut curriculum = Curriculum::default();
        refresh_locks(&mut curriculum);

        let unlocked: Vec<MissionId> = curriculum
            .missions()
            .filter(|mission| !mission.is_locked)
            .map(|mission| mission.id)
            .collect();
        assert_eq!(unlocked, vec![MissionId::FIRST]);
        assert!(!curriculum.stage(StageNumber::FIRST).is_locked);
        assert!(curriculum.stages()[1..].iter().all(|stage| stage.is_locked));
    }

    #[test]
    fn unlock_follows_predecessor_for_every_pair() {
        let mut curriculum = Curriculum::default();

        for id in MissionId::all() {
            let Some(next) = id.successor() else { break };

            curriculum.refresh_locks();
            assert!(!curriculum.mission(id).is_locked, "{id} should be open");
            assert!(curriculum.mission(next).is_locked, "{next} opened before {id} completed");

            complete_mission(&mut curriculum, id);
            curriculum.refresh_locks();
            assert!(!curriculum.mission(next).is_locked, "{next} still locked after {id}");
        }
    }

    #[test]
    fn partial_completion_keeps_successor_locked() {
        let mut curriculum = Curriculum::default();
        let first = MissionId::FIRST;
        for bite in first.bites().take(4) {
            curriculum.bite_mut(bite).submit(true, Timestamp::from_millis(1));
        }
        curriculum.refresh_locks();
        assert!(curriculum.mission(MissionId::new(1, 2).unwrap()).is_locked);
    }

    #[test]
    fn stage_unlocks_after_previous_stage_completes() {
        let mut curriculum = Curriculum::default();
        for id in StageNumber::FIRST.missions() {
            complete_mission(&mut curriculum, id);
        }
        curriculum.refresh_locks();

        let second = StageNumber::new(2).unwrap();
        assert!(!curriculum.stage(second).is_locked);
        assert!(curriculum.stage(StageNumber::new(3).unwrap()).is_locked);
        assert!(!curriculum.mission(MissionId::new(2, 1).unwrap()).is_locked);
    }
}
