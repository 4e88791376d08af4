use crate::curriculum::{BiteId, MissionId};

use super::Timestamp;

/// Atomic task. Completion flags on bites are the only source of truth the
/// aggregator reads; every higher-level status is derived from them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bite {
    pub id: BiteId,
    pub is_completed: bool,
    pub checkpoint_passed: bool,
    pub attempts: u32,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Bite {
    /// Untouched bite.
    pub fn new(id: BiteId) -> Self {
        Self {
            id,
            is_completed: false,
            checkpoint_passed: false,
            attempts: 0,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn mission_id(&self) -> MissionId {
        self.id.mission()
    }

    /// Opened, attempted, or completed.
    pub fn is_started(&self) -> bool {
        self.is_completed || self.attempts > 0 || self.started_at.is_some()
    }

    /// Marks the bite as opened. Keeps the first opening time.
    pub fn start(&mut self, now: Timestamp) {
        self.started_at.get_or_insert(now);
    }

    /// Records a submission. Bites are never un-completed; a later submission
    /// only counts another attempt and can upgrade the checkpoint result.
    pub fn submit(&mut self, checkpoint_passed: bool, now: Timestamp) {
        self.start(now);
        self.attempts += 1;
        self.checkpoint_passed |= checkpoint_passed;
        if !self.is_completed {
            self.is_completed = true;
            self.completed_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bite() -> Bite {
        Bite::new("S1M1B1".parse().unwrap())
    }

    #[test]
    fn submission_completes_once() {
        let mut bite = bite();
        assert!(!bite.is_started());

        bite.submit(false, Timestamp::from_millis(10));
        assert!(bite.is_completed);
        assert!(!bite.checkpoint_passed);
        assert_eq!(bite.completed_at, Some(Timestamp::from_millis(10)));

        bite.submit(true, Timestamp::from_millis(20));
        assert_eq!(bite.attempts, 2);
        assert!(bite.checkpoint_passed);
        assert_eq!(bite.started_at, Some(Timestamp::from_millis(10)));
        assert_eq!(bite.completed_at, Some(Timestamp::from_millis(10)));
    }

    #[test]
    fn opening_counts_as_started() {
        let mut bite = bite();
        bite.start(Timestamp::from_millis(5));
        bite.start(Timestamp::from_millis(9));
        assert!(bite.is_started());
        assert!(!bite.is_completed);
        assert_eq!(bite.started_at, Some(Timestamp::from_millis(5)));
    }
}
