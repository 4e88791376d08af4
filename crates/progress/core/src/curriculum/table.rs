//! The fixed Adventure → Stage mapping.
//!
//! The table is irregular (adventure 0 holds a single stage, adventure 3 holds
//! four, every other adventure holds five) and is part of the curriculum's
//! identity. It is hard-coded here and never computed.

use core::ops::RangeInclusive;

use super::ids::{AdventureId, StageNumber};

/// Inclusive `(first_stage, last_stage)` per adventure, indexed by adventure.
pub const ADVENTURE_STAGES: [(u8, u8); 8] = [
    (1, 1),
    (2, 6),
    (7, 11),
    (12, 15),
    (16, 20),
    (21, 25),
    (26, 30),
    (31, 35),
];

/// Difficulty multiplier per adventure in basis points (10 000 = ×1.0).
pub const ADVENTURE_DIFFICULTY_BP: [u32; 8] = [
    10_000, 10_000, 10_500, 11_000, 11_500, 12_000, 12_500, 13_000,
];

impl AdventureId {
    /// Inclusive stage-number range covered by this adventure.
    pub fn stage_range(self) -> RangeInclusive<u8> {
        let (first, last) = ADVENTURE_STAGES[self.index()];
        first..=last
    }

    pub fn first_stage(self) -> StageNumber {
        self.stages().next().unwrap_or(StageNumber::FIRST)
    }

    pub fn stage_count(self) -> usize {
        self.stage_range().count()
    }

    /// Stages of this adventure in order.
    pub fn stages(self) -> impl Iterator<Item = StageNumber> {
        self.stage_range().filter_map(|n| StageNumber::new(n).ok())
    }

    pub fn contains(self, stage: StageNumber) -> bool {
        self.stage_range().contains(&stage.get())
    }

    pub fn difficulty_bp(self) -> u32 {
        ADVENTURE_DIFFICULTY_BP[self.index()]
    }
}

impl StageNumber {
    /// The adventure this stage belongs to.
    pub fn adventure(self) -> AdventureId {
        AdventureId::all()
            .find(|adventure| adventure.contains(self))
            .unwrap_or(AdventureId::LAST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn every_stage_belongs_to_exactly_one_adventure() {
        let expected: [u8; 35] = [
            0, // stage 1
            1, 1, 1, 1, 1, // 2-6
            2, 2, 2, 2, 2, // 7-11
            3, 3, 3, 3, // 12-15
            4, 4, 4, 4, 4, // 16-20
            5, 5, 5, 5, 5, // 21-25
            6, 6, 6, 6, 6, // 26-30
            7, 7, 7, 7, 7, // 31-35
        ];

        for stage in StageNumber::all() {
            let owners: Vec<AdventureId> = AdventureId::all()
                .filter(|adventure| adventure.contains(stage))
                .collect();
            assert_eq!(owners.len(), 1, "stage {stage} has {} owners", owners.len());
            assert_eq!(owners[0].get(), expected[stage.index()]);
            assert_eq!(stage.adventure(), owners[0]);
        }
    }

    #[test]
    fn stage_counts_are_irregular() {
        let counts: Vec<usize> = AdventureId::all().map(AdventureId::stage_count).collect();
        assert_eq!(counts, vec![1, 5, 5, 4, 5, 5, 5, 5]);
        assert_eq!(counts.iter().sum::<usize>(), EngineConfig::STAGE_COUNT);
    }

    #[test]
    fn ranges_are_contiguous() {
        let mut next = 1u8;
        for adventure in AdventureId::all() {
            let range = adventure.stage_range();
            assert_eq!(*range.start(), next);
            next = range.end() + 1;
        }
        assert_eq!(next as usize, EngineConfig::STAGE_COUNT + 1);
    }
}
