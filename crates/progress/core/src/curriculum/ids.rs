//! Validated identifiers for every node of the curriculum tree.
//!
//! Ids are small `Copy` values that can only be constructed in range, so the
//! rest of the crate can index fixed-size collections with them without
//! re-checking bounds. Missions and bites use the composite textual forms the
//! data source and cache keys share: `S3M2` and `S3M2B4`.

use core::fmt;
use core::str::FromStr;

use crate::config::EngineConfig;
use crate::error::{EngineError, ErrorSeverity};

/// Identifier parsing and range errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("adventure {0} is out of range (0..=7)")]
    AdventureOutOfRange(u8),

    #[error("stage {0} is out of range (1..=35)")]
    StageOutOfRange(u8),

    #[error("mission {0} is out of range (1..=5)")]
    MissionOutOfRange(u8),

    #[error("bite {0} is out of range (1..=5)")]
    BiteOutOfRange(u8),

    #[error("malformed id `{0}`")]
    Malformed(String),
}

impl EngineError for IdError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AdventureOutOfRange(_) => "adventure_out_of_range",
            Self::StageOutOfRange(_) => "stage_out_of_range",
            Self::MissionOutOfRange(_) => "mission_out_of_range",
            Self::BiteOutOfRange(_) => "bite_out_of_range",
            Self::Malformed(_) => "malformed_id",
        }
    }
}

/// Adventure index, 0..=7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct AdventureId(u8);

impl AdventureId {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(EngineConfig::ADVENTURE_COUNT as u8 - 1);

    pub fn new(index: u8) -> Result<Self, IdError> {
        if (index as usize) < EngineConfig::ADVENTURE_COUNT {
            Ok(Self(index))
        } else {
            Err(IdError::AdventureOutOfRange(index))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All adventures in curriculum order.
    pub fn all() -> impl Iterator<Item = AdventureId> {
        (0..EngineConfig::ADVENTURE_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for AdventureId {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdventureId> for u8 {
    fn from(id: AdventureId) -> Self {
        id.0
    }
}

impl fmt::Display for AdventureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage number, 1..=35.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct StageNumber(u8);

impl StageNumber {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(EngineConfig::STAGE_COUNT as u8);

    pub fn new(number: u8) -> Result<Self, IdError> {
        if number >= 1 && (number as usize) <= EngineConfig::STAGE_COUNT {
            Ok(Self(number))
        } else {
            Err(IdError::StageOutOfRange(number))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in the stage sequence.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn predecessor(self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }

    pub fn successor(self) -> Option<Self> {
        ((self.0 as usize) < EngineConfig::STAGE_COUNT).then(|| Self(self.0 + 1))
    }

    /// Missions of this stage in order.
    pub fn missions(self) -> impl Iterator<Item = MissionId> {
        (1..=EngineConfig::MISSIONS_PER_STAGE as u8).map(move |mission| MissionId {
            stage: self,
            mission,
        })
    }

    /// All stages in curriculum order.
    pub fn all() -> impl Iterator<Item = StageNumber> {
        (1..=EngineConfig::STAGE_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for StageNumber {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageNumber> for u8 {
    fn from(stage: StageNumber) -> Self {
        stage.0
    }
}

impl fmt::Display for StageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mission identity, rendered as `S{stage}M{mission}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct MissionId {
    stage: StageNumber,
    mission: u8,
}

impl MissionId {
    /// The only mission unlocked in a fresh curriculum.
    pub const FIRST: Self = Self {
        stage: StageNumber::FIRST,
        mission: 1,
    };

    pub fn new(stage: u8, mission: u8) -> Result<Self, IdError> {
        let stage = StageNumber::new(stage)?;
        if mission >= 1 && (mission as usize) <= EngineConfig::MISSIONS_PER_STAGE {
            Ok(Self { stage, mission })
        } else {
            Err(IdError::MissionOutOfRange(mission))
        }
    }

    pub const fn stage(self) -> StageNumber {
        self.stage
    }

    /// Mission number within its stage, 1..=5.
    pub const fn number(self) -> u8 {
        self.mission
    }

    /// Zero-based position within the stage.
    pub const fn index(self) -> usize {
        self.mission as usize - 1
    }

    /// Zero-based position across the whole curriculum (0..175).
    pub const fn ordinal(self) -> usize {
        self.stage.index() * EngineConfig::MISSIONS_PER_STAGE + self.index()
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal >= EngineConfig::TOTAL_MISSIONS {
            return None;
        }
        Some(Self {
            stage: StageNumber((ordinal / EngineConfig::MISSIONS_PER_STAGE) as u8 + 1),
            mission: (ordinal % EngineConfig::MISSIONS_PER_STAGE) as u8 + 1,
        })
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    /// Previous mission in the unlock chain, wrapping to the previous stage's
    /// last mission.
    pub fn predecessor(self) -> Option<Self> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    pub fn successor(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Bites of this mission in order.
    pub fn bites(self) -> impl Iterator<Item = BiteId> {
        (1..=EngineConfig::BITES_PER_MISSION as u8).map(move |bite| BiteId {
            mission: self,
            bite,
        })
    }

    /// All missions in curriculum order.
    pub fn all() -> impl Iterator<Item = MissionId> {
        (0..EngineConfig::TOTAL_MISSIONS).filter_map(Self::from_ordinal)
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}M{}", self.stage.0, self.mission)
    }
}

impl FromStr for MissionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_mission_prefix(s)? {
            (id, "") => Ok(id),
            _ => Err(IdError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for MissionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MissionId> for String {
    fn from(id: MissionId) -> Self {
        id.to_string()
    }
}

/// Bite identity, rendered as `S{stage}M{mission}B{bite}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct BiteId {
    mission: MissionId,
    bite: u8,
}

impl BiteId {
    pub fn new(mission: MissionId, bite: u8) -> Result<Self, IdError> {
        if bite >= 1 && (bite as usize) <= EngineConfig::BITES_PER_MISSION {
            Ok(Self { mission, bite })
        } else {
            Err(IdError::BiteOutOfRange(bite))
        }
    }

    /// Parent mission.
    pub const fn mission(self) -> MissionId {
        self.mission
    }

    /// Bite number within its mission, 1..=5.
    pub const fn number(self) -> u8 {
        self.bite
    }

    pub const fn index(self) -> usize {
        self.bite as usize - 1
    }
}

impl fmt::Display for BiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B{}", self.mission, self.bite)
    }
}

impl FromStr for BiteId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdError::Malformed(s.to_string());
        let (mission, rest) = parse_mission_prefix(s)?;
        let digits = rest.strip_prefix('B').ok_or_else(malformed)?;
        let bite = parse_number(digits).ok_or_else(malformed)?;
        Self::new(mission, bite)
    }
}

impl TryFrom<String> for BiteId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BiteId> for String {
    fn from(id: BiteId) -> Self {
        id.to_string()
    }
}

/// Parses the leading `S{stage}M{mission}` and returns what follows it.
fn parse_mission_prefix(s: &str) -> Result<(MissionId, &str), IdError> {
    let malformed = || IdError::Malformed(s.to_string());

    let rest = s.strip_prefix('S').ok_or_else(malformed)?;
    let (stage, rest) = rest.split_once('M').ok_or_else(malformed)?;
    let stage = parse_number(stage).ok_or_else(malformed)?;

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mission = parse_number(&rest[..end]).ok_or_else(malformed)?;

    Ok((MissionId::new(stage, mission)?, &rest[end..]))
}

fn parse_number(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_id_round_trips_through_text() {
        let id = MissionId::new(3, 2).unwrap();
        assert_eq!(id.to_string(), "S3M2");
        assert_eq!("S3M2".parse::<MissionId>().unwrap(), id);
        assert_eq!("S35M5".parse::<MissionId>().unwrap().ordinal(), 174);
    }

    #[test]
    fn bite_id_parses_composite_form() {
        let bite: BiteId = "S12M3B4".parse().unwrap();
        assert_eq!(bite.mission(), MissionId::new(12, 3).unwrap());
        assert_eq!(bite.number(), 4);
        assert_eq!(bite.to_string(), "S12M3B4");
    }

    #[test]
    fn malformed_and_out_of_range_ids_are_rejected() {
        assert!(matches!("M3S2".parse::<MissionId>(), Err(IdError::Malformed(_))));
        assert!(matches!("S3M".parse::<MissionId>(), Err(IdError::Malformed(_))));
        assert!(matches!("S3M2B1".parse::<MissionId>(), Err(IdError::Malformed(_))));
        assert!(matches!("S+3M2".parse::<MissionId>(), Err(IdError::Malformed(_))));
        assert_eq!(
            "S36M1".parse::<MissionId>(),
            Err(IdError::StageOutOfRange(36))
        );
        assert_eq!(
            "S1M6".parse::<MissionId>(),
            Err(IdError::MissionOutOfRange(6))
        );
        assert_eq!("S1M1B0".parse::<BiteId>(), Err(IdError::BiteOutOfRange(0)));
        assert!(matches!("S1M1".parse::<BiteId>(), Err(IdError::Malformed(_))));
    }

    #[test]
    fn predecessor_wraps_to_previous_stage() {
        let s2m1 = MissionId::new(2, 1).unwrap();
        assert_eq!(s2m1.predecessor(), Some(MissionId::new(1, 5).unwrap()));
        assert_eq!(MissionId::FIRST.predecessor(), None);
        assert_eq!(MissionId::new(35, 5).unwrap().successor(), None);
    }

    #[test]
    fn ordinals_cover_every_mission_once() {
        let all: Vec<MissionId> = MissionId::all().collect();
        assert_eq!(all.len(), EngineConfig::TOTAL_MISSIONS);
        for (ordinal, id) in all.iter().enumerate() {
            assert_eq!(id.ordinal(), ordinal);
        }
    }
}
