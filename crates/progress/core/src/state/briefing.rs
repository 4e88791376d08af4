use crate::curriculum::MissionId;

/// Mission briefing text. Rarely changes, so the runtime caches it longest.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Briefing {
    pub mission: MissionId,
    pub title: String,
    pub body: String,
}
