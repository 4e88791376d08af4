use crate::curriculum::{AdventureId, StageNumber};

/// Named phase grouping a fixed range of stages.
///
/// Name and color are presentation metadata supplied by the content source;
/// nothing in the engine reads them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adventure {
    pub id: AdventureId,
    pub stages: Vec<StageNumber>,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Adventure {
    pub fn new(id: AdventureId) -> Self {
        Self {
            id,
            stages: id.stages().collect(),
            name: None,
            color: None,
        }
    }

    pub fn with_display(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.color = Some(color.into());
        self
    }
}
