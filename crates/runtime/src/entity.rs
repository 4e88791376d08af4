//! Values moving between the data source, the cache, and callers.

use progress_core::{Adventure, Bite, Briefing, Curriculum, Mission, Stage};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", content = "data", rename_all = "snake_case")]
pub enum Entity {
    Bite(Bite),
    Bites(Vec<Bite>),
    Mission(Mission),
    Missions(Vec<Mission>),
    Stage(Stage),
    Adventure(Adventure),
    Briefing(Briefing),
    Curriculum(Box<Curriculum>),
}

impl Entity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bite(_) => "bite",
            Self::Bites(_) => "bites",
            Self::Mission(_) => "mission",
            Self::Missions(_) => "missions",
            Self::Stage(_) => "stage",
            Self::Adventure(_) => "adventure",
            Self::Briefing(_) => "briefing",
            Self::Curriculum(_) => "curriculum",
        }
    }

    pub fn into_curriculum(self) -> Result<Curriculum, ServiceError> {
        match self {
            Self::Curriculum(curriculum) => Ok(*curriculum),
            other => Err(other.mismatch("curriculum")),
        }
    }

    pub fn into_mission(self) -> Result<Mission, ServiceError> {
        match self {
            Self::Mission(mission) => Ok(mission),
            other => Err(other.mismatch("mission")),
        }
    }

    pub fn into_briefing(self) -> Result<Briefing, ServiceError> {
        match self {
            Self::Briefing(briefing) => Ok(briefing),
            other => Err(other.mismatch("briefing")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ServiceError {
        ServiceError::UnexpectedEntity {
            expected,
            found: self.label(),
        }
    }
}
