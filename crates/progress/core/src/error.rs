//! Common error infrastructure for progress-core.
//!
//! Domain errors live next to what they validate: identifier parsing in
//! [`crate::curriculum`], everything that can refuse a learner's change here in
//! [`ProgressError`]. All of them classify themselves through [`EngineError`]
//! so callers can decide between surfacing, correcting, or investigating.

use crate::curriculum::{IdError, MissionId};
use crate::retry::{RetryAction, RetryPhase};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The learner can fix it by doing something else first.
    ///
    /// Examples: mission still locked, mission not yet finished
    Recoverable,

    /// Invalid input, should not be retried without changes.
    ///
    /// Examples: malformed id, retry rights exhausted
    Validation,

    /// Unexpected state inconsistency. Indicates a bug in a collaborator.
    ///
    /// Examples: a mission record holding the wrong number of bites
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all progress-core errors.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant, for logs and metrics.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Reasons the engine refuses a change or a piece of input.
///
/// Every refusal is raised before any state is touched; a caller that receives
/// one of these can assume nothing was mutated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("mission {mission} is locked until its predecessor is completed")]
    LockedContent { mission: MissionId },

    #[error("mission {mission} has no retry available ({attempts}/{max_retries} attempts used)")]
    RetryExhausted {
        mission: MissionId,
        attempts: u32,
        max_retries: u32,
    },

    #[error("mission {mission} cannot {action} while {phase}")]
    InvalidRetryTransition {
        mission: MissionId,
        phase: RetryPhase,
        action: RetryAction,
    },

    #[error("provisional retry for mission {mission} has expired")]
    ProvisionalExpired { mission: MissionId },

    #[error("mission {mission} has {completed} of 5 bites completed")]
    IncompleteMission { mission: MissionId, completed: usize },

    #[error("malformed {entity}: {reason}")]
    MalformedEntity { entity: String, reason: &'static str },
}

impl ProgressError {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::LockedContent { .. })
    }

    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }
}

impl EngineError for ProgressError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Id(err) => err.severity(),
            Self::LockedContent { .. } | Self::IncompleteMission { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::RetryExhausted { .. }
            | Self::InvalidRetryTransition { .. }
            | Self::ProvisionalExpired { .. } => ErrorSeverity::Validation,
            Self::MalformedEntity { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Id(err) => err.error_code(),
            Self::LockedContent { .. } => "locked_content",
            Self::RetryExhausted { .. } => "retry_exhausted",
            Self::InvalidRetryTransition { .. } => "invalid_retry_transition",
            Self::ProvisionalExpired { .. } => "provisional_expired",
            Self::IncompleteMission { .. } => "incomplete_mission",
            Self::MalformedEntity { .. } => "malformed_entity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_are_not_internal() {
        let mission = MissionId::FIRST;
        let locked = ProgressError::LockedContent { mission };
        assert!(locked.is_locked());
        assert!(locked.severity().is_recoverable());

        let exhausted = ProgressError::RetryExhausted {
            mission,
            attempts: 3,
            max_retries: 3,
        };
        assert!(exhausted.is_retry_exhausted());
        assert_eq!(exhausted.severity(), ErrorSeverity::Validation);
        assert_eq!(exhausted.error_code(), "retry_exhausted");
    }

    #[test]
    fn display_names_the_mission() {
        let err = ProgressError::LockedContent {
            mission: MissionId::new(3, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "mission S3M2 is locked until its predecessor is completed"
        );
    }
}
