//! Unified error types surfaced by the progress service.
//!
//! Wraps engine refusals and data source failures so callers can bubble them
//! up with consistent context. Not-found and unavailable sources pass through
//! unchanged; the service never retries.

use progress_core::{EngineError, ErrorSeverity, ProgressError};
use thiserror::Error;

pub use crate::source::SourceError;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("progress service is closed")]
    Closed,

    #[error("data source returned a {found} where a {expected} was expected")]
    UnexpectedEntity {
        expected: &'static str,
        found: &'static str,
    },

    #[error("progress service requires a data source before building")]
    MissingSource,
}

impl ServiceError {
    /// The engine refusal behind this error, including one raised by the
    /// source of truth.
    pub fn as_progress(&self) -> Option<&ProgressError> {
        match self {
            Self::Progress(err) | Self::Source(SourceError::Rejected(err)) => Some(err),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.as_progress().is_some_and(ProgressError::is_locked)
    }

    pub fn is_retry_exhausted(&self) -> bool {
        self.as_progress()
            .is_some_and(ProgressError::is_retry_exhausted)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Source(SourceError::NotFound(_)))
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Progress(err) | Self::Source(SourceError::Rejected(err)) => err.severity(),
            Self::Source(SourceError::NotFound(_)) | Self::Closed => ErrorSeverity::Validation,
            Self::Source(SourceError::Unavailable(_)) => ErrorSeverity::Recoverable,
            Self::Source(SourceError::LockPoisoned)
            | Self::UnexpectedEntity { .. }
            | Self::MissingSource => ErrorSeverity::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progress_core::MissionId;

    #[test]
    fn rejected_by_source_reads_as_engine_refusal() {
        let err = ServiceError::from(SourceError::Rejected(ProgressError::LockedContent {
            mission: MissionId::FIRST,
        }));
        assert!(err.is_locked());
        assert!(err.severity().is_recoverable());
        assert_eq!(
            err.to_string(),
            "mission S1M1 is locked until its predecessor is completed"
        );
    }

    #[test]
    fn unavailable_is_recoverable() {
        let err = ServiceError::from(SourceError::Unavailable("offline".into()));
        assert!(!err.is_not_found());
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
    }
}
