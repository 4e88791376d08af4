//! Error types raised by data source implementations.

use progress_core::ProgressError;
use thiserror::Error;

/// Errors surfaced by data source implementations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("data source lock was poisoned")]
    LockPoisoned,

    /// The source of truth refused the change.
    #[error(transparent)]
    Rejected(#[from] ProgressError),
}

pub type Result<T> = std::result::Result<T, SourceError>;
