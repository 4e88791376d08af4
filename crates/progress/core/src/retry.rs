//! Per-mission retry rights ("Right to Retry", R2R).
//!
//! ```text
//!                 pass
//!   Initial ───────────────────────────────────────────► Passed
//!      │ fail                                               ▲
//!      ▼           grant_provisional                        │ pass (can_retry)
//!   FailedAwaitingRetry ─────────────► ProvisionalActive ───┤
//!      ▲   │       grant_full                │ convert      │
//!      │   └─────────────────────────► FullActive ──────────┘
//!      │                                     │
//!      └──────────── fail (can_retry) ───────┘ (either active phase)
//! ```
//!
//! A provisional grant carries an expiry. Expiry is evaluated whenever the
//! state is read ([`RetryState::can_retry`], [`RetryState::effective_phase`]),
//! never swept: the stored flag may stay `true` long after the grant has lapsed.

use crate::curriculum::MissionId;
use crate::error::ProgressError;
use crate::state::Timestamp;

/// Stored phase of the retry state machine.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RetryPhase {
    /// First attempt not yet judged.
    #[default]
    Initial,
    /// Time-boxed retry granted after a failure.
    ProvisionalActive,
    /// Unconditional retry granted after a failure.
    FullActive,
    /// Terminal.
    Passed,
    /// Last attempt failed and no grant is active.
    FailedAwaitingRetry,
}

impl RetryPhase {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::ProvisionalActive | Self::FullActive)
    }
}

/// Transitions callers can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RetryAction {
    #[strum(serialize = "record a result")]
    RecordResult,
    #[strum(serialize = "grant a provisional retry")]
    GrantProvisional,
    #[strum(serialize = "grant a full retry")]
    GrantFull,
    #[strum(serialize = "convert a provisional retry")]
    ConvertProvisional,
}

/// Retry rights of a single mission.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryState {
    pub phase: RetryPhase,
    pub has_r2r: bool,
    pub has_provisional_r2r: bool,
    pub provisional_expires_at: Option<Timestamp>,
    /// Failed attempts so far. Never exceeds `max_retries`.
    pub retry_attempts: u32,
    pub max_retries: u32,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            phase: RetryPhase::Initial,
            has_r2r: false,
            has_provisional_r2r: false,
            provisional_expires_at: None,
            retry_attempts: 0,
            max_retries,
        }
    }

    /// Whether an unexpired provisional grant is held at `now`.
    pub fn provisional_active(&self, now: Timestamp) -> bool {
        self.has_provisional_r2r
            && self
                .provisional_expires_at
                .is_some_and(|expires_at| now < expires_at)
    }

    /// `retry_attempts < max_retries` and a live grant (full, or provisional
    /// and unexpired).
    pub fn can_retry(&self, now: Timestamp) -> bool {
        self.retry_attempts < self.max_retries && (self.has_r2r || self.provisional_active(now))
    }

    /// Phase as observed at `now`: a lapsed provisional grant reads as
    /// `FailedAwaitingRetry`.
    pub fn effective_phase(&self, now: Timestamp) -> RetryPhase {
        match self.phase {
            RetryPhase::ProvisionalActive if !self.provisional_active(now) => {
                RetryPhase::FailedAwaitingRetry
            }
            phase => phase,
        }
    }

    /// Failed with every attempt spent: only outside intervention helps.
    pub fn is_dead_end(&self, now: Timestamp) -> bool {
        self.phase != RetryPhase::Passed
            && self.retry_attempts >= self.max_retries
            && !self.can_retry(now)
    }

    /// Whether the learner may currently work on the mission's bites.
    pub fn permits_work(&self, now: Timestamp) -> bool {
        match self.phase {
            RetryPhase::Initial | RetryPhase::Passed => true,
            RetryPhase::ProvisionalActive | RetryPhase::FullActive => self.can_retry(now),
            RetryPhase::FailedAwaitingRetry => false,
        }
    }

    /// Records the outcome of a judged attempt.
    pub fn record_result(
        &mut self,
        mission: MissionId,
        passed: bool,
        now: Timestamp,
    ) -> Result<RetryPhase, ProgressError> {
        match self.phase {
            RetryPhase::Initial => {}
            RetryPhase::ProvisionalActive | RetryPhase::FullActive => {
                if !self.can_retry(now) {
                    return Err(self.exhausted(mission));
                }
            }
            RetryPhase::FailedAwaitingRetry => return Err(self.exhausted(mission)),
            RetryPhase::Passed => {
                return Err(self.invalid(mission, RetryAction::RecordResult));
            }
        }

        self.clear_grants();
        if passed {
            self.phase = RetryPhase::Passed;
        } else {
            self.retry_attempts = (self.retry_attempts + 1).min(self.max_retries);
            self.phase = RetryPhase::FailedAwaitingRetry;
        }
        Ok(self.phase)
    }

    /// Issues a time-boxed grant after a failure.
    pub fn grant_provisional(
        &mut self,
        mission: MissionId,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Result<RetryPhase, ProgressError> {
        self.ensure_awaiting(mission, RetryAction::GrantProvisional, now)?;
        self.has_provisional_r2r = true;
        self.provisional_expires_at = Some(expires_at);
        self.phase = RetryPhase::ProvisionalActive;
        Ok(self.phase)
    }

    /// Issues an unconditional grant after a failure.
    pub fn grant_full(
        &mut self,
        mission: MissionId,
        now: Timestamp,
    ) -> Result<RetryPhase, ProgressError> {
        self.ensure_awaiting(mission, RetryAction::GrantFull, now)?;
        self.clear_grants();
        self.has_r2r = true;
        self.phase = RetryPhase::FullActive;
        Ok(self.phase)
    }

    /// Upgrades a live provisional grant to a full one.
    pub fn convert_provisional(
        &mut self,
        mission: MissionId,
        now: Timestamp,
    ) -> Result<RetryPhase, ProgressError> {
        if self.phase != RetryPhase::ProvisionalActive {
            return Err(self.invalid(mission, RetryAction::ConvertProvisional));
        }
        if !self.provisional_active(now) {
            return Err(ProgressError::ProvisionalExpired { mission });
        }
        self.clear_grants();
        self.has_r2r = true;
        self.phase = RetryPhase::FullActive;
        Ok(self.phase)
    }

    fn ensure_awaiting(
        &self,
        mission: MissionId,
        action: RetryAction,
        now: Timestamp,
    ) -> Result<(), ProgressError> {
        if self.effective_phase(now) != RetryPhase::FailedAwaitingRetry {
            return Err(self.invalid(mission, action));
        }
        if self.retry_attempts >= self.max_retries {
            return Err(self.exhausted(mission));
        }
        Ok(())
    }

    fn clear_grants(&mut self) {
        self.has_r2r = false;
        self.has_provisional_r2r = false;
        self.provisional_expires_at = None;
    }

    fn exhausted(&self, mission: MissionId) -> ProgressError {
        ProgressError::RetryExhausted {
            mission,
            attempts: self.retry_attempts,
            max_retries: self.max_retries,
        }
    }

    fn invalid(&self, mission: MissionId, action: RetryAction) -> ProgressError {
        ProgressError::InvalidRetryTransition {
            mission,
            phase: self.phase,
            action,
        }
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::DEFAULT_MAX_RETRIES)
    }
}
