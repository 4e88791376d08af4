use crate::state::Timestamp;

/// Curriculum shape constants and tunable engine policy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Failed attempts a mission may accumulate before retries stop for good.
    pub max_retries: u32,
    /// Lifetime of a provisional retry grant, in milliseconds.
    pub provisional_window_ms: u64,
}

impl EngineConfig {
    // ===== curriculum shape (fixed, process-wide) =====
    pub const ADVENTURE_COUNT: usize = 8;
    pub const STAGE_COUNT: usize = 35;
    pub const MISSIONS_PER_STAGE: usize = 5;
    pub const BITES_PER_MISSION: usize = 5;
    pub const TOTAL_MISSIONS: usize = Self::STAGE_COUNT * Self::MISSIONS_PER_STAGE;
    pub const TOTAL_BITES: usize = Self::TOTAL_MISSIONS * Self::BITES_PER_MISSION;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// 24 hours.
    pub const DEFAULT_PROVISIONAL_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

    pub fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            provisional_window_ms: Self::DEFAULT_PROVISIONAL_WINDOW_MS,
        }
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::new()
        }
    }

    /// Expiry stamp for a provisional grant issued at `now`.
    pub fn provisional_expiry(&self, now: Timestamp) -> Timestamp {
        now.saturating_add_millis(self.provisional_window_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curriculum_totals_follow_shape() {
        assert_eq!(EngineConfig::TOTAL_MISSIONS, 175);
        assert_eq!(EngineConfig::TOTAL_BITES, 875);
    }

    #[test]
    fn provisional_expiry_adds_window() {
        let config = EngineConfig {
            max_retries: 3,
            provisional_window_ms: 1_000,
        };
        assert_eq!(
            config.provisional_expiry(Timestamp::from_millis(500)),
            Timestamp::from_millis(1_500)
        );
    }
}
