//! Service configuration.

use std::env;
use std::time::Duration;

use progress_core::{EngineConfig, RewardTable};

use crate::cache::EntityKind;

/// Freshness policy per entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub detail_ttl: Duration,
    pub list_ttl: Duration,
    pub briefing_ttl: Duration,
    /// Maximum live entries; `None` is unbounded.
    pub capacity: Option<usize>,
}

impl CachePolicy {
    pub const DEFAULT_DETAIL_TTL: Duration = Duration::from_secs(2 * 60);
    pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(60);
    pub const DEFAULT_BRIEFING_TTL: Duration = Duration::from_secs(10 * 60);

    pub fn ttl_for(&self, kind: EntityKind) -> Duration {
        match kind {
            EntityKind::Detail => self.detail_ttl,
            EntityKind::List => self.list_ttl,
            EntityKind::Briefing => self.briefing_ttl,
        }
    }

    /// Longest configured TTL. Anything older is stale for every kind.
    pub fn max_ttl(&self) -> Duration {
        self.detail_ttl.max(self.list_ttl).max(self.briefing_ttl)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            detail_ttl: Self::DEFAULT_DETAIL_TTL,
            list_ttl: Self::DEFAULT_LIST_TTL,
            briefing_ttl: Self::DEFAULT_BRIEFING_TTL,
            capacity: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Retry policy. The service applies the provisional window when it
    /// grants retries; `max_retries` lives in the curriculum the data source
    /// is seeded with (`Curriculum::new(&config.engine)`).
    pub engine: EngineConfig,
    pub cache: CachePolicy,
    pub rewards: RewardTable,
}

impl ServiceConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PROGRESS_DETAIL_TTL_MS` - detail entity TTL (default: 120000)
    /// - `PROGRESS_LIST_TTL_MS` - list entity TTL (default: 60000)
    /// - `PROGRESS_BRIEFING_TTL_MS` - briefing TTL (default: 600000)
    /// - `PROGRESS_CACHE_CAPACITY` - maximum cached entries (default: unbounded)
    /// - `PROGRESS_MAX_RETRIES` - failed attempts allowed per mission (default: 3)
    /// - `PROGRESS_PROVISIONAL_WINDOW_MS` - provisional grant lifetime (default: 24 h)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable lookup.
    /// Unparseable values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse::<u64>(lookup("PROGRESS_DETAIL_TTL_MS")) {
            config.cache.detail_ttl = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(lookup("PROGRESS_LIST_TTL_MS")) {
            config.cache.list_ttl = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(lookup("PROGRESS_BRIEFING_TTL_MS")) {
            config.cache.briefing_ttl = Duration::from_millis(ms);
        }
        if let Some(capacity) = parse::<usize>(lookup("PROGRESS_CACHE_CAPACITY")) {
            config.cache.capacity = Some(capacity).filter(|capacity| *capacity > 0);
        }
        if let Some(max_retries) = parse::<u32>(lookup("PROGRESS_MAX_RETRIES")) {
            config.engine.max_retries = max_retries.max(1);
        }
        if let Some(ms) = parse::<u64>(lookup("PROGRESS_PROVISIONAL_WINDOW_MS")) {
            config.engine.provisional_window_ms = ms;
        }

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
