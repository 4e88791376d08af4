//! Cache-fronted progress service.
//!
//! Reads go through the TTL cache and fall back to the data source on a miss.
//! Mutations run a fixed pipeline:
//!
//! ```text
//! load curriculum → validate (locks, retry rights) → persist
//!   → invalidate stale keys → reconcile drafts → recompute chain → price milestones
//! ```
//!
//! A refused or failed mutation returns before the invalidation step, so the
//! cache and drafts are untouched.

mod builder;
mod request;

pub use builder::ServiceBuilder;
pub use request::{LearnerContext, MilestoneReward, MutationOutcome, MutationRequest};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use progress_core::progress::{self, OverallProgress, ProgressChain};
use progress_core::rewards::{
    ActivityOptions, AdventureOptions, CheckpointOptions, MissionOptions, MultiplierContext,
    RewardCalculator, StageOptions,
};
use progress_core::{
    ActivityKind, BiteId, Briefing, Change, Curriculum, Milestone, Mission, MissionId,
    RetryState, RewardQuote,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, Target, bite_scope, stale_keys};
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::drafts::{Draft, DraftStore, bite_draft_key, mission_draft_key};
use crate::entity::Entity;
use crate::error::{Result, ServiceError};
use crate::source::ProgressSource;

pub struct ProgressService {
    source: Arc<dyn ProgressSource>,
    clock: Arc<dyn Clock>,
    cache: CacheStore<Entity>,
    drafts: DraftStore,
    calculator: RewardCalculator,
    config: ServiceConfig,
    /// Serializes mutations so validation always sees the latest persisted state.
    mutations: Mutex<()>,
    closed: AtomicBool,
}

impl ProgressService {
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }

    fn from_parts(
        source: Arc<dyn ProgressSource>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            cache: CacheStore::with_capacity(clock.clone(), config.cache.capacity),
            drafts: DraftStore::new(clock.clone()),
            calculator: RewardCalculator::new(config.rewards),
            source,
            clock,
            config,
            mutations: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn calculator(&self) -> &RewardCalculator {
        &self.calculator
    }

    // ===== reads =====

    /// Cached value of `target`, fetched from the source on a miss.
    pub async fn read(&self, target: Target) -> Result<Entity> {
        self.ensure_open()?;

        let key = target.key();
        let ttl = self.config.cache.ttl_for(target.kind());
        if let Some(entity) = self.cache.get(&key, ttl) {
            debug!(%key, "cache hit");
            return Ok(entity);
        }

        debug!(%key, "cache miss");
        let entity = self.source.fetch(&target).await?;
        self.cache.set(key, entity.clone());
        Ok(entity)
    }

    pub async fn curriculum(&self) -> Result<Curriculum> {
        self.read(Target::Curriculum).await?.into_curriculum()
    }

    pub async fn mission(&self, mission: MissionId) -> Result<Mission> {
        self.read(Target::Mission(mission)).await?.into_mission()
    }

    pub async fn briefing(&self, mission: MissionId) -> Result<Briefing> {
        self.read(Target::Briefing(mission)).await?.into_briefing()
    }

    pub async fn progress_overall(&self) -> Result<OverallProgress> {
        let curriculum = self.curriculum().await?;
        Ok(progress::overall_progress(&curriculum))
    }

    pub async fn progress_chain(&self, mission: MissionId) -> Result<ProgressChain> {
        let curriculum = self.curriculum().await?;
        Ok(progress::progress_chain(&curriculum, mission))
    }

    pub async fn retry_state(&self, mission: MissionId) -> Result<RetryState> {
        Ok(self.mission(mission).await?.retry)
    }

    // ===== drafts =====

    pub fn draft(&self, key: &str) -> Option<Draft> {
        self.drafts.get(key)
    }

    pub fn bite_draft(&self, bite: BiteId) -> Option<Draft> {
        self.drafts.get(&bite_draft_key(bite))
    }

    pub fn mission_draft(&self, mission: MissionId) -> Option<Draft> {
        self.drafts.get(&mission_draft_key(mission))
    }

    // ===== mutations =====

    pub async fn mutate(&self, request: impl Into<MutationRequest>) -> Result<MutationOutcome> {
        self.ensure_open()?;
        let request = request.into();
        let change = &request.change;
        let _guard = self.mutations.lock().await;
        let now = self.clock.now();

        // Validate on a private copy; it also yields the milestones to price.
        let mut working = self.curriculum().await?;
        let applied = change.apply(&mut working, now).map_err(|err| {
            warn!(change = change.name(), mission = %change.mission(), %err, "mutation refused");
            ServiceError::from(err)
        })?;

        let persisted = self.source.persist(change, now).await.map_err(|err| {
            warn!(change = change.name(), mission = %change.mission(), %err, "persist failed");
            ServiceError::from(err)
        })?;

        let invalidated = self.invalidate_stale(change);
        debug!(change = change.name(), invalidated, "cache invalidated");

        self.reconcile_drafts(change, request.draft.clone());

        let refreshed = match self.curriculum().await {
            Ok(curriculum) => curriculum,
            Err(err) => {
                warn!(%err, "refetch after persist failed; using local result");
                working
            }
        };
        let chain = progress::progress_chain(&refreshed, change.mission());

        let rewards: Vec<MilestoneReward> = applied
            .milestones
            .iter()
            .map(|milestone| self.price(milestone, &request.learner))
            .collect();

        let outcome = MutationOutcome {
            applied,
            persisted,
            chain,
            rewards,
        };
        info!(
            change = change.name(),
            mission = %change.mission(),
            phase = %outcome.applied.retry_phase,
            milestones = outcome.rewards.len(),
            baraka = outcome.total_baraka(),
            xp = outcome.total_xp(),
            "mutation applied"
        );
        Ok(outcome)
    }

    /// Grants a provisional retry that lasts the configured window.
    pub async fn grant_provisional_retry(&self, mission: MissionId) -> Result<MutationOutcome> {
        let expires_at = self.config.engine.provisional_expiry(self.clock.now());
        self.mutate(Change::GrantProvisionalRetry {
            mission,
            expires_at,
        })
        .await
    }

    /// Drops the keys `change` makes stale. Bite changes clear the whole
    /// bite scope of their mission.
    fn invalidate_stale(&self, change: &Change) -> usize {
        let mut removed = match change.bite() {
            Some(_) => self.cache.invalidate_scope(&bite_scope(change.mission())),
            None => 0,
        };
        for key in stale_keys(change) {
            removed += usize::from(self.cache.invalidate(&key));
        }
        removed
    }

    fn reconcile_drafts(&self, change: &Change, draft: Option<serde_json::Value>) {
        match change {
            Change::SubmitBite { bite, .. } => {
                if self.drafts.clear(&bite_draft_key(*bite)) {
                    debug!(%bite, "draft cleared on submission");
                }
            }
            Change::SaveBiteDraft { bite } => {
                if let Some(content) = draft {
                    self.drafts.merge(&bite_draft_key(*bite), content);
                }
            }
            Change::PauseMission { mission } => {
                if let Some(content) = draft {
                    self.drafts.save(&mission_draft_key(*mission), content);
                }
            }
            Change::CompleteMission { mission, .. } => {
                self.drafts.clear(&mission_draft_key(*mission));
            }
            Change::StartBite { .. }
            | Change::GrantProvisionalRetry { .. }
            | Change::GrantFullRetry { .. }
            | Change::ConvertProvisionalRetry { .. } => {}
        }
    }

    fn price(&self, milestone: &Milestone, learner: &LearnerContext) -> MilestoneReward {
        let context = MultiplierContext {
            adventure: Some(milestone.adventure),
            ..learner.multipliers.clone()
        };
        let (baraka, xp) = match milestone.kind {
            ActivityKind::Checkpoint => self.quote_pair(
                &CheckpointOptions {
                    first_try: milestone.first_try,
                    perfect_score: milestone.perfect_score,
                    streak_days: learner.streak_days,
                },
                &context,
            ),
            ActivityKind::Mission => self.quote_pair(
                &MissionOptions {
                    first_try: milestone.first_try,
                    perfect_score: milestone.perfect_score,
                    days_ahead: learner.days_ahead,
                    streak_days: learner.streak_days,
                    party_members: learner.party_members,
                },
                &context,
            ),
            ActivityKind::Stage => self.quote_pair(
                &StageOptions {
                    first_try: milestone.first_try,
                    perfect_score: milestone.perfect_score,
                    days_ahead: learner.days_ahead,
                    streak_days: learner.streak_days,
                    party_members: learner.party_members,
                },
                &context,
            ),
            ActivityKind::Adventure => self.quote_pair(
                &AdventureOptions {
                    perfect_score: milestone.perfect_score,
                    days_ahead: learner.days_ahead,
                    party_members: learner.party_members,
                },
                &context,
            ),
        };
        MilestoneReward {
            milestone: *milestone,
            baraka,
            xp,
        }
    }

    fn quote_pair<O: ActivityOptions>(
        &self,
        options: &O,
        context: &MultiplierContext,
    ) -> (RewardQuote, RewardQuote) {
        (
            self.calculator.baraka(options, context),
            self.calculator.xp(options, context),
        )
    }

    // ===== maintenance =====

    /// Drops everything cached about `mission` after an out-of-band change.
    pub fn invalidate_mission(&self, mission: MissionId) -> usize {
        self.cache.invalidate_scope(&bite_scope(mission))
            + self.invalidate_stale(&Change::PauseMission { mission })
    }

    /// Sweeps entries stale for every kind.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired(self.config.cache.max_ttl())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops cached entries and drafts. Later calls fail with
    /// [`ServiceError::Closed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cache.close();
        self.drafts.close();
        info!("progress service closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ServiceError::Closed);
        }
        Ok(())
    }
}
