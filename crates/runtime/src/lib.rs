//! Runtime orchestration for learner progress.
//!
//! This crate wires the pure rules of `progress-core` to a remote data source
//! through a TTL cache and a local draft store. Consumers embed
//! [`ProgressService`] to read snapshots, apply learner changes, and receive
//! reward quotes for what those changes completed.
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the read-through/mutation pipeline and its builder
//! - [`cache`] provides the TTL store and the composite key scheme
//! - [`drafts`] keeps in-progress edits for resume
//! - [`source`] defines the data source contract and an in-memory fixture
//! - [`clock`] abstracts wall-clock time so TTLs can be tested exactly
pub mod cache;
pub mod clock;
pub mod config;
pub mod drafts;
pub mod entity;
pub mod error;
pub mod service;
pub mod source;

pub use cache::{CacheStats, CacheStore, EntityKind, Target};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CachePolicy, ServiceConfig};
pub use drafts::{Draft, DraftStore};
pub use entity::Entity;
pub use error::{Result, ServiceError};
pub use service::{
    LearnerContext, MilestoneReward, MutationOutcome, MutationRequest, ProgressService,
    ServiceBuilder,
};
pub use source::{InMemorySource, ProgressSource, SourceError};
