//! Data-driven policy and catalog loaders.
//!
//! This crate reads the tunable parts of the engine from TOML data files:
//! - Engine policy (retry limit, provisional grant window)
//! - Reward tables (base amounts and flat bonuses per activity kind)
//! - Adventure catalog (display names, colors) and mission briefings
//!
//! Content is consumed by the runtime and never appears in learner state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AdventureSpec, BriefingSpec, Catalog, CatalogLoader, ConfigLoader, ContentFactory,
    TablesLoader,
};
