//! Read-through cache layer.
//!
//! [`CacheStore`] is a generic TTL map; [`keys`] defines how curriculum
//! entities map onto its string keys and which keys a change makes stale.

pub mod keys;
mod store;

pub use keys::{EntityKind, Target, bite_scope, stale_keys};
pub use store::{CacheEntry, CacheStats, CacheStore};
