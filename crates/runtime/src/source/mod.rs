//! Data source layer.
//!
//! The service reads and writes learner progress only through
//! [`ProgressSource`]. Durable storage lives behind it.

mod error;
mod memory;
mod traits;

pub use error::{Result, SourceError};
pub use memory::InMemorySource;
pub use traits::ProgressSource;
