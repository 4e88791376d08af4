//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use progress_core::{EngineConfig, RewardTable};

use crate::loaders::{Catalog, CatalogLoader, ConfigLoader, LoadResult, TablesLoader};

/// Loads all policy and catalog content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tables.toml
/// └── catalog.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load engine policy from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load reward amounts from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<RewardTable> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load adventure names and briefings from `catalog.toml`.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        CatalogLoader::load(&self.data_dir.join("catalog.toml"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
