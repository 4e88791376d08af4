//! Reward tables loader.

use std::path::Path;

use progress_core::RewardTable;

use crate::loaders::{LoadResult, read_file};

/// Loader for per-activity reward amounts.
pub struct TablesLoader;

impl TablesLoader {
    /// Load a reward table from a TOML file.
    ///
    /// Each activity kind is a table (`[checkpoint]`, `[mission]`, `[stage]`,
    /// `[adventure]`); omitted kinds keep their defaults.
    pub fn load(path: &Path) -> LoadResult<RewardTable> {
        let content = read_file(path)?;
        let table: RewardTable = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML {}: {}", path.display(), e))?;

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_override_single_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[mission]\nbase_baraka = 60\nbase_xp = 120\nperfect_score = 30\n\
             first_try = 20\nparty_per_member = 6"
        )
        .unwrap();

        let table = TablesLoader::load(file.path()).expect("tables should parse");
        assert_eq!(table.mission.base_baraka, 60);
        assert_eq!(table.stage, RewardTable::DEFAULT.stage);
    }

    #[test]
    fn test_incomplete_kind_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stage]\nbase_baraka = 1").unwrap();
        assert!(TablesLoader::load(file.path()).is_err());
    }
}
