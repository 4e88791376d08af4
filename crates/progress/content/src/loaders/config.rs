//! Engine policy loader.

use std::path::Path;

use progress_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine policy from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load engine policy from a TOML file.
    ///
    /// Missing keys fall back to [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)?;
        if config.max_retries == 0 {
            anyhow::bail!("max_retries must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_retries = 5").unwrap();

        let config = ConfigLoader::load(file.path()).expect("config should parse");
        assert_eq!(config.max_retries, 5);
        assert_eq!(
            config.provisional_window_ms,
            EngineConfig::DEFAULT_PROVISIONAL_WINDOW_MS
        );
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/engine.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/engine.toml"));
    }

    #[test]
    fn test_rejects_zero_retries() {
        assert!(ConfigLoader::parse("max_retries = 0").is_err());
    }
}
