//! Engine configuration loading.
//!
//! Reads `config.toml` from the data directory; a missing file yields the
//! built-in defaults so a fresh install needs no setup step.

use crate::paths::CinetrackPaths;
use crate::storage::AtomicTomlFile;
use cinetrack_core::config::EngineConfig;
use cinetrack_core::error::Result;
use std::path::Path;
use tracing::info;

/// Loads the engine configuration from `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let file = AtomicTomlFile::<EngineConfig>::new(path.as_ref().to_path_buf());
    match file.load()? {
        Some(config) => Ok(config),
        None => {
            info!("no configuration file found, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// Loads the engine configuration from the default platform location.
pub fn load_default_config() -> Result<EngineConfig> {
    load_config(CinetrackPaths::config_file()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "page_size = 5\n").unwrap();

        let config = load_config(path).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(
            config.max_genre_selection,
            EngineConfig::default().max_genre_selection
        );
    }
}
