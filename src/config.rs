//! Configuration for the engine data directory.
//!
//! Resolution sources (highest priority first):
//! 1. Environment variable (CARDGRAPH_DATA)
//! 2. Config file (.cardgraph/config.yaml)
//! 3. Default (~/.cardgraph/data)
//!
//! Config file discovery:
//! - Searches the current directory and parents for .cardgraph/config.yaml
//! - Paths in the config file are relative to the directory holding
//!   .cardgraph

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Cached resolution (stores a stringly Result so init errors replay)
static DATA_DIR: OnceLock<std::result::Result<PathBuf, String>> = OnceLock::new();

/// Raw config file schema (matches the YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Data directory, relative to the config file's parent directory
    pub data: Option<String>,
}

/// Resolve the engine data directory, cached for the process lifetime.
pub fn data_dir() -> Result<PathBuf> {
    let cached = DATA_DIR.get_or_init(|| resolve().map_err(|e| e.to_string()));
    cached.clone().map_err(EngineError::Storage)
}

fn resolve() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CARDGRAPH_DATA") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let cwd = std::env::current_dir()
        .map_err(|e| EngineError::Storage(format!("current dir: {}", e)))?;
    if let Some((config, base_dir)) = find_config_file(&cwd)? {
        if let Some(data) = config.paths.data {
            return Ok(base_dir.join(data));
        }
    }

    let home = dirs::home_dir()
        .ok_or_else(|| EngineError::Storage("failed to determine home directory".to_string()))?;
    Ok(home.join(".cardgraph").join("data"))
}

/// Search `start` and its ancestors for `.cardgraph/config.yaml`.
///
/// Returns the parsed file plus the directory that holds `.cardgraph`,
/// which anchors any relative paths inside the file.
pub fn find_config_file(start: &Path) -> Result<Option<(ConfigFile, PathBuf)>> {
    for dir in start.ancestors() {
        let candidate = dir.join(".cardgraph").join("config.yaml");
        if candidate.exists() {
            let content = std::fs::read_to_string(&candidate)
                .map_err(|e| EngineError::storage(&candidate, e))?;
            let config: ConfigFile = serde_yaml::from_str(&content)
                .map_err(|e| EngineError::storage(&candidate, e))?;
            return Ok(Some((config, dir.to_path_buf())));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_file_found() {
        let temp = TempDir::new().unwrap();
        assert!(find_config_file(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_config_file_discovered_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".cardgraph");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.yaml"),
            "version: \"1\"\npaths:\n  data: content/data\n",
        )
        .unwrap();

        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, base_dir) = find_config_file(&nested).unwrap().unwrap();
        assert_eq!(config.paths.data.as_deref(), Some("content/data"));
        assert_eq!(base_dir, temp.path());
    }

    #[test]
    fn test_malformed_config_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".cardgraph");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.yaml"), ":: not yaml ::").unwrap();

        let err = find_config_file(temp.path()).unwrap_err();
        assert!(matches!(err, EngineError::Storage(_)));
    }
}
