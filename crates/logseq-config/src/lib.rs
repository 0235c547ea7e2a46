pub mod edn;
pub mod graph;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use edn::EdnError;
pub use graph::{FilenameFormat, GraphConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read graph config: {0}")]
    EdnError(#[from] EdnError),

    #[error("Graph config must be a map")]
    NotAMap,

    #[error("Graph config key :{key} must be {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("Unsupported :file/name-format {0:?}, only :triple-lowbar is supported")]
    UnsupportedFilenameFormat(String),
}

/// Settings for the command-line tool, stored in the user's config dir.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub graph_path: PathBuf,

    /// Persistent search index; the index is kept in memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,

    /// Time prefix for blocks added to journals, e.g. `HH:mm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time_format: Option<String>,
}

impl Config {
    pub fn new(graph_path: impl Into<PathBuf>) -> Self {
        Self {
            graph_path: graph_path.into(),
            index_path: None,
            block_time_format: None,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.graph_path = Self::expand_path(&config.graph_path).unwrap_or(config.graph_path);
        config.index_path = config
            .index_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/logseq-cli");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/logseq-cli/config.toml"));
    }

    #[test]
    fn test_optional_keys_are_omitted() {
        let toml_str = toml::to_string(&Config::new("/tmp/graph")).unwrap();

        assert_eq!(toml_str.trim(), r#"graph_path = "/tmp/graph""#);
        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.index_path, None);
        assert_eq!(deserialized.block_time_format, None);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("LOGSEQ_CLI_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$LOGSEQ_CLI_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("LOGSEQ_CLI_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "graph_path = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            graph_path: PathBuf::from("/tmp/graph"),
            index_path: Some(PathBuf::from("/tmp/graph.db")),
            block_time_format: Some("HH:mm".to_string()),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config.graph_path, test_config.graph_path);
        assert_eq!(loaded_config.index_path, test_config.index_path);
        assert_eq!(loaded_config.block_time_format.as_deref(), Some("HH:mm"));
    }

    #[test]
    fn test_load_expands_paths() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "graph_path = \"~/graph\"\nindex_path = \"~/graph.db\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert!(!config.graph_path.to_string_lossy().starts_with('~'));
        assert!(config.graph_path.ends_with("graph"));
        let index_path = config.index_path.unwrap();
        assert!(!index_path.to_string_lossy().starts_with('~'));
    }
}
