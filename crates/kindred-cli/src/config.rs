//! Configuration loading for the `kindred` binary.
//!
//! Settings come from `kindred.yaml` in the working directory (or the file
//! named by `--config`), then from `KINDRED_*` environment variables, then
//! from command-line flags. Every field has a default, so a missing default
//! file is not an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use kindred_graph::DatePolicy;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "kindred.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `kindred.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KindredConfig {
    /// Where data lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Date entry rules.
    #[serde(default)]
    pub dates: DatesConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KindredConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if given (it must exist), otherwise from
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise defaults. Environment
    /// overrides apply in every case.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override fields from `KINDRED_DATA_FILE`, `KINDRED_EXPORT_DIR`, and
    /// `KINDRED_LOG_LEVEL`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Override fields from any variable source. Empty values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(val) = get("KINDRED_DATA_FILE") {
            self.storage.data_file = PathBuf::from(val);
        }
        if let Some(val) = get("KINDRED_EXPORT_DIR") {
            self.storage.export_dir = PathBuf::from(val);
        }
        if let Some(val) = get("KINDRED_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// The date policy selected by `dates.strict`.
    pub const fn date_policy(&self) -> DatePolicy {
        DatePolicy::from_strict(self.dates.strict)
    }
}

/// Storage locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// The local family-tree document.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory that `export` writes into.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            export_dir: default_export_dir(),
        }
    }
}

/// Date entry rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatesConfig {
    /// Reject dates that are not `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`.
    #[serde(default)]
    pub strict: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_data_file() -> PathBuf {
    PathBuf::from("family_tree.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = KindredConfig::parse_yaml("").unwrap();
        assert_eq!(config, KindredConfig::default());
        assert_eq!(config.storage.data_file, PathBuf::from("family_tree.json"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.date_policy(), DatePolicy::Lenient);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = KindredConfig::parse_yaml(
            "storage:\n  data_file: /tmp/tree.json\ndates:\n  strict: true\n",
        )
        .unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("/tmp/tree.json"));
        assert_eq!(config.storage.export_dir, PathBuf::from("."));
        assert_eq!(config.date_policy(), DatePolicy::Strict);
        assert!(!config.logging.json);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            KindredConfig::parse_yaml("storage: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = KindredConfig::default();
        config.apply_overrides_from(|name| match name {
            "KINDRED_DATA_FILE" => Some("elsewhere.json".to_owned()),
            "KINDRED_LOG_LEVEL" => Some("debug".to_owned()),
            "KINDRED_EXPORT_DIR" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.storage.data_file, PathBuf::from("elsewhere.json"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.export_dir, PathBuf::from("."));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            KindredConfig::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn file_on_disk_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kindred.yaml");
        std::fs::write(&path, "logging:\n  json: true\n").unwrap();
        let config = KindredConfig::from_file(&path).unwrap();
        assert!(config.logging.json);
    }
}
