//! Configuration management for topic-annotator.
//!
//! Settings come from, in increasing priority: built-in defaults, an
//! optional config file, environment variables and finally CLI flags
//! (applied by the command handlers).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::DEFAULT_RETRY_ATTEMPTS;

/// Application name used for config discovery.
pub const APP_NAME: &str = "topic-annotator";

pub const DEFAULT_RECORDS_PATH: &str = "evaluation-data/records.jsonl";
pub const DEFAULT_STORE_PATH: &str = "data/clean_dataset.json";
pub const DEFAULT_HN_FROM_API: usize = 3;
pub const DEFAULT_HN_FROM_DATASET: usize = 2;

const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse YAML config {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Resolved settings used by the commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Candidate record stream (JSON Lines).
    pub records: PathBuf,
    /// Annotation store (JSON object).
    pub store: PathBuf,
    /// Log destination; stderr when unset.
    pub log_file: Option<PathBuf>,
    /// Overflow retries per record before giving up.
    pub retry_attempts: u32,
    pub hn_from_api: usize,
    pub hn_from_dataset: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            records: PathBuf::from(DEFAULT_RECORDS_PATH),
            store: PathBuf::from(DEFAULT_STORE_PATH),
            log_file: None,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            hn_from_api: DEFAULT_HN_FROM_API,
            hn_from_dataset: DEFAULT_HN_FROM_DATASET,
        }
    }
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hn_from_api: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hn_from_dataset: Option<usize>,

    /// Where this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path.
    /// The format is picked from the extension; anything unknown is read as JSON.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref records) = self.records {
            settings.records = resolve_path(records, base_dir);
        }
        if let Some(ref store) = self.store {
            settings.store = resolve_path(store, base_dir);
        }
        if let Some(ref log_file) = self.log_file {
            settings.log_file = Some(resolve_path(log_file, base_dir));
        }
        if let Some(attempts) = self.retry_attempts {
            settings.retry_attempts = attempts;
        }
        if let Some(n) = self.hn_from_api {
            settings.hn_from_api = n;
        }
        if let Some(n) = self.hn_from_dataset {
            settings.hn_from_dataset = n;
        }
    }
}

/// Resolve a path that may be relative to the config file.
/// - Absolute paths are returned as-is
/// - Paths starting with ~ are expanded
/// - Relative paths are resolved against `base_dir`
pub fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Environment variable overrides, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub records: Option<String>,
    pub store: Option<String>,
    pub retry_attempts: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|s| !s.is_empty());
        Self {
            records: var("TOPIC_ANNOTATOR_RECORDS"),
            store: var("TOPIC_ANNOTATOR_STORE"),
            retry_attempts: var("TOPIC_ANNOTATOR_RETRY_ATTEMPTS"),
        }
    }

    /// Environment paths are relative to the working directory.
    pub fn apply_to_settings(&self, settings: &mut Settings, cwd: &Path) -> Result<(), ConfigError> {
        if let Some(ref records) = self.records {
            tracing::debug!("Using TOPIC_ANNOTATOR_RECORDS from environment: {}", records);
            settings.records = resolve_path(records, cwd);
        }
        if let Some(ref store) = self.store {
            tracing::debug!("Using TOPIC_ANNOTATOR_STORE from environment: {}", store);
            settings.store = resolve_path(store, cwd);
        }
        if let Some(ref attempts) = self.retry_attempts {
            settings.retry_attempts = attempts.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "TOPIC_ANNOTATOR_RETRY_ATTEMPTS",
                value: attempts.clone(),
            })?;
        }
        Ok(())
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Directory searched first during discovery; the process CWD when unset.
    pub cwd: Option<PathBuf>,
    /// Skip the per-user config directory during discovery.
    pub skip_user_config: bool,
}

/// Look for `topic-annotator.{toml,yaml,yml,json}` in `dir`.
fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", APP_NAME, ext)))
        .find(|path| path.is_file())
}

/// Find a config file: the working directory first, then the user config dir.
pub fn discover_config(cwd: &Path, include_user_config: bool) -> Option<PathBuf> {
    find_config_in(cwd).or_else(|| {
        if !include_user_config {
            return None;
        }
        dirs::config_dir().and_then(|dir| find_config_in(&dir.join(APP_NAME)))
    })
}

/// Load settings with explicit options and environment overrides.
/// Returns (Settings, Config) tuple.
pub fn load_settings_with_options(
    options: LoadOptions,
    env: &EnvOverrides,
) -> Result<(Settings, Config), ConfigError> {
    let cwd = options
        .cwd
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config_path = options
        .config_path
        .clone()
        .or_else(|| discover_config(&cwd, !options.skip_user_config));

    let config = match config_path {
        Some(ref path) => {
            tracing::debug!("Loading config from {}", path.display());
            Config::load_from_path(path)?
        }
        None => Config::default(),
    };

    let mut settings = Settings::default();
    let base_dir = config.base_dir().unwrap_or_else(|| cwd.clone());
    config.apply_to_settings(&mut settings, &base_dir);
    env.apply_to_settings(&mut settings, &cwd)?;

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn isolated(dir: &Path) -> LoadOptions {
        LoadOptions {
            cwd: Some(dir.to_path_buf()),
            skip_user_config: true,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let (settings, config) =
            load_settings_with_options(isolated(dir.path()), &EnvOverrides::default()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(settings.retry_attempts, 100);
        assert_eq!(settings.hn_from_api, 3);
        assert_eq!(settings.hn_from_dataset, 2);
        assert_eq!(settings.store, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_discovered_toml_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("topic-annotator.toml"),
            "records = \"in/records.jsonl\"\nretry_attempts = 7\n",
        )
        .unwrap();

        let (settings, config) =
            load_settings_with_options(isolated(dir.path()), &EnvOverrides::default()).unwrap();
        assert_eq!(settings.records, dir.path().join("in/records.jsonl"));
        assert_eq!(settings.retry_attempts, 7);
        assert_eq!(
            config.source_path,
            Some(dir.path().join("topic-annotator.toml"))
        );
    }

    #[test]
    fn test_yaml_and_json_formats() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("conf.yaml");
        std::fs::write(&yaml, "hn_from_api: 5\n").unwrap();
        assert_eq!(Config::load_from_path(&yaml).unwrap().hn_from_api, Some(5));

        let json = dir.path().join("conf.json");
        std::fs::write(&json, r#"{"hn_from_dataset": 4}"#).unwrap();
        assert_eq!(Config::load_from_path(&json).unwrap().hn_from_dataset, Some(4));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.toml");
        std::fs::write(&path, "record = \"typo\"\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("topic-annotator.json"),
            r#"{"store": "from-file.json", "retry_attempts": 3}"#,
        )
        .unwrap();
        let env = EnvOverrides {
            store: Some("from-env.json".to_string()),
            retry_attempts: Some("9".to_string()),
            ..EnvOverrides::default()
        };

        let (settings, _) = load_settings_with_options(isolated(dir.path()), &env).unwrap();
        assert_eq!(settings.store, dir.path().join("from-env.json"));
        assert_eq!(settings.retry_attempts, 9);
    }

    #[test]
    fn test_invalid_env_retry_attempts() {
        let dir = tempdir().unwrap();
        let env = EnvOverrides {
            retry_attempts: Some("many".to_string()),
            ..EnvOverrides::default()
        };
        assert!(matches!(
            load_settings_with_options(isolated(dir.path()), &env),
            Err(ConfigError::InvalidEnv { .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/base");
        assert_eq!(resolve_path("/abs/file", base), PathBuf::from("/abs/file"));
        assert_eq!(resolve_path("rel/file", base), PathBuf::from("/base/rel/file"));
    }
}
