//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use nlu_engine::LibraryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory and file stem used for configuration files
const APP_NAME: &str = "nlu-engine";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine shared library; `NLU_ENGINE_LIBRARY` or the platform name when unset
    pub library: Option<PathBuf>,

    /// Assistant directory used when no model is given on the command line
    pub model_dir: Option<PathBuf>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSection,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level used when no `-v` flag is given
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_NAME).join("config.yaml"))
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(format!(".{}.yaml", APP_NAME)),
            PathBuf::from(format!(".{}.json", APP_NAME)),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join(APP_NAME);
            paths.push(app_dir.join("config.yaml"));
            paths.push(app_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(format!(".{}.yaml", APP_NAME)));
        }

        paths
    }

    /// Library location: the command line wins over the file, the file over
    /// the environment
    pub fn library_config(&self, flag: Option<&Path>) -> LibraryConfig {
        match flag.or(self.library.as_deref()) {
            Some(path) => LibraryConfig::new(path),
            None => LibraryConfig::from_env(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let config = Config {
            library: Some(PathBuf::from("/opt/nlu/libnlu_engine.so")),
            model_dir: Some(PathBuf::from("/opt/assistant")),
            output: OutputConfig {
                format: OutputFormat::JsonPretty,
                color: false,
            },
            logging: LoggingSection::default(),
        };

        config.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("format: json-pretty"));
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model_dir": "/srv/model"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.model_dir, Some(PathBuf::from("/srv/model")));
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.library, None);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/nlu.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_library_flag_overrides_file() {
        let config = Config {
            library: Some(PathBuf::from("/from/file.so")),
            ..Config::default()
        };
        assert_eq!(
            config.library_config(Some(Path::new("/from/flag.so"))).path,
            PathBuf::from("/from/flag.so")
        );
        assert_eq!(config.library_config(None).path, PathBuf::from("/from/file.so"));
    }
}
