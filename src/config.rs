//! Application settings.
//!
//! Settings are read from an optional `config.toml` in the platform config
//! directory (`~/.config/item-showcase/config.toml` on Linux). Every key is
//! optional; a missing file means all defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory name used under the platform data and config dirs
pub const APP_DIR: &str = "item-showcase";

/// Shown when an image URL cannot be loaded
pub const DEFAULT_FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1581090464777-f3220bbe1b8b?w=500&h=500&fit=crop";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine a data directory; set data_dir in the config file")]
    NoDataDir,
}

/// Color theme of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the slot database lives, platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Pause between a successful submit and the switch to the catalog
    pub redirect_delay_ms: u64,
    /// How long a notice stays on screen
    pub notice_duration_ms: u64,
    pub fallback_image: String,
    pub theme: ThemeChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            redirect_delay_ms: 1500,
            notice_duration_ms: 3000,
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            theme: ThemeChoice::Dark,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load the default config file, falling back to defaults when absent
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Directory holding the slot database
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR))
            .ok_or(ConfigError::NoDataDir)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.redirect_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_overrides_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/showcase\"\nredirect_delay_ms = 10\ntheme = \"light\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/showcase"));
        assert_eq!(config.redirect_delay(), Duration::from_millis(10));
        assert_eq!(config.notice_duration(), Duration::from_millis(3000));
        assert_eq!(config.theme, ThemeChoice::Light);
        assert_eq!(config.fallback_image, DEFAULT_FALLBACK_IMAGE);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "redirect_delay = 10\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
