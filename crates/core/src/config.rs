//! Read-only application settings.
//!
//! Settings come from an optional TOML file under the user's config
//! directory. Nothing is ever written back; a missing file simply means
//! defaults.

use std::{
    env,
    path::{Path, PathBuf},
};

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "txplayers";
/// File name of the optional settings file.
pub const CONFIG_FILE: &str = "config.toml";

/// How repeated sort requests on the same column behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBehavior {
    /// Ascending first, then alternate on each repeat.
    #[default]
    Toggle,
    /// Every request sorts ascending.
    AlwaysAscending,
}

/// How a saved edit finds its record in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMatch {
    /// Match on the identifier assigned at load time.
    #[default]
    RecordId,
    /// Match the first record whose display name equals the name seen when
    /// the form was opened.
    DisplayName,
}

/// User settings with defaults for every key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Starting directory for the open/export prompts.
    pub browse_dir: Option<PathBuf>,
    /// Sort direction behaviour.
    pub sort_behavior: SortBehavior,
    /// Edit matching rule.
    pub edit_match: EditMatch,
    /// File name suggested by the export prompt.
    pub default_export_name: String,
    /// Override for the log directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            browse_dir: None,
            sort_behavior: SortBehavior::default(),
            edit_match: EditMatch::default(),
            default_export_name: "players.csv".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Location of the settings file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load settings from the default location.
    ///
    /// Any problem falls back to defaults; the error is handed back so the
    /// caller can report it once logging is up.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        let Some(path) = Self::default_path() else {
            debug!("no config directory available; using defaults");
            return (Self::default(), None);
        };
        match Self::load_from(&path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Load settings from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        };
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(invalid)?;
        settings.try_deserialize::<AppConfig>().map_err(invalid)
    }

    /// Directory the file prompts start in.
    pub fn browse_root(&self) -> PathBuf {
        self.browse_dir
            .clone()
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory the log file is written to.
    pub fn log_root(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("logs")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(&dir.path().join(CONFIG_FILE))?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_export_name, "players.csv");
        Ok(())
    }

    #[test]
    fn reads_overrides_from_toml() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
browse_dir = "/srv/exports"
sort_behavior = "always_ascending"
edit_match = "display_name"
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.browse_dir, Some(PathBuf::from("/srv/exports")));
        assert_eq!(config.browse_root(), PathBuf::from("/srv/exports"));
        assert_eq!(config.sort_behavior, SortBehavior::AlwaysAscending);
        assert_eq!(config.edit_match, EditMatch::DisplayName);
        assert_eq!(config.default_export_name, "players.csv");
        Ok(())
    }

    #[test]
    fn malformed_file_is_reported() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "browse_dir = [unterminated\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn rejects_unknown_sort_behavior() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "sort_behavior = \"sideways\"\n")?;

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        Ok(())
    }
}
