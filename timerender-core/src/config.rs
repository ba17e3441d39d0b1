//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/timerender/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/timerender/` (~/.config/timerender/)
//! - State/Logs: `$XDG_STATE_HOME/timerender/` (~/.local/state/timerender/)

use crate::error::{Error, Result};
use crate::i18n::Catalog;
use crate::timezone::AbbreviationTable;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Viewer display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Refresh timer settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Timezone naming
    #[serde(default)]
    pub timezone: TimezoneConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Translated message templates, keyed by the English default
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

/// Viewer display preferences
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DisplayConfig {
    /// Show times as 15:04 instead of 3:04 PM
    #[serde(default)]
    pub twenty_four_hour_time: bool,

    /// TOML file of translated message templates. Relative paths are read
    /// from the config directory. Entries under `[messages]` take precedence.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Refresh timer settings
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Seconds between day-change checks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Config(
                "refresh.interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_interval_secs() -> u64 {
    60
}

/// Timezone naming
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TimezoneConfig {
    /// Abbreviations keyed by UTC offset, e.g. `"+05:30" = "IST"`
    #[serde(default)]
    pub abbreviations: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,

    /// Also write events to stderr
    #[serde(default)]
    pub console: bool,

    /// Log directory (default: the XDG state directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
            console: false,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.refresh.validate()
    }

    /// Message catalog from `display.catalog` with `[messages]` applied on top
    pub fn catalog(&self) -> Result<Catalog> {
        let mut catalog = match &self.display.catalog {
            Some(path) => {
                let path = Self::config_dir().join(path);
                tracing::debug!(path = %path.display(), "Loading message catalog");
                Catalog::load_from(&path)?
            }
            None => Catalog::english(),
        };
        catalog.extend(self.messages.clone());
        Ok(catalog)
    }

    /// Zone names from the configured abbreviation table
    pub fn zone_names(&self) -> AbbreviationTable {
        AbbreviationTable::new(self.timezone.abbreviations.clone())
    }

    /// Returns the config directory path
    ///
    /// `$XDG_CONFIG_HOME/timerender/` (~/.config/timerender/)
    pub fn config_dir() -> PathBuf {
        xdg_config_home().join("timerender")
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/timerender/config.toml` (~/.config/timerender/config.toml)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/timerender/` (~/.local/state/timerender/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("timerender")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/timerender/timerender.log` (~/.local/state/timerender/timerender.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("timerender.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Message, Translator};
    use crate::prefs::Preferences;
    use crate::timezone::ZoneNames;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.display.twenty_four_hour_time);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.console);
        assert!(config.logging.directory.is_none());
        assert!(config.messages.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[display]
twenty_four_hour_time = true

[refresh]
interval_secs = 30

[timezone]
abbreviations = { "+05:30" = "IST" }

[logging]
level = "debug"
console = true

[messages]
"Today" = "Heute"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.display.twenty_four_hour_time());
        assert_eq!(config.refresh.interval(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.console);
        assert_eq!(config.catalog().unwrap().translate(&Message::Today), "Heute");

        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .unwrap();
        assert_eq!(config.zone_names().short_name(&ist), "IST");
    }

    #[test]
    fn test_refresh_validation() {
        assert!(RefreshConfig::default().validate().is_ok());

        let config = RefreshConfig { interval_secs: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[refresh]\ninterval_secs = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));

        std::fs::write(&path, "[display]\ntwenty_four_hour_time = true\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(config.display.twenty_four_hour_time);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_catalog_file_with_inline_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("de.toml");
        std::fs::write(
            &catalog_path,
            "\"Today\" = \"Heute\"\n\"Yesterday\" = \"Gestern\"\n",
        )
        .unwrap();

        let toml = format!(
            "[display]\ncatalog = {:?}\n\n[messages]\n\"Yesterday\" = \"Vortag\"\n",
            catalog_path
        );
        let config: Config = toml::from_str(&toml).unwrap();
        let catalog = config.catalog().unwrap();

        assert_eq!(catalog.translate(&Message::Today), "Heute");
        assert_eq!(catalog.translate(&Message::Yesterday), "Vortag");
        assert_eq!(catalog.translate(&Message::JustNow), "Just now");
    }

    #[test]
    fn test_missing_catalog_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!("[display]\ncatalog = {:?}\n", dir.path().join("absent.toml"));
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(matches!(config.catalog(), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
