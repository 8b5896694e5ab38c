//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-deck\config.toml
//! - macOS: ~/Library/Application Support/music-deck/config.toml
//! - Linux: ~/.config/music-deck/config.toml
//!
//! `--config PATH` reads a different file instead. Every section and field
//! is optional; anything missing takes its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::player::EngineConfig;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the track list comes from
    pub catalog: CatalogConfig,

    /// Audio settings
    pub audio: AudioConfig,

    /// Appearance settings
    pub appearance: AppearanceConfig,
}

/// Catalog source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog file (unset = built-in catalog)
    pub path: Option<PathBuf>,
}

/// Audio playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Selected output device name (empty = system default)
    pub output_device: String,

    /// Progress tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_device: String::new(),
            tick_interval_ms: 250,
        }
    }
}

/// Appearance/theme settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Initial window size in logical pixels
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            window_width: 960.0,
            window_height: 720.0,
        }
    }
}

impl Config {
    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !(16..=5000).contains(&self.audio.tick_interval_ms) {
            return Err(Error::config(format!(
                "audio.tick_interval_ms must be between 16 and 5000, got {}",
                self.audio.tick_interval_ms
            )));
        }
        if !matches!(self.appearance.theme.as_str(), "dark" | "light") {
            return Err(Error::config(format!(
                "unknown theme {:?} (expected \"dark\" or \"light\")",
                self.appearance.theme
            )));
        }
        if self.appearance.window_width < 320.0 || self.appearance.window_height < 240.0 {
            return Err(Error::config("window size must be at least 320x240"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.audio.tick_interval_ms)
    }

    /// Settings for the audio engine.
    pub fn engine_config(&self) -> EngineConfig {
        let device = self.audio.output_device.trim();
        EngineConfig {
            output_device: (!device.is_empty()).then(|| device.to_string()),
            tick_interval: self.tick_interval(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-deck"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Read and parse one config file.
pub fn load_from(path: &Path) -> std::result::Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Load configuration from disk
///
/// Reads `override_path` if given, otherwise the standard location.
/// Returns default config if the file doesn't exist, can't be parsed, or
/// holds invalid values. Logs warnings but doesn't fail - we always return
/// a usable config.
pub fn load(override_path: Option<&Path>) -> Config {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(path) = config_path() else {
                tracing::warn!("{}, using defaults", ConfigError::NoConfigDir);
                return Config::default();
            };
            if !path.exists() {
                tracing::info!("No config file found at {:?}, using defaults", path);
                return Config::default();
            }
            path
        }
    };

    let config = match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            return Config::default();
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Invalid config {:?}: {}", path, e);
        tracing::warn!("Using default configuration");
        return Config::default();
    }

    tracing::info!("Loaded config from {:?}", path);
    config
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[audio]"));
        assert!(toml.contains("[appearance]"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[audio]
output_device = "USB DAC"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.audio.output_device, "USB DAC");
        assert_eq!(config.audio.tick_interval_ms, 250);
        assert_eq!(config.appearance.theme, "dark");
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_engine_config() {
        let mut config = Config::default();
        assert_eq!(config.engine_config().output_device, None);
        assert_eq!(config.engine_config().tick_interval, Duration::from_millis(250));

        config.audio.output_device = "  Speakers ".to_string();
        assert_eq!(
            config.engine_config().output_device,
            Some("Speakers".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.audio.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.appearance.theme = "solarized".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("solarized"));
    }

    #[test]
    fn test_load_from_override_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\npath = \"/music/catalog.json\"").unwrap();
        writeln!(file, "[appearance]\ntheme = \"light\"").unwrap();

        let config = load(Some(file.path()));
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/music/catalog.json"))
        );
        assert_eq!(config.appearance.theme, "light");
    }

    #[test]
    fn test_load_falls_back_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is [not toml").unwrap();

        assert!(matches!(load_from(file.path()), Err(ConfigError::Parse(..))));
        assert_eq!(load(Some(file.path())), Config::default());
    }

    #[test]
    fn test_load_falls_back_on_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\ntick_interval_ms = 1").unwrap();
        assert_eq!(load(Some(file.path())), Config::default());
    }

    #[test]
    fn test_load_missing_override() {
        let err = load_from(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }
}
