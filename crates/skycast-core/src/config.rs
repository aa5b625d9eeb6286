use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Simulated fetch delays above this are flagged as a warning.
const MAX_REASONABLE_DELAY_MS: u64 = 60_000;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Key-value storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Location requested when the app starts
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Simulated network delay for uncached fetches, in milliseconds
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Storage key the whole location cache is persisted under
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
}

fn default_location() -> String {
    "台北".to_string()
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_cache_key() -> String {
    "weatherCache".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            fetch_delay_ms: default_fetch_delay_ms(),
            cache_key: default_cache_key(),
        }
    }
}

/// Which key-value backend the persistence wrapper writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend (defaults to `<config_dir>/store`)
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    ///
    /// A file that isn't valid TOML fails with `ConfigError::ParseError`.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", config_path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns `ConfigError::Invalid` if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.checked()?;

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate, turning any errors into `ConfigError::Invalid`
    pub fn checked(&self) -> std::result::Result<ValidationResult, ConfigError> {
        let validation = self.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }
        Ok(validation)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.weather.default_location.trim().is_empty() {
            result.add_error("weather.default_location", "Default location cannot be empty");
        }

        if self.weather.cache_key.trim().is_empty() {
            result.add_error("weather.cache_key", "Cache key cannot be empty");
        }

        if self.weather.fetch_delay_ms == 0 {
            result.add_warning(
                "weather.fetch_delay_ms",
                "Simulated fetch delay disabled (0 ms)",
            );
        } else if self.weather.fetch_delay_ms > MAX_REASONABLE_DELAY_MS {
            result.add_warning(
                "weather.fetch_delay_ms",
                "Simulated fetch delay is more than 60 seconds",
            );
        }

        if let Some(dir) = &self.storage.directory {
            if dir.exists() && !dir.is_dir() {
                result.add_error(
                    "storage.directory",
                    format!("Path is not a directory: {}", dir.display()),
                );
            }
        }

        result
    }

    /// Directory the file storage backend writes into
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .directory
            .clone()
            .unwrap_or_else(|| self.config_dir.join("store"))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_weather_settings() {
        let config = WeatherConfig::default();
        assert_eq!(config.default_location, "台北");
        assert_eq!(config.fetch_delay_ms, 1000);
        assert_eq!(config.cache_key, "weatherCache");
    }

    #[test]
    fn test_empty_location_is_error() {
        let mut config = Config::default();
        config.weather.default_location = "  ".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.default_location"));
    }

    #[test]
    fn test_zero_delay_is_warning() {
        let mut config = Config::default();
        config.weather.fetch_delay_ms = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.fetch_delay_ms"));
    }

    #[test]
    fn test_storage_dir_defaults_under_config_dir() {
        let mut config = Config::default();
        config.config_dir = PathBuf::from("/tmp/skycast-test");
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/skycast-test/store"));

        config.storage.directory = Some(PathBuf::from("/var/skycast"));
        assert_eq!(config.storage_dir(), PathBuf::from("/var/skycast"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.weather.cache_key, "weatherCache");
    }

    #[test]
    fn test_load_from_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/sc\"\n\n[weather]\nfetch_delay_ms = 250\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.fetch_delay_ms, 250);
        assert_eq!(config.weather.default_location, "台北");
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\nfetch_delay_ms = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(config_err, ConfigError::ParseError(_)));
        assert_eq!(config_err.user_message(), "設定檔格式錯誤");
    }

    #[test]
    fn test_checked_reports_invalid() {
        let mut config = Config::default();
        config.weather.cache_key = String::new();
        let err = config.checked().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref s) if s.contains("weather.cache_key")));

        assert!(Config::default().checked().unwrap().is_valid());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
