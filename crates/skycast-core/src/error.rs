//! Centralized error types for the SkyCast application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-facing (localized) messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-facing message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Other(_) => "發生未預期的錯誤",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "設定無效，請檢查設定",
            ConfigError::ParseError(_) => "設定檔格式錯誤",
        }
    }
}

/// Weather errors as seen by the application layer.
///
/// Each kind maps to exactly one localized message.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidLocation(_) => "無效的位置",
            WeatherError::Network(_) => "網路連線錯誤",
            WeatherError::Decoding(_) => "資料解析錯誤",
            WeatherError::Cache(_) => "快取存取錯誤",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_user_messages_are_keyed_by_kind() {
        assert_eq!(WeatherError::InvalidLocation("x".into()).user_message(), "無效的位置");
        assert_eq!(WeatherError::Network("x".into()).user_message(), "網路連線錯誤");
        assert_eq!(WeatherError::Decoding("x".into()).user_message(), "資料解析錯誤");
        assert_eq!(WeatherError::Cache("x".into()).user_message(), "快取存取錯誤");
    }

    #[test]
    fn test_app_error_delegates_to_weather() {
        let err: AppError = WeatherError::Cache("disk full".into()).into();
        assert_eq!(err.user_message(), "快取存取錯誤");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Config(ConfigError::ParseError("test".into())),
            AppError::Other(anyhow::anyhow!("test")),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
