use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather condition categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snow,
}

impl WeatherCondition {
    /// Localized label shown verbatim in the UI
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunny => "晴天",
            Self::Cloudy => "多雲",
            Self::Rainy => "雨天",
            Self::Snow => "下雪",
        }
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_temp: f64,
    /// Not checked against `high_temp`.
    pub low_temp: f64,
    pub condition: WeatherCondition,
}

impl DailyForecast {
    pub fn new(
        date: NaiveDate,
        high_temp: f64,
        low_temp: f64,
        condition: WeatherCondition,
    ) -> Self {
        Self {
            date,
            high_temp,
            low_temp,
            condition,
        }
    }
}

/// One weather observation plus its forecast.
///
/// Snapshots are replaced, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: f64,
    /// Relative humidity, 0-100
    pub humidity: u8,
    pub condition: WeatherCondition,
    pub location: String,
    pub forecast: Vec<DailyForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Metres per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Fraction 0.0-1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

impl WeatherSnapshot {
    pub fn new(
        temperature: f64,
        humidity: u8,
        condition: WeatherCondition,
        location: impl Into<String>,
        forecast: Vec<DailyForecast>,
    ) -> Self {
        Self {
            temperature,
            humidity,
            condition,
            location: location.into(),
            forecast,
            description: None,
            wind_speed: None,
            precipitation: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = Some(wind_speed);
        self
    }

    pub fn with_precipitation(mut self, precipitation: f64) -> Self {
        self.precipitation = Some(precipitation);
        self
    }
}

/// Weather service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    /// Reserved for a real provider; the mock never raises it.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    /// Reserved for a real provider; the mock never raises it.
    #[error("Network error: {0}")]
    Network(String),
    #[error("Decoding error: {0}")]
    Decoding(String),
    #[error("Cache error: {0}")]
    Cache(String),
}

impl WeatherError {
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding(message.into())
    }
}
