//! Snapshot to display-string formatting.
//!
//! Everything here is a pure function of its input.

use chrono::NaiveDate;
use skycast_weather::WeatherSnapshot;

pub const NO_WIND_DATA: &str = "無風速資料";
pub const NO_PRECIPITATION_DATA: &str = "無降水資料";
pub const NO_DESCRIPTION: &str = "無描述";

/// Current conditions, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherDisplay {
    pub location: String,
    pub temperature: String,
    pub humidity: String,
    pub condition: String,
    pub wind_speed: String,
    pub precipitation: String,
    pub description: String,
}

/// A forecast day, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDisplayItem {
    pub date: String,
    pub high_temp: String,
    pub low_temp: String,
    pub condition: String,
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{:.1}°C", celsius)
}

pub fn format_humidity(humidity: u8) -> String {
    format!("{}%", humidity)
}

pub fn format_wind_speed(wind_speed: Option<f64>) -> String {
    match wind_speed {
        Some(speed) => format!("{:.1} m/s", speed),
        None => NO_WIND_DATA.to_string(),
    }
}

/// `fraction` is 0.0-1.0.
pub fn format_precipitation(fraction: Option<f64>) -> String {
    match fraction {
        Some(p) => format!("{:.0}%", p * 100.0),
        None => NO_PRECIPITATION_DATA.to_string(),
    }
}

/// `MM/dd`, independent of locale.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d").to_string()
}

pub fn format_description(description: Option<&str>) -> String {
    description.unwrap_or(NO_DESCRIPTION).to_string()
}

pub fn display_data(weather: &WeatherSnapshot) -> WeatherDisplay {
    WeatherDisplay {
        location: weather.location.clone(),
        temperature: format_temperature(weather.temperature),
        humidity: format_humidity(weather.humidity),
        condition: weather.condition.label().to_string(),
        wind_speed: format_wind_speed(weather.wind_speed),
        precipitation: format_precipitation(weather.precipitation),
        description: format_description(weather.description.as_deref()),
    }
}

pub fn forecast_items(weather: &WeatherSnapshot) -> Vec<ForecastDisplayItem> {
    weather
        .forecast
        .iter()
        .map(|day| ForecastDisplayItem {
            date: format_date(day.date),
            high_temp: format_temperature(day.high_temp),
            low_temp: format_temperature(day.low_temp),
            condition: day.condition.label().to_string(),
        })
        .collect()
}
