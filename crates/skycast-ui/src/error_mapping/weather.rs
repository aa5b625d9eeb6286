use crate::services::weather_service::WeatherError as UiWeatherError;
use skycast_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::InvalidLocation(s) => {
                AppError::Weather(WeatherError::InvalidLocation(s))
            }
            UiWeatherError::Network(s) => AppError::Weather(WeatherError::Network(s)),
            UiWeatherError::Decoding(s) => AppError::Weather(WeatherError::Decoding(s)),
            UiWeatherError::Cache(s) => AppError::Weather(WeatherError::Cache(s)),
            UiWeatherError::TaskFailed(s) => {
                AppError::Other(anyhow::anyhow!("weather fetch task failed: {}", s))
            }
        }
    }
}
