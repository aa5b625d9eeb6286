//! Weather backend: async weather fetching.
//! All fetch work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_weather::{WeatherSnapshot, WeatherSource};

/// Error type for weather operations
#[derive(Debug, Clone)]
pub enum WeatherError {
    InvalidLocation(String),
    Network(String),
    Decoding(String),
    Cache(String),
    /// The fetch task panicked or was cancelled before reporting back.
    TaskFailed(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::InvalidLocation(s) => write!(f, "Invalid location: {}", s),
            WeatherError::Network(s) => write!(f, "Network error: {}", s),
            WeatherError::Decoding(s) => write!(f, "Decoding error: {}", s),
            WeatherError::Cache(s) => write!(f, "Cache error: {}", s),
            WeatherError::TaskFailed(s) => write!(f, "Fetch task failed: {}", s),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<skycast_weather::WeatherError> for WeatherError {
    fn from(e: skycast_weather::WeatherError) -> Self {
        match e {
            skycast_weather::WeatherError::InvalidLocation(s) => WeatherError::InvalidLocation(s),
            skycast_weather::WeatherError::Network(s) => WeatherError::Network(s),
            skycast_weather::WeatherError::Decoding(s) => WeatherError::Decoding(s),
            skycast_weather::WeatherError::Cache(s) => WeatherError::Cache(s),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching weather for a location
    FetchDone {
        location: String,
        result: Result<WeatherSnapshot, WeatherError>,
    },
}

/// Request weather for `location` asynchronously.
/// Sends `FetchDone` on the channel when complete, even if the fetch panics.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    source: Arc<dyn WeatherSource>,
    location: String,
) {
    let tx = tx.clone();
    let fetch = {
        let location = location.clone();
        async move { source.fetch(&location).await }
    };

    runtime.spawn(async move {
        let result = match tokio::spawn(fetch).await {
            Ok(result) => result.map_err(WeatherError::from),
            Err(e) => Err(WeatherError::TaskFailed(e.to_string())),
        };
        if let Err(e) = &result {
            tracing::error!("Failed to fetch weather for {}: {}", location, e);
        }
        let _ = tx.send(WeatherServiceMessage::FetchDone { location, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_error_display() {
        assert!(format!("{}", WeatherError::Cache("full".into())).contains("Cache"));
        assert!(format!("{}", WeatherError::Decoding("bad".into())).contains("Decoding"));
        assert!(format!("{}", WeatherError::Network("down".into())).contains("Network"));
        assert!(format!("{}", WeatherError::TaskFailed("panic".into())).contains("task"));
    }

    #[test]
    fn domain_errors_keep_their_kind() {
        let e: WeatherError = skycast_weather::WeatherError::cache("write failed").into();
        assert!(matches!(e, WeatherError::Cache(ref s) if s == "write failed"));
    }
}
