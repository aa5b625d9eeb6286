use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use skycast_core::{AppError, Config, ConfigError, StorageBackend};
use skycast_ui::{ViewEvent, WeatherViewModel};
use skycast_weather::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, MockWeatherProvider, Storage,
    WeatherStore,
};

/// How often the driver drains the view model's channel.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => match e.downcast::<ConfigError>() {
            Ok(config_error) => {
                let app_error = AppError::from(config_error);
                println!("錯誤: {}", app_error.user_message());
                return Err(app_error.into());
            }
            Err(e) => return Err(e),
        },
    };
    tracing::info!("SkyCast started");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skycast-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let backend: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileKeyValueStore::new(config.storage_dir())),
        StorageBackend::Memory => Arc::new(MemoryKeyValueStore::new()),
    };
    let store = Arc::new(WeatherStore::with_key(
        Storage::new(backend),
        config.weather.cache_key.clone(),
    ));
    let provider = MockWeatherProvider::new(store)
        .with_delay(Duration::from_millis(config.weather.fetch_delay_ms));

    let mut view_model = WeatherViewModel::new(Arc::new(provider), runtime.handle().clone());
    let events = view_model.subscribe();

    view_model.location_changed(&config.weather.default_location);
    while view_model.loading() {
        std::thread::sleep(POLL_INTERVAL);
        view_model.poll_channel();
    }

    for event in events.try_iter() {
        if let ViewEvent::Error(message) = event {
            println!("錯誤: {}", message);
        }
    }

    if view_model.has_data() {
        let display = view_model.display();
        println!("{}", display.location);
        println!("  溫度: {}", display.temperature);
        println!("  濕度: {}", display.humidity);
        println!("  天氣: {}", display.condition);
        println!("  風速: {}", display.wind_speed);
        println!("  降水: {}", display.precipitation);
        println!("  描述: {}", display.description);
        for item in view_model.forecast_items() {
            println!(
                "  {}  {} / {}  {}",
                item.date, item.high_temp, item.low_temp, item.condition
            );
        }
    }

    tracing::info!("SkyCast finished");
    Ok(())
}
