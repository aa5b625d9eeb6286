//! Weather view model.
//!
//! Holds the current snapshot, its formatted display data and the loading
//! flag. Fetches go through the weather service channel; results are applied
//! in `poll_channel`, which the view calls from its own thread (e.g. a UI
//! timer), so subscribers only ever hear from that thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use skycast_core::AppError;
use skycast_weather::{WeatherSnapshot, WeatherSource};

use crate::format::{self, ForecastDisplayItem, WeatherDisplay};
use crate::services::{request_weather_fetch, WeatherError, WeatherServiceMessage};

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    LoadingChanged(bool),
    DataChanged,
    ForecastChanged,
    /// Localized, user-facing message.
    Error(String),
}

/// Application lifecycle transitions forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    EnteredBackground,
    WillEnterForeground,
}

pub struct WeatherViewModel {
    source: Arc<dyn WeatherSource>,
    runtime: tokio::runtime::Handle,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
    subscribers: Vec<Sender<ViewEvent>>,
    loading: bool,
    error_message: String,
    weather: Option<WeatherSnapshot>,
    display: WeatherDisplay,
    forecast_items: Vec<ForecastDisplayItem>,
}

impl WeatherViewModel {
    pub fn new(source: Arc<dyn WeatherSource>, runtime: tokio::runtime::Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            runtime,
            tx,
            rx,
            subscribers: Vec::new(),
            loading: false,
            error_message: String::new(),
            weather: None,
            display: WeatherDisplay::default(),
            forecast_items: Vec::new(),
        }
    }

    /// Register for notifications. Dropped receivers are pruned on the next event.
    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.weather.is_some()
    }

    pub fn display(&self) -> &WeatherDisplay {
        &self.display
    }

    pub fn forecast_items(&self) -> &[ForecastDisplayItem] {
        &self.forecast_items
    }

    pub fn forecast_count(&self) -> i32 {
        i32::try_from(self.forecast_items.len()).unwrap_or(i32::MAX)
    }

    /// Request weather for `location`.
    pub fn location_changed(&mut self, location: &str) {
        tracing::info!("Requesting weather for {}", location);
        self.error_message.clear();
        self.set_loading(true);
        request_weather_fetch(
            &self.tx,
            &self.runtime,
            self.source.clone(),
            location.to_string(),
        );
    }

    /// Re-request the current snapshot's location. Does nothing before the
    /// first successful fetch.
    pub fn refresh(&mut self) {
        let location = match &self.weather {
            Some(w) => w.location.clone(),
            None => return,
        };
        self.location_changed(&location);
    }

    /// Forecast row at `index`, if any. Selection itself changes no state.
    pub fn select_forecast(&self, index: i32) -> Option<&ForecastDisplayItem> {
        let item = usize::try_from(index)
            .ok()
            .and_then(|i| self.forecast_items.get(i))?;
        tracing::debug!("Selected forecast {} ({})", index, item.date);
        Some(item)
    }

    pub fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::EnteredBackground => self.save_current(),
            LifecycleEvent::WillEnterForeground => self.refresh(),
        }
    }

    /// Apply any finished fetches. Call this from the UI thread.
    ///
    /// Returns the number of messages processed.
    pub fn poll_channel(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.rx.try_recv() {
            processed += 1;
            match msg {
                WeatherServiceMessage::FetchDone { location, result } => {
                    self.apply_fetch(&location, result)
                }
            }
        }
        processed
    }

    fn apply_fetch(&mut self, location: &str, result: Result<WeatherSnapshot, WeatherError>) {
        self.set_loading(false);
        match result {
            Ok(weather) => {
                tracing::info!("Weather updated for {}", location);
                self.display = format::display_data(&weather);
                self.forecast_items = format::forecast_items(&weather);
                self.weather = Some(weather);
                self.emit(ViewEvent::DataChanged);
                self.emit(ViewEvent::ForecastChanged);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn save_current(&mut self) {
        let Some(weather) = self.weather.clone() else {
            return;
        };
        let result = self
            .source
            .save(&weather, &weather.location)
            .map_err(WeatherError::from);
        match result {
            Ok(()) => tracing::debug!("Saved weather for {}", weather.location),
            Err(e) => {
                tracing::warn!("Failed to save weather: {}", e);
                self.report_error(e);
            }
        }
    }

    fn report_error(&mut self, e: WeatherError) {
        let message = AppError::from(e).user_message();
        self.error_message = message.to_string();
        self.emit(ViewEvent::Error(message.to_string()));
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.emit(ViewEvent::LoadingChanged(loading));
    }

    fn emit(&mut self, event: ViewEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
