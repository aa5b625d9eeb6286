use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;

use crate::cache::WeatherStore;
use crate::types::{DailyForecast, WeatherCondition, WeatherError, WeatherSnapshot};

/// Simulated latency of an uncached fetch.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(1);

/// Location every mock snapshot is stamped with.
const MOCK_LOCATION: &str = "台北";

/// Anything that can produce weather for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Weather for `location`, from cache when available.
    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// Store `snapshot` as the latest weather for `location`.
    fn save(&self, snapshot: &WeatherSnapshot, location: &str) -> Result<(), WeatherError>;

    /// Cached weather for `location`, without side effects.
    fn get_cached(&self, location: &str) -> Option<WeatherSnapshot>;
}

/// Offline provider that alternates between two fixed snapshots.
///
/// The rotation is shared across locations and every snapshot reads
/// `台北` as its location, whatever was requested.
#[derive(Debug)]
pub struct MockWeatherProvider {
    store: Arc<WeatherStore>,
    mocks: [WeatherSnapshot; 2],
    rotation: Mutex<usize>,
    delay: Duration,
}

impl MockWeatherProvider {
    /// Mock forecasts start today in local time.
    pub fn new(store: Arc<WeatherStore>) -> Self {
        Self {
            store,
            mocks: mock_snapshots(Local::now().date_naive()),
            rotation: Mutex::new(0),
            delay: DEFAULT_FETCH_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Anchor the mock forecasts to `today` instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.mocks = mock_snapshots(today);
        self
    }

    /// Index of the mock the next uncached fetch will return.
    pub fn rotation_index(&self) -> usize {
        *self.rotation.lock()
    }

    pub fn store(&self) -> &Arc<WeatherStore> {
        &self.store
    }

    fn next_mock(&self) -> WeatherSnapshot {
        let mut index = self.rotation.lock();
        let snapshot = self.mocks[*index].clone();
        *index = (*index + 1) % self.mocks.len();
        snapshot
    }
}

#[async_trait]
impl WeatherSource for MockWeatherProvider {
    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        if let Some(cached) = self.store.get(location) {
            tracing::debug!("Using cached weather for {}", location);
            return Ok(cached);
        }

        tokio::time::sleep(self.delay).await;

        let snapshot = self.next_mock();
        self.store.insert(location, snapshot.clone())?;
        tracing::info!(
            "Fetched weather for {}: {:.1} {}",
            location,
            snapshot.temperature,
            snapshot.condition.label()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &WeatherSnapshot, location: &str) -> Result<(), WeatherError> {
        self.store.insert(location, snapshot.clone())
    }

    fn get_cached(&self, location: &str) -> Option<WeatherSnapshot> {
        self.store.get(location)
    }
}

fn day(today: NaiveDate, offset: u64) -> NaiveDate {
    today + Days::new(offset)
}

/// The two fixed snapshots, forecasts covering today and the next two days.
pub fn mock_snapshots(today: NaiveDate) -> [WeatherSnapshot; 2] {
    [
        WeatherSnapshot::new(
            25.5,
            65,
            WeatherCondition::Sunny,
            MOCK_LOCATION,
            vec![
                DailyForecast::new(day(today, 0), 27.0, 20.0, WeatherCondition::Sunny),
                DailyForecast::new(day(today, 1), 26.0, 19.0, WeatherCondition::Cloudy),
                DailyForecast::new(day(today, 2), 24.0, 18.0, WeatherCondition::Rainy),
            ],
        ),
        WeatherSnapshot::new(
            20.0,
            85,
            WeatherCondition::Rainy,
            MOCK_LOCATION,
            vec![
                DailyForecast::new(day(today, 0), 22.0, 18.0, WeatherCondition::Rainy),
                DailyForecast::new(day(today, 1), 23.0, 17.0, WeatherCondition::Cloudy),
                DailyForecast::new(day(today, 2), 25.0, 19.0, WeatherCondition::Sunny),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::storage::Storage;

    fn provider() -> MockWeatherProvider {
        let store = Arc::new(WeatherStore::new(Storage::in_memory()));
        MockWeatherProvider::new(store)
            .with_today(NaiveDate::from_ymd_opt(2024, 11, 19).unwrap())
    }

    #[test]
    fn test_mock_forecast_dates_are_consecutive() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let [a, b] = mock_snapshots(today);
        assert_eq!(a.forecast[0].date, today);
        assert_eq!(a.forecast[2].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(b.forecast.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_first_fetch_is_sunny_taipei() {
        let provider = provider();
        let snapshot = provider.fetch("台北").await.unwrap();
        assert_eq!(snapshot.temperature, 25.5);
        assert_eq!(snapshot.condition, WeatherCondition::Sunny);
        assert_eq!(snapshot.forecast[0].high_temp, 27.0);
        assert_eq!(provider.get_cached("台北"), Some(snapshot));
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncached_fetches_rotate() {
        let provider = provider();
        let first = provider.fetch("台北").await.unwrap();
        let second = provider.fetch("台中").await.unwrap();
        let third = provider.fetch("高雄").await.unwrap();

        assert_eq!(first.temperature, 25.5);
        assert_eq!(second.temperature, 20.0);
        assert_eq!(third.temperature, 25.5);
        assert_eq!(second.location, "台北");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_fetch_skips_delay_and_rotation() {
        let provider = provider();
        provider.fetch("台北").await.unwrap();
        assert_eq!(provider.rotation_index(), 1);

        let start = tokio::time::Instant::now();
        let again = provider.fetch("台北").await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(again.temperature, 25.5);
        assert_eq!(provider.rotation_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncached_fetch_waits_for_delay() {
        let provider = provider().with_delay(Duration::from_millis(300));
        let start = tokio::time::Instant::now();
        provider.fetch("台北").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_then_get_cached() {
        let provider = provider();
        let custom = WeatherSnapshot::new(5.0, 40, WeatherCondition::Snow, "合歡山", vec![])
            .with_description("大雪");
        provider.save(&custom, "合歡山").unwrap();
        assert_eq!(provider.get_cached("合歡山"), Some(custom.clone()));

        let fetched = provider.fetch("合歡山").await.unwrap();
        assert_eq!(fetched, custom);
        assert_eq!(provider.rotation_index(), 0);
    }
}
