//! Integration tests for the store and mock provider over real key-value backends.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use skycast_weather::{
    FileKeyValueStore, KeyValueStore, MockWeatherProvider, Storage, WeatherError, WeatherSource,
    WeatherStore, DEFAULT_CACHE_KEY,
};

/// Backend that accepts reads but rejects every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Vec<u8>) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn remove(&self, _key: &str) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_fetched_weather_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(FileKeyValueStore::new(dir.path()));

    let store = Arc::new(WeatherStore::new(Storage::new(backend.clone())));
    let provider = MockWeatherProvider::new(store).with_delay(Duration::from_millis(10));
    let fetched = provider.fetch("台北").await.unwrap();

    assert!(backend.get(DEFAULT_CACHE_KEY).unwrap().is_some());

    // A new store over the same directory hydrates the earlier fetch.
    let reopened = Arc::new(WeatherStore::new(Storage::new(backend)));
    let provider = MockWeatherProvider::new(reopened);
    assert_eq!(provider.get_cached("台北"), Some(fetched.clone()));

    let start = tokio::time::Instant::now();
    assert_eq!(provider.fetch("台北").await.unwrap(), fetched);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(provider.rotation_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_persist_failure_fails_fetch_and_keeps_cache_empty() {
    let store = Arc::new(WeatherStore::new(Storage::new(Arc::new(ReadOnlyStore))));
    let provider = MockWeatherProvider::new(store.clone());

    let result = provider.fetch("台北").await;
    assert!(matches!(result, Err(WeatherError::Cache(_))));
    assert!(provider.get_cached("台北").is_none());
    assert!(store.is_empty());

    // The rotation still advanced before the write was attempted.
    assert_eq!(provider.rotation_index(), 1);
}

#[test]
fn test_corrupt_blob_on_disk_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileKeyValueStore::new(dir.path());
    backend.set(DEFAULT_CACHE_KEY, b"[1, 2, 3]".to_vec()).unwrap();

    let store = WeatherStore::new(Storage::new(Arc::new(backend)));
    assert!(store.is_empty());
}
