use std::collections::HashMap;

use parking_lot::Mutex;

use crate::storage::Storage;
use crate::types::{WeatherError, WeatherSnapshot};

/// Storage key the location map is persisted under unless configured otherwise.
pub const DEFAULT_CACHE_KEY: &str = "weatherCache";

/// Location-keyed snapshot cache, mirrored to `Storage` on every write.
///
/// The in-memory map only changes after the new contents have been persisted,
/// so a failed write leaves the cache exactly as it was.
#[derive(Debug)]
pub struct WeatherStore {
    storage: Storage,
    key: String,
    entries: Mutex<HashMap<String, WeatherSnapshot>>,
}

impl WeatherStore {
    pub fn new(storage: Storage) -> Self {
        Self::with_key(storage, DEFAULT_CACHE_KEY)
    }

    /// Hydrates from `storage` under `key`. A missing or unreadable blob
    /// yields an empty cache.
    pub fn with_key(storage: Storage, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match storage.load::<HashMap<String, WeatherSnapshot>>(&key) {
            Ok(Some(entries)) => {
                tracing::info!("Loaded {} cached locations", entries.len());
                entries
            }
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to load weather cache, starting empty: {}", e);
                HashMap::new()
            }
        };

        Self {
            storage,
            key,
            entries: Mutex::new(entries),
        }
    }

    pub fn get(&self, location: &str) -> Option<WeatherSnapshot> {
        self.entries.lock().get(location).cloned()
    }

    /// Replace the entry for `location` and persist the whole map.
    ///
    /// # Errors
    /// `WeatherError::Cache` if the map could not be persisted.
    pub fn insert(&self, location: &str, snapshot: WeatherSnapshot) -> Result<(), WeatherError> {
        let mut entries = self.entries.lock();
        let mut updated = entries.clone();
        updated.insert(location.to_string(), snapshot);
        self.storage.save(&updated, &self.key)?;
        *entries = updated;
        Ok(())
    }

    /// Drop the entry for `location` and persist the remaining map.
    ///
    /// # Errors
    /// `WeatherError::Cache` if the map could not be persisted.
    pub fn remove(&self, location: &str) -> Result<Option<WeatherSnapshot>, WeatherError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(location) {
            return Ok(None);
        }
        let mut updated = entries.clone();
        let removed = updated.remove(location);
        self.storage.save(&updated, &self.key)?;
        *entries = updated;
        Ok(removed)
    }

    /// Drop every entry and the persisted blob.
    ///
    /// # Errors
    /// `WeatherError::Cache` if the blob could not be removed; the cache is
    /// left as it was.
    pub fn clear(&self) -> Result<(), WeatherError> {
        let mut entries = self.entries.lock();
        self.storage.remove(&self.key)?;
        entries.clear();
        Ok(())
    }

    /// Copy of the current map.
    pub fn entries(&self) -> HashMap<String, WeatherSnapshot> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
