//! Key-value persistence for encodable values.
//!
//! `KeyValueStore` is the raw byte store (in memory, or one file per key on
//! disk). `Storage` layers JSON encoding on top and reports failures as
//! `WeatherError::Cache` / `WeatherError::Decoding`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::WeatherError;

/// Raw byte storage keyed by string.
///
/// Last write wins; no transactional guarantees.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> io::Result<()>;

    /// Deletes `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Process-local store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> io::Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store that keeps each key in its own file under a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.value", encode_key(key)))
    }
}

/// Keep file names portable: ASCII alphanumerics, `-` and `_` pass through,
/// every other byte becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Encodes values to JSON and stores them in a `KeyValueStore`.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Storage over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    /// `WeatherError::Cache` if encoding or the backend write fails.
    pub fn save<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> Result<(), WeatherError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| WeatherError::cache(format!("failed to encode {}: {}", key, e)))?;

        self.backend
            .set(key, bytes)
            .map_err(|e| WeatherError::cache(format!("failed to write {}: {}", key, e)))?;

        tracing::debug!("Saved value under key: {}", key);
        Ok(())
    }

    /// Load and decode the value stored under `key`.
    ///
    /// # Errors
    /// `WeatherError::Decoding` if the stored bytes don't decode as `T`,
    /// `WeatherError::Cache` if the backend read fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, WeatherError> {
        let bytes = match self
            .backend
            .get(key)
            .map_err(|e| WeatherError::cache(format!("failed to read {}: {}", key, e)))?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| WeatherError::decoding(format!("failed to decode {}: {}", key, e)))
    }

    /// Delete whatever is stored under `key`.
    ///
    /// # Errors
    /// `WeatherError::Cache` if the backend delete fails.
    pub fn remove(&self, key: &str) -> Result<(), WeatherError> {
        self.backend
            .remove(key)
            .map_err(|e| WeatherError::cache(format!("failed to remove {}: {}", key, e)))?;

        tracing::debug!("Removed key: {}", key);
        Ok(())
    }
}
