//! Weather data for SkyCast
//!
//! Provides mock weather snapshots through a rotating provider, an in-memory
//! location cache mirrored to a key-value store, and the persistence wrapper
//! that encodes values for that store.

pub mod types;
pub mod storage;
pub mod cache;
pub mod provider;

pub use types::*;
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Storage};
pub use cache::{WeatherStore, DEFAULT_CACHE_KEY};
pub use provider::{MockWeatherProvider, WeatherSource, DEFAULT_FETCH_DELAY};
