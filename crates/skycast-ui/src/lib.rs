//! Presentation layer for SkyCast.
//!
//! The view model owns all UI-facing state. Fetches run on a tokio runtime and
//! report back through a channel that the view drains with `poll_channel`, so
//! every notification is raised on the thread that owns the view model.

pub mod error_mapping;
pub mod format;
pub mod models;
pub mod services;

pub use format::{ForecastDisplayItem, WeatherDisplay};
pub use models::weather_model::{LifecycleEvent, ViewEvent, WeatherViewModel};
