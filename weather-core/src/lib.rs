//! Core library for the weather lookup service.
//!
//! This crate defines:
//! - Configuration handling (file + environment)
//! - The provider abstraction and the OpenWeather client
//! - Last-value-per-city persistence
//! - Request metrics
//! - [`WeatherLookupService`], which ties the above together
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use config::{Config, ProviderConfig, ServerConfig, StorageConfig};
pub use error::LookupError;
pub use metrics::RequestMetrics;
pub use model::{DEFAULT_CITY, WeatherDisplay, WeatherQuery, WeatherReading, WeatherRecord};
pub use provider::WeatherProvider;
pub use service::WeatherLookupService;
pub use store::WeatherStore;
