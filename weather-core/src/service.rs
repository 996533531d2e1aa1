use anyhow::Context;
use std::sync::Arc;

use crate::{
    Config, LookupError, WeatherDisplay, WeatherProvider, WeatherQuery,
    provider::provider_from_config, store::WeatherStore,
};

/// Fetches current conditions for a city and remembers the latest summary per city.
#[derive(Debug, Clone)]
pub struct WeatherLookupService {
    provider: Arc<dyn WeatherProvider>,
    store: Option<WeatherStore>,
    default_city: String,
}

impl WeatherLookupService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Option<WeatherStore>,
        default_city: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            default_city: default_city.into(),
        }
    }

    /// Build the provider and (when enabled) connect the store described by `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> = provider_from_config(config)?.into();

        let store = if config.storage.enabled {
            let store = WeatherStore::connect(&config.storage.database_url)
                .await
                .with_context(|| {
                    format!("Failed to open database {}", config.storage.database_url)
                })?;
            Some(store)
        } else {
            None
        };

        Ok(Self::new(provider, store, config.server.default_city.clone()))
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    pub fn store(&self) -> Option<&WeatherStore> {
        self.store.as_ref()
    }

    /// Look up the weather for `city` (or the default city) and persist the summary.
    ///
    /// The store is written only after a successful fetch; any provider error
    /// leaves stored records untouched.
    pub async fn get_weather(&self, city: Option<&str>) -> Result<WeatherDisplay, LookupError> {
        let query = WeatherQuery::resolve(city, &self.default_city);

        let reading = match self.provider.current(&query.city).await {
            Ok(reading) => reading,
            Err(err) => {
                tracing::warn!(city = %query.city, error = %err, "weather lookup failed");
                return Err(err);
            }
        };

        let summary = reading.summary();

        if let Some(store) = &self.store {
            store.upsert(&query.city, &summary).await?;
        }

        Ok(WeatherDisplay {
            city: query.city,
            summary,
        })
    }
}
