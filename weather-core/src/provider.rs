use crate::{Config, LookupError, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a city identifier.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherReading, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the weather provider.\n\
                 Hint: run `weather-server configure` or set WEATHER_API_KEY."
        )
    })?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.provider.base_url.clone(),
        config.provider.timeout(),
    )?;

    Ok(Box::new(provider))
}
