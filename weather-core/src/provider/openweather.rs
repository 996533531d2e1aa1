use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{error::LookupError, model::WeatherReading};

use super::WeatherProvider;

/// Current-weather endpoint of the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: serde_json::Number,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReading, LookupError> {
        tracing::debug!(city, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::ProviderUnavailable(format!(
                "provider returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

        let weather = parsed.weather.first().ok_or_else(|| {
            LookupError::MalformedResponse("response contained no weather entries".to_string())
        })?;

        WeatherReading::from_number(&parsed.main.temp, &weather.description).ok_or_else(|| {
            LookupError::MalformedResponse(format!(
                "temperature {} does not fit in an f64",
                parsed.main.temp
            ))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
