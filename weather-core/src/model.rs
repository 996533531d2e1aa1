use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// City identifier used when the caller does not supply one.
pub const DEFAULT_CITY: &str = "London,UK";

/// A single lookup request. Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    /// Build a query from optional caller input, falling back to `default_city`
    /// when the input is absent or blank, and to [`DEFAULT_CITY`] when
    /// `default_city` itself is blank. No other validation happens here;
    /// the provider decides whether the identifier is valid.
    pub fn resolve(input: Option<&str>, default_city: &str) -> Self {
        let default_city = Some(default_city.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY);
        let city = input
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default_city);

        Self { city: city.to_string() }
    }
}

/// Current conditions as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    /// Temperature as the provider wrote it: `15` stays `15`, `15.0` stays `15.0`.
    pub temperature_text: String,
    /// Already capitalized, e.g. "Light rain".
    pub description: String,
}

impl WeatherReading {
    pub fn new(temperature_c: f64, raw_description: &str) -> Self {
        Self {
            temperature_c,
            temperature_text: float_text(temperature_c),
            description: capitalize(raw_description),
        }
    }

    /// Build a reading from a JSON number, keeping integers and floats apart.
    /// Returns `None` if the number does not fit in an `f64`.
    pub fn from_number(temperature: &serde_json::Number, raw_description: &str) -> Option<Self> {
        let temperature_c = temperature.as_f64()?;
        let temperature_text = if temperature.is_f64() {
            float_text(temperature_c)
        } else {
            temperature.to_string()
        };

        Some(Self {
            temperature_c,
            temperature_text,
            description: capitalize(raw_description),
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "Temperature: {}°C, Weather: {}",
            self.temperature_text, self.description
        )
    }
}

/// Render a float so whole values keep their fraction, e.g. `15.0` rather than `15`.
fn float_text(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// What the caller gets back: the echoed city and the formatted summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDisplay {
    pub city: String,
    pub summary: String,
}

/// Last successful lookup for a city, as stored in the `weather` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeatherRecord {
    pub city_country: String,
    pub weather_info: String,
    pub updated_at: DateTime<Utc>,
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_uses_default_when_absent_or_blank() {
        assert_eq!(WeatherQuery::resolve(None, DEFAULT_CITY).city, "London,UK");
        assert_eq!(WeatherQuery::resolve(Some(""), DEFAULT_CITY).city, "London,UK");
        assert_eq!(WeatherQuery::resolve(Some("   "), DEFAULT_CITY).city, "London,UK");
    }

    #[test]
    fn resolve_falls_back_when_default_is_blank() {
        assert_eq!(WeatherQuery::resolve(None, "").city, "London,UK");
        assert_eq!(WeatherQuery::resolve(Some(" "), "  ").city, "London,UK");
        assert_eq!(WeatherQuery::resolve(None, " Oslo,NO ").city, "Oslo,NO");
    }

    #[test]
    fn resolve_keeps_caller_city() {
        let q = WeatherQuery::resolve(Some(" Paris,FR "), DEFAULT_CITY);
        assert_eq!(q.city, "Paris,FR");
    }

    #[test]
    fn capitalize_matches_sentence_case() {
        assert_eq!(capitalize("light rain"), "Light rain");
        assert_eq!(capitalize("OVERCAST CLOUDS"), "Overcast clouds");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclaircies"), "Éclaircies");
    }

    #[test]
    fn whole_floats_keep_their_fraction() {
        assert_eq!(
            WeatherReading::new(15.0, "clear sky").summary(),
            "Temperature: 15.0°C, Weather: Clear sky"
        );
        assert_eq!(WeatherReading::new(-0.5, "snow").temperature_text, "-0.5");
    }

    #[test]
    fn from_number_keeps_provider_text() {
        let reading = |raw: &str| {
            let number: serde_json::Number = serde_json::from_str(raw).unwrap();
            WeatherReading::from_number(&number, "clear sky").unwrap()
        };

        assert_eq!(reading("15.0").summary(), "Temperature: 15.0°C, Weather: Clear sky");
        assert_eq!(reading("15").summary(), "Temperature: 15°C, Weather: Clear sky");
        assert_eq!(reading("15.27").temperature_text, "15.27");
        assert_eq!(reading("-2").temperature_c, -2.0);
    }

    #[test]
    fn summary_format() {
        let reading = WeatherReading::new(12.5, "scattered clouds");
        assert_eq!(
            reading.summary(),
            "Temperature: 12.5°C, Weather: Scattered clouds"
        );
    }
}
