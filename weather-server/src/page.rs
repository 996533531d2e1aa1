//! Minimal inline HTML for the `/` and `/ping` pages.

use weather_core::{LookupError, WeatherDisplay};

pub const PONG: &str = "<html><body><h1>PONG</h1></body></html>";

pub fn weather(display: &WeatherDisplay) -> String {
    let city = escape(&display.city);
    let summary = escape(&display.summary);
    format!(
        "<html>\n\
         <head><title>Current Weather in {city}</title></head>\n\
         <body>\n\
         <h1>Current Weather in {city}</h1>\n\
         <p>{summary}</p>\n\
         <form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"city\" placeholder=\"City,CountryCode\" value=\"{city}\">\n\
         <button type=\"submit\">Get weather</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    )
}

pub fn error(err: &LookupError) -> String {
    format!(
        "<html>\n\
         <head><title>Error</title></head>\n\
         <body>\n\
         <h1>Unable to fetch weather data</h1>\n\
         <p>Error: {}</p>\n\
         </body>\n\
         </html>\n",
        escape(&err.to_string())
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_page_shows_city_and_summary() {
        let html = weather(&WeatherDisplay {
            city: "London,UK".into(),
            summary: "Temperature: 9.5°C, Weather: Drizzle".into(),
        });
        assert!(html.contains("Current Weather in London,UK"));
        assert!(html.contains("Temperature: 9.5°C, Weather: Drizzle"));
        assert!(html.contains("name=\"city\""));
    }

    #[test]
    fn user_input_is_escaped() {
        let html = weather(&WeatherDisplay {
            city: "<script>alert(1)</script>".into(),
            summary: "x".into(),
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_page_carries_error_text() {
        let err = LookupError::ProviderUnavailable("connection refused".into());
        let html = error(&err);
        assert!(html.contains("Unable to fetch weather data"));
        assert!(html.contains("connection refused"));
    }
}
