//! Errors surfaced by a weather lookup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    /// Transport failure or non-success status from the provider.
    #[error("Unable to fetch weather data: {0}")]
    ProviderUnavailable(String),

    /// Provider answered 2xx but the body lacks `main.temp` or `weather[0].description`.
    #[error("Unexpected weather data from provider: {0}")]
    MalformedResponse(String),

    #[error("Failed to store weather record: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::ProviderUnavailable(error_chain(&err))
    }
}

/// Render an error and its sources as one line, e.g.
/// "error sending request: connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_underlying_text() {
        let err = LookupError::ProviderUnavailable("status 401 Unauthorized".into());
        assert!(err.to_string().contains("status 401 Unauthorized"));

        let err = LookupError::MalformedResponse("missing field `main`".into());
        assert!(err.to_string().contains("missing field `main`"));
    }

    #[test]
    fn storage_wraps_sqlx_error() {
        let err = LookupError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, LookupError::Storage(_)));
        assert!(err.to_string().starts_with("Failed to store weather record"));
    }
}
