//! Per-endpoint request counter and latency histogram, exposed in the
//! Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::{fmt, time::Duration};

#[derive(Clone)]
pub struct RequestMetrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: HistogramVec,
}

impl fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestMetrics").finish_non_exhaustive()
    }
}

impl RequestMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("weather_app_requests_total", "Total number of requests"),
            &["endpoint"],
        )?;
        let latency = HistogramVec::new(
            HistogramOpts::new(
                "weather_app_request_latency_seconds",
                "Request latency in seconds",
            ),
            &["endpoint"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency,
        })
    }

    pub fn inc_request(&self, endpoint: &str) {
        self.requests.with_label_values(&[endpoint]).inc();
    }

    pub fn observe_latency(&self, endpoint: &str, elapsed: Duration) {
        self.latency
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }

    pub fn request_count(&self, endpoint: &str) -> u64 {
        self.requests.with_label_values(&[endpoint]).get()
    }

    /// Content type to send alongside [`RequestMetrics::render`].
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}
