//! HTTP surface: routes, request metrics middleware and error responses.

use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use weather_core::{LookupError, RequestMetrics, WeatherLookupService};

use crate::page;

const MAX_FORM_BYTES: usize = 16 * 1024;

/// Routes that are counted but not timed.
const UNTIMED_ENDPOINTS: &[&str] = &["/metrics"];

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: WeatherLookupService,
    pub metrics: RequestMetrics,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home).post(home_form))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_requests,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count the request on entry and record its latency on exit, labelled by route.
/// Scrapes of `/metrics` are only counted.
async fn track_requests(
    State(metrics): State<RequestMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    metrics.inc_request(&endpoint);
    let started = Instant::now();
    let response = next.run(req).await;
    if !UNTIMED_ENDPOINTS.contains(&endpoint.as_str()) {
        metrics.observe_latency(&endpoint, started.elapsed());
    }

    response
}

/// A failed lookup rendered as a 500 page.
pub struct ErrorPage(LookupError);

impl From<LookupError> for ErrorPage {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Html(page::error(&self.0))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CityForm {
    city: Option<String>,
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, ErrorPage> {
    let display = state.service.get_weather(None).await?;
    Ok(Html(page::weather(&display)))
}

async fn home_form(
    State(state): State<AppState>,
    Form(form): Form<CityForm>,
) -> Result<Html<String>, ErrorPage> {
    let display = state.service.get_weather(form.city.as_deref()).await?;
    Ok(Html(page::weather(&display)))
}

async fn ping() -> Html<&'static str> {
    Html(page::PONG)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "HEALTHY" })
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, state.metrics.content_type())],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
