use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::config::Config;
use crate::error::AppError;
use crate::fetcher::fetch_all_ship_data;
use crate::types::ResponsePayload;

#[derive(Clone)]
pub struct ApiState {
    pub client: reqwest::Client,
    pub cfg: Arc<Config>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

impl ApiState {
    pub fn new(client: reqwest::Client, cfg: Config) -> Self {
        Self {
            client,
            cfg: Arc::new(cfg),
            health: Arc::new(HealthState::new()),
            latency: Arc::new(LatencyStats::new()),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/fetchAllShipData",
            get(get_ship_data)
                // `get` would otherwise answer HEAD by running the whole pipeline
                .head(method_not_allowed)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ])
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub runs_total: u64,
    pub last_run_at: Option<u64>,
    pub last_failed_filters: u64,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub samples: u64,
    pub p50_ms: Option<u64>,
    pub p95_ms: Option<u64>,
    pub p99_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_ship_data(State(state): State<ApiState>) -> Result<Json<ResponsePayload>, AppError> {
    let started = Instant::now();

    let payload = match fetch_all_ship_data(&state.client, &state.cfg).await {
        Ok(p) => p,
        Err(e) => {
            error!("Error in fetchAllShipData: {e}");
            return Err(e);
        }
    };

    let elapsed = started.elapsed();
    state.latency.record(elapsed);
    state
        .health
        .record_run(now_secs(), payload.detailed_data.failed_count());
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        last_update = %payload.last_update,
        "served ship data",
    );

    Ok(Json(payload))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let last = state.health.last_run_at_secs();
    Json(HealthResponse {
        runs_total: state.health.runs_total(),
        last_run_at: (last > 0).then_some(last),
        last_failed_filters: state.health.last_failed_filters(),
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let (p50_ms, p95_ms, p99_ms) = state.latency.percentiles();
    Json(LatencyResponse {
        samples: state.latency.len(),
        p50_ms,
        p95_ms,
        p99_ms,
    })
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
