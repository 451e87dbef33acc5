use std::net::SocketAddr;
use std::time::Instant;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::state::AppState;
use crate::analysis::classifier::Classification;
use crate::error::{log_detection_error, DetectionError, ErrorCode};
use crate::telemetry::CountersSnapshot;

const UNAUTHORIZED_MESSAGE: &str = "Invalid API key or malformed request";

static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Detection request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRequest {
    pub language: String,
    pub audio_format: String,
    pub audio_base64: String,
}

/// Detection success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResponse {
    pub status: String,
    pub language: String,
    pub classification: Classification,
    pub confidence_score: f64,
    pub explanation: String,
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_ms: u64,
}

/// HTTP error variants mapped to `{status: "error", message}` envelopes.
#[derive(Debug)]
pub enum HttpServerError {
    Unauthorized,
    BadRequest(String),
    Detection(DetectionError),
    Internal(String),
}

impl From<DetectionError> for HttpServerError {
    fn from(err: DetectionError) -> Self {
        Self::Detection(err)
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Detection(err) => {
                let status = match err {
                    DetectionError::InvalidEncoding { .. }
                    | DetectionError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
                    DetectionError::Processing { .. } | DetectionError::InvalidConfig { .. } => {
                        log_detection_error(&err, "detect_voice");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.message())
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (
            status,
            Json(serde_json::json!({ "status": "error", "message": message })),
        )
            .into_response()
    }
}

/// Build the Axum router with all handlers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/voice-detection", post(detect_voice))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Run the HTTP server loop until Ctrl-C.
pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    info!("Voice detection API listening on {}", addr);

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP router")?;

    info!("Voice detection API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

pub async fn detect_voice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<DetectionResponse>, HttpServerError> {
    if let Err(err) = authorize(&state, &headers) {
        state.counters().record_rejected();
        return Err(err);
    }

    let Json(request) = body.map_err(|rejection| {
        state.counters().record_rejected();
        debug!("Rejected detection body: {}", rejection.body_text());
        HttpServerError::BadRequest(UNAUTHORIZED_MESSAGE.to_string())
    })?;

    let Some(language) = state.normalize_language(&request.language) else {
        state.counters().record_rejected();
        return Err(HttpServerError::BadRequest(
            "Unsupported language".to_string(),
        ));
    };

    debug!(
        "Detection request: language={} format={} payload={} chars",
        language,
        request.audio_format,
        request.audio_base64.len()
    );

    let pipeline = state.pipeline();
    let started = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || pipeline.analyze(&request.audio_base64))
        .await
        .map_err(|err| HttpServerError::Internal(format!("detection task failed: {err}")))?;

    let report = match outcome {
        Ok(report) => {
            state.counters().record_report(&report, started.elapsed());
            report
        }
        Err(err) => {
            state.counters().record_error(&err);
            return Err(err.into());
        }
    };

    Ok(Json(DetectionResponse {
        status: "success".to_string(),
        language,
        classification: report.result.label,
        confidence_score: round_to_hundredths(report.result.confidence),
        explanation: report.result.explanation,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_ms: state.uptime_ms(),
    })
}

pub async fn metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CountersSnapshot>, HttpServerError> {
    authorize(&state, &headers)?;
    Ok(Json(state.counters().snapshot()))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), HttpServerError> {
    let provided = headers
        .get(&X_API_KEY)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(value) if value == state.api_key() => Ok(()),
        _ => Err(HttpServerError::Unauthorized),
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
