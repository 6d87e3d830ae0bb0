//! API request handlers

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::auth::CronAuth;
use super::envelope::{ApiErrorResponse, ApiResponse};
use super::ApiState;
use crate::types::{ingest_readings, RawReading};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sweep_enabled: bool,
}

/// Readings to evaluate, as the telemetry store delivers them.
#[derive(Debug, Deserialize)]
pub struct ReadingsRequest {
    pub readings: Vec<RawReading>,
    /// Evaluation instant; defaults to the server clock
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// GET /api/v1/health
pub async fn get_health(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        sweep_enabled: state.sweep.is_some(),
    })
}

/// POST /api/v1/evaluate
pub async fn evaluate(State(state): State<ApiState>, Json(req): Json<ReadingsRequest>) -> Response {
    let readings = match ingest_readings(req.readings) {
        Ok(r) => r,
        Err(e) => return ApiErrorResponse::bad_request(e.to_string()),
    };
    let now = req.now.unwrap_or_else(Utc::now);
    ApiResponse::ok(state.engine.evaluate_at(&readings, now))
}

/// POST /api/v1/incidents
pub async fn incidents(State(state): State<ApiState>, Json(req): Json<ReadingsRequest>) -> Response {
    match ingest_readings(req.readings) {
        Ok(readings) => ApiResponse::ok(state.engine.summarize(&readings)),
        Err(e) => ApiErrorResponse::bad_request(e.to_string()),
    }
}

/// GET /api/cron/check-vessel-alarms
pub async fn check_vessel_alarms(_auth: CronAuth, State(state): State<ApiState>) -> Response {
    let Some(sweep) = state.sweep.as_ref() else {
        return ApiErrorResponse::service_unavailable("No fleet loaded");
    };

    info!("Cron-triggered vessel alarm check");
    match sweep.run_once().await {
        Ok(summary) => ApiResponse::ok(summary),
        Err(e) => {
            error!(error = %e, "Cron alarm check failed");
            ApiErrorResponse::internal("Vessel alarm check failed")
        }
    }
}
