//! API route definitions
//!
//! - /api/v1/health - liveness
//! - /api/v1/evaluate - vessel status for a batch of readings
//! - /api/v1/incidents - deduplicated incident history for a batch of readings
//! - /api/cron/check-vessel-alarms - one alarm sweep (Bearer cron secret)

use axum::{routing::{get, post}, Router};

use super::handlers;
use super::ApiState;

/// Versioned public endpoints
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/evaluate", post(handlers::evaluate))
        .route("/incidents", post(handlers::incidents))
        .with_state(state)
}

/// Scheduler hooks for an external cron
pub fn cron_routes(state: ApiState) -> Router {
    Router::new()
        .route("/check-vessel-alarms", get(handlers::check_vessel_alarms))
        .with_state(state)
}
