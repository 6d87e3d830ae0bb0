//! REST API module using Axum
//!
//! Thin HTTP surface over the status engine and the alarm sweep:
//! - `/api/v1/*` evaluates readings posted by clients
//! - `/api/cron/*` lets an external scheduler trigger sweeps

mod auth;
pub mod envelope;
pub mod handlers;
mod routes;

pub use auth::CronAuth;

use axum::http::{header, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::status_engine::StatusEngine;
use crate::sweep::AlarmSweep;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<StatusEngine>,
    /// Absent when the server runs without a fleet
    pub sweep: Option<Arc<AlarmSweep>>,
    pub cron_secret: Option<String>,
}

impl ApiState {
    pub fn new(engine: StatusEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            sweep: None,
            cron_secret: None,
        }
    }

    pub fn with_sweep(mut self, sweep: Arc<AlarmSweep>) -> Self {
        self.sweep = Some(sweep);
        self
    }

    pub fn with_cron_secret(mut self, secret: Option<String>) -> Self {
        self.cron_secret = secret;
        self
    }
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `SEAZR_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for a separately hosted dashboard.
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match std::env::var("SEAZR_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .nest("/api/cron", routes::cron_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
