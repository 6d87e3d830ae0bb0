//! Bearer-token guard for the cron trigger.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use super::envelope::ApiErrorResponse;
use super::ApiState;

/// Proof that the request carried `Authorization: Bearer <cron secret>`.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

/// Extract Bearer token from Authorization header.
fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<ApiState> for CronAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        // No configured secret means the trigger is closed
        let Some(expected) = state.cron_secret.as_deref() else {
            return Err(ApiErrorResponse::unauthorized("Cron trigger is not configured"));
        };

        match extract_bearer(parts) {
            Some(token) if token == expected => Ok(CronAuth),
            Some(_) => Err(ApiErrorResponse::unauthorized("Invalid cron secret")),
            None => Err(ApiErrorResponse::unauthorized("Missing Bearer token")),
        }
    }
}
