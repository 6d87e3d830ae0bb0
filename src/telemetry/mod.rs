//! Telemetry and fleet-directory seams
//!
//! The status engine never talks to storage. Everything that needs readings
//! (sweep, dashboard, reports, API) goes through these traits so the backing
//! store can be swapped without touching classification.

mod file_store;

pub use file_store::{FleetSnapshot, JsonFleetStore};

use async_trait::async_trait;
use std::path::PathBuf;

use crate::types::{SensorReading, TimeRange, VesselLocation, VesselRecord};

/// Failure to obtain telemetry or vessel metadata.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("user '{user_id}' has no access to vessel '{vessel}'")]
    PermissionDenied { vessel: String, user_id: String },

    #[error("vessel '{0}' not found")]
    NotFound(String),

    #[error("telemetry I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("telemetry snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("telemetry backend unavailable: {0}")]
    Unavailable(String),
}

/// Source of sensor readings and GPS fixes.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Current state of a vessel: the latest reading per sensor, as seen
    /// by `user_id`.
    async fn fetch_readings(
        &self,
        vessel_short_id: &str,
        user_id: &str,
    ) -> Result<Vec<SensorReading>, TelemetryError>;

    /// Every reading inside `range`.
    async fn fetch_history(
        &self,
        vessel_short_id: &str,
        range: TimeRange,
    ) -> Result<Vec<SensorReading>, TelemetryError>;

    /// Every GPS fix inside `range`.
    async fn fetch_locations(
        &self,
        vessel_short_id: &str,
        range: TimeRange,
    ) -> Result<Vec<VesselLocation>, TelemetryError>;
}

/// Registry of vessels and who may see them.
#[async_trait]
pub trait FleetDirectory: Send + Sync {
    async fn list_vessels(&self) -> Result<Vec<VesselRecord>, TelemetryError>;
}
