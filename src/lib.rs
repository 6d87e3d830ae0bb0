//! Seazr: vessel health monitoring
//!
//! Classifies boat sensor telemetry into a ranked vessel status and raises
//! alerts when readings cross safety thresholds.
//!
//! ## Architecture
//!
//! - **Status Engine**: pure per-reading classification and status folding
//! - **Report**: deduplicated incident history and voyage summaries
//! - **Sweep**: periodic fleet-wide alarm check with alert dispatch
//! - **Telemetry**: store and directory traits plus a JSON snapshot backend
//! - **API**: Axum endpoints for evaluation and cron-triggered sweeps

pub mod api;
pub mod config;
pub mod dashboard;
pub mod report;
pub mod status_engine;
pub mod sweep;
pub mod telemetry;
pub mod types;

// Re-export configuration
pub use config::MonitorConfig;

// Re-export commonly used types
pub use types::{
    SensorKind, SensorReading, StatusDescription, ThresholdTable, VesselHealthStatus, VesselStatusType,
};

// Re-export the engine entry points
pub use report::{summarize_incidents, VesselReport};
pub use status_engine::{evaluate_vessel_status, StalenessPolicy, StatusEngine};

// Re-export sweep components
pub use sweep::{AlarmSweep, NotificationDispatcher, SweepSummary};
pub use telemetry::{FleetDirectory, TelemetryError, TelemetryStore};
