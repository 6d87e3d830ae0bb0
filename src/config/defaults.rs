//! System-wide default constants.
//!
//! Grouped by subsystem. Threshold defaults live next to their structs in
//! `types::thresholds`; this file holds the operational knobs.

// ============================================================================
// Status Engine
// ============================================================================

/// Freshness budget for a reading (hours). Older data marks the vessel expired.
pub const DATA_MAX_AGE_HOURS: f64 = 12.0;

// ============================================================================
// Alarm Sweep
// ============================================================================

/// Interval between alarm sweeps (seconds). 3 600 = hourly.
pub const SWEEP_INTERVAL_SECS: u64 = 3_600;

/// Vessels evaluated concurrently within one sweep.
pub const SWEEP_MAX_CONCURRENT_VESSELS: usize = 8;

// ============================================================================
// Notifications
// ============================================================================

/// HTTP client timeout for webhook delivery (seconds).
pub const NOTIFICATION_HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Voyage Report
// ============================================================================

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Kilometres to nautical miles.
pub const KM_TO_NAUTICAL_MILES: f64 = 0.539_957;

/// Legs at or below this length are GPS drift, not movement (km). 50 m.
pub const GPS_JITTER_KM: f64 = 0.05;

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";
