//! Fold classified readings into one vessel status

use chrono::{DateTime, Utc};

use super::classifier::classify_reading;
use super::staleness::StalenessPolicy;
use crate::types::{SensorReading, StatusDescription, ThresholdTable, VesselHealthStatus, VesselStatusType};

/// Description used when a vessel reported nothing at all.
pub const NO_DATA_TEXT: &str = "No sensor data available";

/// Description appended when every reading is inside its normal band.
pub const NOMINAL_TEXT: &str = "Nominal";

/// Evaluate a vessel from its current readings.
///
/// Deterministic for a given `now`. Descriptions follow input order; the
/// list is never empty.
pub fn evaluate_vessel_status(
    readings: &[SensorReading],
    thresholds: &ThresholdTable,
    staleness: &StalenessPolicy,
    now: DateTime<Utc>,
) -> VesselHealthStatus {
    if readings.is_empty() {
        return VesselHealthStatus {
            status: VesselStatusType::Expired,
            description: vec![StatusDescription::new(NO_DATA_TEXT, VesselStatusType::Expired)],
        };
    }

    let mut status = VesselStatusType::Nominal;
    let mut description = Vec::new();

    for issue in readings
        .iter()
        .filter_map(|r| classify_reading(r, thresholds, staleness, now))
    {
        status = status.escalate(issue.status);
        description.push(issue);
    }

    if status == VesselStatusType::Nominal {
        description.push(StatusDescription::new(NOMINAL_TEXT, VesselStatusType::Nominal));
    }

    VesselHealthStatus { status, description }
}
