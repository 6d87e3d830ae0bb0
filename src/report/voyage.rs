//! Distance and consumption over a reporting window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::incidents::summarize_incidents;
use crate::config::defaults::{EARTH_RADIUS_KM, GPS_JITTER_KM, KM_TO_NAUTICAL_MILES};
use crate::types::{SensorKind, SensorReading, StatusDescription, ThresholdTable, TimeRange, VesselLocation};

/// Report tuning, the `[report]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Legs shorter than this are GPS noise while moored (km).
    #[serde(default = "default_gps_jitter_km")]
    pub gps_jitter_km: f64,
}

fn default_gps_jitter_km() -> f64 {
    GPS_JITTER_KM
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            gps_jitter_km: default_gps_jitter_km(),
        }
    }
}

/// Great-circle distance between two fixes (km).
pub fn haversine_km(a: &VesselLocation, b: &VesselLocation) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance sailed through the fixes in time order, in nautical miles.
///
/// Legs at or below `jitter_km` are ignored.
pub fn distance_nm(locations: &[VesselLocation], jitter_km: f64) -> f64 {
    let mut sorted: Vec<&VesselLocation> = locations.iter().collect();
    sorted.sort_by_key(|l| l.timestamp);

    let km: f64 = sorted
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .filter(|leg| *leg > jitter_km)
        .sum();

    km * KM_TO_NAUTICAL_MILES
}

/// Drop in level for one tank kind between the first and last reading.
///
/// Zero with fewer than two readings or when the tank was refilled.
pub fn consumption(readings: &[SensorReading], kind: SensorKind) -> f64 {
    let mut relevant: Vec<&SensorReading> = readings.iter().filter(|r| r.kind == kind).collect();
    if relevant.len() < 2 {
        return 0.0;
    }
    relevant.sort_by_key(|r| r.time);

    match (relevant.first(), relevant.last()) {
        (Some(first), Some(last)) if first.value > last.value => first.value - last.value,
        _ => 0.0,
    }
}

/// Summary of one vessel over a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselReport {
    pub vessel_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub distance_nm: f64,
    pub fuel_consumption: f64,
    pub water_consumption: f64,
    pub alarm_history: Vec<StatusDescription>,
}

/// Build a report from raw history. Rows outside `range` are ignored.
pub fn build_vessel_report(
    vessel_name: &str,
    range: TimeRange,
    readings: &[SensorReading],
    locations: &[VesselLocation],
    thresholds: &ThresholdTable,
    settings: &ReportSettings,
) -> VesselReport {
    let readings: Vec<SensorReading> = readings
        .iter()
        .filter(|r| range.contains(r.time))
        .cloned()
        .collect();
    let locations: Vec<VesselLocation> = locations
        .iter()
        .filter(|l| range.contains(l.timestamp))
        .cloned()
        .collect();

    VesselReport {
        vessel_name: vessel_name.to_string(),
        start: range.start,
        end: range.end,
        distance_nm: distance_nm(&locations, settings.gps_jitter_km),
        fuel_consumption: consumption(&readings, SensorKind::Fuel),
        water_consumption: consumption(&readings, SensorKind::Water),
        alarm_history: summarize_incidents(&readings, thresholds),
    }
}
