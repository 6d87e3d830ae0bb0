//! JSON snapshot store
//!
//! Backs both telemetry traits with one file of the form
//! `{ "vessels": [...], "readings": [...], "locations": [...] }`.
//! Used by the CLI and by tests; the whole snapshot is held in memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{FleetDirectory, TelemetryError, TelemetryStore};
use crate::types::{
    latest_per_sensor, InvalidReadingError, RawReading, SensorReading, TimeRange, VesselLocation,
    VesselRecord,
};

/// On-disk layout of a fleet snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(default)]
    pub vessels: Vec<VesselRecord>,
    #[serde(default)]
    pub readings: Vec<RawReading>,
    #[serde(default)]
    pub locations: Vec<VesselLocation>,
}

/// In-memory fleet built from a [`FleetSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct JsonFleetStore {
    vessels: Vec<VesselRecord>,
    readings: Vec<SensorReading>,
    locations: Vec<VesselLocation>,
}

impl JsonFleetStore {
    /// Read and ingest a snapshot file.
    pub fn load(path: &Path) -> Result<Self, TelemetryError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::Io(path.to_path_buf(), e))?;
        let snapshot: FleetSnapshot = serde_json::from_str(&contents)?;
        let store = Self::from_snapshot(snapshot);
        info!(
            path = %path.display(),
            vessels = store.vessels.len(),
            readings = store.readings.len(),
            "Loaded fleet snapshot"
        );
        Ok(store)
    }

    /// Ingest a snapshot. Rows that fail validation are logged and skipped.
    pub fn from_snapshot(snapshot: FleetSnapshot) -> Self {
        let readings = snapshot
            .readings
            .into_iter()
            .filter_map(|raw| {
                let vessel = raw.vessel_id.clone();
                match SensorReading::try_from(raw) {
                    Ok(reading) => Some(reading),
                    Err(InvalidReadingError::UnknownKind(kind)) => {
                        debug!(vessel = %vessel, kind = %kind, "Dropping reading of unknown kind");
                        None
                    }
                    Err(e) => {
                        warn!(vessel = %vessel, error = %e, "Skipping invalid reading");
                        None
                    }
                }
            })
            .collect();

        Self {
            vessels: snapshot.vessels,
            readings,
            locations: snapshot.locations,
        }
    }

    fn record(&self, short_id: &str) -> Result<&VesselRecord, TelemetryError> {
        self.vessels
            .iter()
            .find(|v| v.vessel.short_id == short_id)
            .ok_or_else(|| TelemetryError::NotFound(short_id.to_string()))
    }

    fn readings_for<'a>(&'a self, short_id: &'a str) -> impl Iterator<Item = &'a SensorReading> + 'a {
        self.readings.iter().filter(move |r| r.vessel_id == short_id)
    }
}

#[async_trait]
impl TelemetryStore for JsonFleetStore {
    async fn fetch_readings(
        &self,
        vessel_short_id: &str,
        user_id: &str,
    ) -> Result<Vec<SensorReading>, TelemetryError> {
        let record = self.record(vessel_short_id)?;
        if !record.is_authorized(user_id) {
            return Err(TelemetryError::PermissionDenied {
                vessel: vessel_short_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        let all: Vec<SensorReading> = self.readings_for(vessel_short_id).cloned().collect();
        Ok(latest_per_sensor(&all))
    }

    async fn fetch_history(
        &self,
        vessel_short_id: &str,
        range: TimeRange,
    ) -> Result<Vec<SensorReading>, TelemetryError> {
        self.record(vessel_short_id)?;
        let mut history: Vec<SensorReading> = self
            .readings_for(vessel_short_id)
            .filter(|r| range.contains(r.time))
            .cloned()
            .collect();
        history.sort_by_key(|r| r.time);
        Ok(history)
    }

    async fn fetch_locations(
        &self,
        vessel_short_id: &str,
        range: TimeRange,
    ) -> Result<Vec<VesselLocation>, TelemetryError> {
        self.record(vessel_short_id)?;
        let mut fixes: Vec<VesselLocation> = self
            .locations
            .iter()
            .filter(|l| l.vessel_id == vessel_short_id && range.contains(l.timestamp))
            .cloned()
            .collect();
        fixes.sort_by_key(|l| l.timestamp);
        Ok(fixes)
    }
}

#[async_trait]
impl FleetDirectory for JsonFleetStore {
    async fn list_vessels(&self) -> Result<Vec<VesselRecord>, TelemetryError> {
        Ok(self.vessels.clone())
    }
}
