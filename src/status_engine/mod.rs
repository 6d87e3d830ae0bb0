//! Vessel health-status engine
//!
//! Pure classification of sensor readings into a ranked vessel status:
//!
//! - **Staleness**: readings older than the freshness budget become `expired`
//! - **Classifier**: one reading against its threshold-table entry
//! - **Aggregator**: folds per-reading issues into one status
//!
//! Everything here is synchronous and side-effect free. The dashboard,
//! alarm sweeps and reports all go through [`StatusEngine`] so they agree
//! on what a vessel's status is.

pub mod aggregator;
pub mod classifier;
pub mod staleness;

pub use aggregator::{evaluate_vessel_status, NOMINAL_TEXT, NO_DATA_TEXT};
pub use classifier::{assess, classify_reading, Breach, Direction};
pub use staleness::{is_stale, StalenessPolicy};

use chrono::{DateTime, Utc};

use crate::config::MonitorConfig;
use crate::report::summarize_incidents;
use crate::types::{SensorReading, StatusDescription, ThresholdTable, VesselHealthStatus};

/// Threshold table and freshness budget bundled for repeated evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEngine {
    thresholds: ThresholdTable,
    staleness: StalenessPolicy,
}

impl StatusEngine {
    pub const fn new(thresholds: ThresholdTable, staleness: StalenessPolicy) -> Self {
        Self { thresholds, staleness }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.thresholds.clone(), config.staleness)
    }

    pub const fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub const fn staleness(&self) -> &StalenessPolicy {
        &self.staleness
    }

    /// Evaluate against the wall clock.
    pub fn evaluate(&self, readings: &[SensorReading]) -> VesselHealthStatus {
        self.evaluate_at(readings, Utc::now())
    }

    pub fn evaluate_at(&self, readings: &[SensorReading], now: DateTime<Utc>) -> VesselHealthStatus {
        evaluate_vessel_status(readings, &self.thresholds, &self.staleness, now)
    }

    /// Deduplicated incident history for a reporting window.
    pub fn summarize(&self, readings: &[SensorReading]) -> Vec<StatusDescription> {
        summarize_incidents(readings, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SensorKind, VesselStatusType};

    #[test]
    fn test_engine_uses_its_own_thresholds() {
        let mut thresholds = ThresholdTable::default();
        thresholds.bilge.threshold = 2.0;
        let engine = StatusEngine::new(thresholds, StalenessPolicy::default());

        let now = Utc::now();
        let readings = vec![SensorReading::new(SensorKind::Bilge, 1.0, now, "SEA-1")];
        assert_eq!(engine.evaluate_at(&readings, now).status, VesselStatusType::Nominal);
        assert_eq!(
            StatusEngine::default().evaluate_at(&readings, now).status,
            VesselStatusType::Alarm
        );
    }

    #[test]
    fn test_from_config_copies_sections() {
        let mut config = MonitorConfig::default();
        config.staleness.max_age_hours = 6.0;
        config.thresholds.fuel.warning = 30.0;
        let engine = StatusEngine::from_config(&config);
        assert_eq!(engine.staleness().max_age_hours, 6.0);
        assert_eq!(engine.thresholds().fuel.warning, 30.0);
    }
}
