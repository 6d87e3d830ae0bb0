//! Alarm Sweep
//!
//! Evaluates every vessel in the fleet and dispatches one alert per vessel
//! in alarm. Vessels are isolated from each other: a fetch or delivery
//! failure is logged, counted and the sweep moves on.
//!
//! - [`AlarmSweep::run_once`]: one pass over the directory
//! - [`run_scheduler`]: repeats passes on an interval until cancelled

mod dispatcher;
mod scheduler;

pub use dispatcher::{
    DispatchError, DispatchOutcome, LogDispatcher, NotificationDispatcher, Recipient, VesselAlert,
    WebhookDispatcher,
};
pub use scheduler::run_scheduler;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::SweepConfig;
use crate::status_engine::StatusEngine;
use crate::telemetry::{FleetDirectory, TelemetryError, TelemetryStore};
use crate::types::{VesselHealthStatus, VesselRecord, VesselStatusType};

/// Totals for one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub alarms_found: u32,
    pub notifications_sent: u32,
    pub emails_sent: u32,
    /// Names of vessels in alarm, in directory order
    pub vessels_with_alarms: Vec<String>,
    pub vessels_skipped: u32,
    pub vessels_failed: u32,
    pub timestamp: DateTime<Utc>,
}

impl SweepSummary {
    fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            alarms_found: 0,
            notifications_sent: 0,
            emails_sent: 0,
            vessels_with_alarms: Vec::new(),
            vessels_skipped: 0,
            vessels_failed: 0,
            timestamp,
        }
    }
}

/// Result of checking a single vessel.
enum VesselOutcome {
    Skipped,
    Clear,
    FetchFailed,
    Alarm {
        vessel_name: String,
        delivery: Result<DispatchOutcome, DispatchError>,
    },
}

/// Title and body for an alarm vessel.
pub fn alert_text(vessel_name: &str, health: &VesselHealthStatus) -> (String, String) {
    let alarms = health.texts_with(VesselStatusType::Alarm).join(", ");
    (
        format!("🚨 Vessel Alert: {vessel_name}"),
        format!("Critical issues detected: {alarms}"),
    )
}

/// Everything a sweep needs, shareable across tasks.
pub struct AlarmSweep {
    store: Arc<dyn TelemetryStore>,
    directory: Arc<dyn FleetDirectory>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    engine: StatusEngine,
    max_concurrent: usize,
}

impl AlarmSweep {
    pub fn new(
        store: Arc<dyn TelemetryStore>,
        directory: Arc<dyn FleetDirectory>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        engine: StatusEngine,
        config: &SweepConfig,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            engine,
            max_concurrent: config.max_concurrent_vessels.max(1),
        }
    }

    /// One pass over every vessel in the directory.
    ///
    /// Only a directory failure fails the sweep as a whole.
    pub async fn run_once(&self) -> Result<SweepSummary, TelemetryError> {
        info!(dispatcher = self.dispatcher.dispatcher_name(), "Starting vessel alarm check");
        let vessels = self.directory.list_vessels().await?;
        let summary = self.sweep_vessels(&vessels, Utc::now()).await;

        info!(
            alarms = summary.alarms_found,
            push = summary.notifications_sent,
            email = summary.emails_sent,
            skipped = summary.vessels_skipped,
            failed = summary.vessels_failed,
            "Vessel alarm check completed"
        );
        if !summary.vessels_with_alarms.is_empty() {
            info!(vessels = %summary.vessels_with_alarms.join(", "), "Vessels with alarms");
        }
        Ok(summary)
    }

    /// Sweep an explicit vessel list, evaluating freshness against `now`.
    pub async fn sweep_vessels(&self, vessels: &[VesselRecord], now: DateTime<Utc>) -> SweepSummary {
        let outcomes: Vec<VesselOutcome> = stream::iter(vessels.iter().cloned())
            .map(|record| self.check_vessel(record, now))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut summary = SweepSummary::empty(now);
        for outcome in outcomes {
            match outcome {
                VesselOutcome::Skipped => summary.vessels_skipped += 1,
                VesselOutcome::Clear => {}
                VesselOutcome::FetchFailed => summary.vessels_failed += 1,
                VesselOutcome::Alarm { vessel_name, delivery } => {
                    summary.alarms_found += 1;
                    summary.vessels_with_alarms.push(vessel_name);
                    match delivery {
                        Ok(o) if o.success => {
                            summary.notifications_sent += o.notifications_sent;
                            summary.emails_sent += o.emails_sent;
                        }
                        Ok(_) => {}
                        Err(_) => summary.vessels_failed += 1,
                    }
                }
            }
        }
        summary
    }

    async fn check_vessel(&self, record: VesselRecord, now: DateTime<Utc>) -> VesselOutcome {
        let vessel = &record.vessel;
        let Some(user_id) = record.representative_user() else {
            info!(vessel = %vessel.name, "Skipping vessel with no authorized users");
            return VesselOutcome::Skipped;
        };

        let readings = match self.store.fetch_readings(&vessel.short_id, user_id).await {
            Ok(r) => r,
            Err(e) => {
                warn!(vessel = %vessel.name, error = %e, "Failed to fetch readings");
                return VesselOutcome::FetchFailed;
            }
        };

        let health = self.engine.evaluate_at(&readings, now);
        if health.status != VesselStatusType::Alarm {
            debug!(vessel = %vessel.name, status = %health.status, "Vessel not in alarm");
            return VesselOutcome::Clear;
        }

        let (title, body) = alert_text(&vessel.name, &health);
        let alert = VesselAlert {
            vessel_id: vessel.id.clone(),
            vessel_name: vessel.name.clone(),
            title,
            body,
            recipients: record.permissions.iter().map(Recipient::from).collect(),
        };

        let delivery = self.dispatcher.dispatch(&alert).await;
        match &delivery {
            Ok(o) if o.success => info!(
                vessel = %vessel.name,
                push = o.notifications_sent,
                email = o.emails_sent,
                "Alert dispatched"
            ),
            Ok(_) => info!(vessel = %vessel.name, "No notifications sent"),
            Err(e) => error!(vessel = %vessel.name, error = %e, "Alert dispatch failed"),
        }

        VesselOutcome::Alarm {
            vessel_name: vessel.name.clone(),
            delivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusDescription;

    #[test]
    fn test_alert_text_joins_alarm_descriptions_only() {
        let health = VesselHealthStatus {
            status: VesselStatusType::Alarm,
            description: vec![
                StatusDescription::new("Fuel low: 15L", VesselStatusType::Warning),
                StatusDescription::new("Low Battery: 11V", VesselStatusType::Alarm),
                StatusDescription::new("Water detected in bilge", VesselStatusType::Alarm),
            ],
        };
        let (title, body) = alert_text("Morska Vila", &health);
        assert_eq!(title, "🚨 Vessel Alert: Morska Vila");
        assert_eq!(body, "Critical issues detected: Low Battery: 11V, Water detected in bilge");
    }
}
