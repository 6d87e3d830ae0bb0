//! Alarm Sweep Integration Tests
//!
//! Drives `AlarmSweep` against in-memory stores and recording dispatchers:
//! per-vessel isolation, summary accounting and dispatch-once semantics.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use seazr::config::SweepConfig;
use seazr::status_engine::StatusEngine;
use seazr::sweep::{AlarmSweep, DispatchError, DispatchOutcome, NotificationDispatcher, VesselAlert};
use seazr::telemetry::{FleetDirectory, FleetSnapshot, JsonFleetStore, TelemetryError, TelemetryStore};
use seazr::types::{
    AccessLevel, NotificationPreferences, Permission, RawReading, SensorReading, TimeRange, Vessel,
    VesselLocation, VesselRecord,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

fn permission(user_id: &str, email: Option<&str>) -> Permission {
    Permission {
        user_id: user_id.to_string(),
        email: email.map(str::to_string),
        level: AccessLevel::Owner,
        preferences: NotificationPreferences::default(),
    }
}

fn record(short_id: &str, name: &str, permissions: Vec<Permission>) -> VesselRecord {
    VesselRecord {
        vessel: Vessel {
            id: format!("id-{short_id}"),
            short_id: short_id.to_string(),
            name: name.to_string(),
            description: None,
        },
        permissions,
    }
}

fn raw(vessel: &str, sensor_type: &str, value: f64) -> RawReading {
    RawReading {
        sensor_type: sensor_type.to_string(),
        value,
        time: now().to_rfc3339(),
        vessel_id: vessel.to_string(),
        sensor_id: None,
    }
}

/// Four vessels: two in alarm, one healthy, one nobody can see.
fn fleet() -> (Vec<VesselRecord>, JsonFleetStore) {
    let vessels = vec![
        record("ALPHA", "Alpha", vec![permission("u1", Some("u1@example.com")), permission("u2", None)]),
        record("BRAVO", "Bravo", vec![permission("u3", Some("u3@example.com"))]),
        record("CHARLIE", "Charlie", vec![]),
        record("DELTA", "Delta", vec![permission("u4", Some("u4@example.com"))]),
    ];
    let readings = vec![
        raw("ALPHA", "Bilge", 1.0),
        raw("ALPHA", "Battery", 12.6),
        raw("BRAVO", "Battery", 12.7),
        raw("CHARLIE", "Bilge", 1.0),
        raw("DELTA", "Battery", 11.0),
        raw("DELTA", "Fuel", 15.0),
    ];
    let store = JsonFleetStore::from_snapshot(FleetSnapshot {
        vessels: vessels.clone(),
        readings,
        locations: Vec::new(),
    });
    (vessels, store)
}

/// Records every alert and answers with a fixed result.
struct RecordingDispatcher {
    alerts: Mutex<Vec<VesselAlert>>,
    reply: fn(&VesselAlert) -> Result<DispatchOutcome, DispatchError>,
}

impl RecordingDispatcher {
    fn new(reply: fn(&VesselAlert) -> Result<DispatchOutcome, DispatchError>) -> Arc<Self> {
        Arc::new(Self {
            alerts: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn delivered() -> Arc<Self> {
        Self::new(|alert| {
            Ok(DispatchOutcome {
                success: true,
                notifications_sent: u32::try_from(alert.recipients.len()).unwrap(),
                emails_sent: 1,
            })
        })
    }

    fn alerts(&self) -> Vec<VesselAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, alert: &VesselAlert) -> Result<DispatchOutcome, DispatchError> {
        self.alerts.lock().unwrap().push(alert.clone());
        (self.reply)(alert)
    }

    fn dispatcher_name(&self) -> &'static str {
        "recording"
    }
}

/// Wraps a store and fails every fetch for one vessel.
struct FlakyStore {
    inner: JsonFleetStore,
    broken: &'static str,
}

#[async_trait]
impl TelemetryStore for FlakyStore {
    async fn fetch_readings(&self, vessel: &str, user_id: &str) -> Result<Vec<SensorReading>, TelemetryError> {
        if vessel == self.broken {
            return Err(TelemetryError::Unavailable("connection reset".to_string()));
        }
        self.inner.fetch_readings(vessel, user_id).await
    }

    async fn fetch_history(&self, vessel: &str, range: TimeRange) -> Result<Vec<SensorReading>, TelemetryError> {
        self.inner.fetch_history(vessel, range).await
    }

    async fn fetch_locations(&self, vessel: &str, range: TimeRange) -> Result<Vec<VesselLocation>, TelemetryError> {
        self.inner.fetch_locations(vessel, range).await
    }
}

/// Store that answers the first vessel last.
struct SlowFirstStore {
    inner: JsonFleetStore,
    slow: &'static str,
}

#[async_trait]
impl TelemetryStore for SlowFirstStore {
    async fn fetch_readings(&self, vessel: &str, user_id: &str) -> Result<Vec<SensorReading>, TelemetryError> {
        if vessel == self.slow {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        self.inner.fetch_readings(vessel, user_id).await
    }

    async fn fetch_history(&self, vessel: &str, range: TimeRange) -> Result<Vec<SensorReading>, TelemetryError> {
        self.inner.fetch_history(vessel, range).await
    }

    async fn fetch_locations(&self, vessel: &str, range: TimeRange) -> Result<Vec<VesselLocation>, TelemetryError> {
        self.inner.fetch_locations(vessel, range).await
    }
}

struct BrokenDirectory;

#[async_trait]
impl FleetDirectory for BrokenDirectory {
    async fn list_vessels(&self) -> Result<Vec<VesselRecord>, TelemetryError> {
        Err(TelemetryError::Unavailable("directory offline".to_string()))
    }
}

fn sweep_with(
    store: Arc<dyn TelemetryStore>,
    directory: Arc<dyn FleetDirectory>,
    dispatcher: Arc<dyn NotificationDispatcher>,
) -> AlarmSweep {
    AlarmSweep::new(store, directory, dispatcher, StatusEngine::default(), &SweepConfig::default())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn sweep_alerts_each_alarm_vessel_once() {
    let (vessels, store) = fleet();
    let store = Arc::new(store);
    let dispatcher = RecordingDispatcher::delivered();
    let sweep = sweep_with(store.clone(), store, dispatcher.clone());

    let summary = sweep.sweep_vessels(&vessels, now()).await;

    assert_eq!(summary.alarms_found, 2);
    assert_eq!(summary.vessels_with_alarms, vec!["Alpha".to_string(), "Delta".to_string()]);
    assert_eq!(summary.vessels_skipped, 1);
    assert_eq!(summary.vessels_failed, 0);
    assert_eq!(summary.notifications_sent, 3);
    assert_eq!(summary.emails_sent, 2);
    assert_eq!(summary.timestamp, now());

    let alerts = dispatcher.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].title, "🚨 Vessel Alert: Alpha");
    assert_eq!(alerts[0].body, "Critical issues detected: Water detected in bilge");
    assert_eq!(alerts[0].recipients.len(), 2);
    // Fuel warning is not part of the alarm body
    assert_eq!(alerts[1].body, "Critical issues detected: Low Battery: 11V");
}

#[tokio::test]
async fn unsuccessful_dispatch_counts_alarm_but_not_deliveries() {
    let (vessels, store) = fleet();
    let store = Arc::new(store);
    let dispatcher = RecordingDispatcher::new(|_| Ok(DispatchOutcome::default()));
    let sweep = sweep_with(store.clone(), store, dispatcher);

    let summary = sweep.sweep_vessels(&vessels, now()).await;

    assert_eq!(summary.alarms_found, 2);
    assert_eq!(summary.notifications_sent, 0);
    assert_eq!(summary.emails_sent, 0);
    assert_eq!(summary.vessels_failed, 0);
}

#[tokio::test]
async fn dispatch_error_is_isolated_to_its_vessel() {
    let (vessels, store) = fleet();
    let store = Arc::new(store);
    let dispatcher = RecordingDispatcher::new(|alert| {
        if alert.vessel_name == "Alpha" {
            Err(DispatchError::Rejected(reqwest::StatusCode::BAD_GATEWAY))
        } else {
            Ok(DispatchOutcome {
                success: true,
                notifications_sent: 1,
                emails_sent: 1,
            })
        }
    });
    let sweep = sweep_with(store.clone(), store, dispatcher.clone());

    let summary = sweep.sweep_vessels(&vessels, now()).await;

    assert_eq!(summary.alarms_found, 2);
    assert_eq!(summary.vessels_with_alarms, vec!["Alpha".to_string(), "Delta".to_string()]);
    assert_eq!(summary.vessels_failed, 1);
    assert_eq!(summary.notifications_sent, 1);
    assert_eq!(dispatcher.alerts().len(), 2);
}

#[tokio::test]
async fn fetch_failure_skips_vessel_and_continues() {
    let (vessels, inner) = fleet();
    let store = Arc::new(FlakyStore { inner: inner.clone(), broken: "ALPHA" });
    let dispatcher = RecordingDispatcher::delivered();
    let sweep = sweep_with(store, Arc::new(inner), dispatcher.clone());

    let summary = sweep.sweep_vessels(&vessels, now()).await;

    assert_eq!(summary.vessels_failed, 1);
    assert_eq!(summary.alarms_found, 1);
    assert_eq!(summary.vessels_with_alarms, vec!["Delta".to_string()]);
    assert_eq!(dispatcher.alerts().len(), 1);
}

#[tokio::test]
async fn results_keep_directory_order_under_concurrency() {
    let (vessels, inner) = fleet();
    let store = Arc::new(SlowFirstStore { inner: inner.clone(), slow: "ALPHA" });
    let sweep = sweep_with(store, Arc::new(inner), RecordingDispatcher::delivered());

    let summary = sweep.sweep_vessels(&vessels, now()).await;
    assert_eq!(summary.vessels_with_alarms, vec!["Alpha".to_string(), "Delta".to_string()]);
}

#[tokio::test]
async fn stale_fleet_raises_no_alarms() {
    let (vessels, store) = fleet();
    let store = Arc::new(store);
    let dispatcher = RecordingDispatcher::delivered();
    let sweep = sweep_with(store.clone(), store, dispatcher.clone());

    let summary = sweep.sweep_vessels(&vessels, now() + Duration::days(2)).await;

    assert_eq!(summary.alarms_found, 0);
    assert!(summary.vessels_with_alarms.is_empty());
    assert!(dispatcher.alerts().is_empty());
}

#[tokio::test]
async fn directory_failure_fails_the_sweep() {
    let (_, store) = fleet();
    let dispatcher = RecordingDispatcher::delivered();
    let sweep = sweep_with(Arc::new(store), Arc::new(BrokenDirectory), dispatcher.clone());

    let result = sweep.run_once().await;

    assert!(matches!(result, Err(TelemetryError::Unavailable(_))));
    assert!(dispatcher.alerts().is_empty());
}

#[test]
fn summary_serializes_camel_case() {
    let (vessels, store) = fleet();
    let store = Arc::new(store);
    let sweep = sweep_with(store.clone(), store, RecordingDispatcher::delivered());

    let summary = tokio_test::block_on(sweep.sweep_vessels(&vessels, now()));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["alarmsFound"], 2);
    assert_eq!(json["notificationsSent"], 3);
    assert_eq!(json["emailsSent"], 2);
    assert_eq!(json["vesselsWithAlarms"], serde_json::json!(["Alpha", "Delta"]));
    assert!(json["timestamp"].is_string());
}
