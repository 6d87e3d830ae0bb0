//! Fleet overview cards
//!
//! One card per vessel the user can see. A card whose telemetry could not
//! be fetched is `Unavailable`, which is a different thing from a vessel
//! whose data is merely old (`expired`).

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::status_engine::StatusEngine;
use crate::telemetry::TelemetryStore;
use crate::types::{Vessel, VesselHealthStatus, VesselStatusType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CardStatus {
    Evaluated(VesselHealthStatus),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselCard {
    pub short_id: String,
    pub name: String,
    /// Time of the newest reading, if any
    pub last_seen: Option<DateTime<Utc>>,
    pub status: CardStatus,
}

impl VesselCard {
    pub fn status_type(&self) -> Option<VesselStatusType> {
        match &self.status {
            CardStatus::Evaluated(h) => Some(h.status),
            CardStatus::Unavailable { .. } => None,
        }
    }
}

/// Evaluate every vessel for `user_id`. Cards keep the order of `vessels`.
pub async fn fleet_overview(
    store: &dyn TelemetryStore,
    user_id: &str,
    vessels: &[Vessel],
    engine: &StatusEngine,
) -> Vec<VesselCard> {
    fleet_overview_at(store, user_id, vessels, engine, Utc::now()).await
}

pub async fn fleet_overview_at(
    store: &dyn TelemetryStore,
    user_id: &str,
    vessels: &[Vessel],
    engine: &StatusEngine,
    now: DateTime<Utc>,
) -> Vec<VesselCard> {
    join_all(vessels.iter().map(|vessel| async move {
        let (last_seen, status) = match store.fetch_readings(&vessel.short_id, user_id).await {
            Ok(readings) => (
                readings.iter().map(|r| r.time).max(),
                CardStatus::Evaluated(engine.evaluate_at(&readings, now)),
            ),
            Err(e) => {
                warn!(vessel = %vessel.name, error = %e, "Vessel telemetry unavailable");
                (None, CardStatus::Unavailable { reason: e.to_string() })
            }
        };
        VesselCard {
            short_id: vessel.short_id.clone(),
            name: vessel.name.clone(),
            last_seen,
            status,
        }
    }))
    .await
}

/// Card tallies for the overview header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub nominal: usize,
    pub expired: usize,
    pub warning: usize,
    pub alarm: usize,
    pub unavailable: usize,
}

impl StatusCounts {
    pub fn tally(cards: &[VesselCard]) -> Self {
        cards.iter().fold(Self::default(), |mut counts, card| {
            match card.status_type() {
                Some(VesselStatusType::Nominal) => counts.nominal += 1,
                Some(VesselStatusType::Expired) => counts.expired += 1,
                Some(VesselStatusType::Warning) => counts.warning += 1,
                Some(VesselStatusType::Alarm) => counts.alarm += 1,
                None => counts.unavailable += 1,
            }
            counts
        })
    }
}
