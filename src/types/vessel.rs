//! Vessels, their authorized users, and GPS fixes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub id: String,
    /// Identifier used by the telemetry store
    pub short_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Access level a user holds on a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Owner,
    Editor,
    #[default]
    Viewer,
}

/// Per-user delivery channels. Both default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub push_notifications: bool,
    #[serde(default = "enabled")]
    pub email_notifications: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push_notifications: true,
            email_notifications: true,
        }
    }
}

/// A user's authorization on one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub level: AccessLevel,
    #[serde(default)]
    pub preferences: NotificationPreferences,
}

/// Vessel together with everyone authorized to see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    #[serde(flatten)]
    pub vessel: Vessel,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl VesselRecord {
    /// User whose view of the telemetry represents the vessel in sweeps.
    /// All authorized users see the same sensor data.
    pub fn representative_user(&self) -> Option<&str> {
        self.permissions.first().map(|p| p.user_id.as_str())
    }

    pub fn is_authorized(&self, user_id: &str) -> bool {
        self.permissions.iter().any(|p| p.user_id == user_id)
    }
}

/// One GPS fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselLocation {
    pub vessel_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }
}
