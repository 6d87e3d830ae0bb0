//! Alert delivery
//!
//! The sweep hands each alarm vessel to a [`NotificationDispatcher`] exactly
//! once. Transport details (push services, mail) live behind the webhook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::types::{NotificationPreferences, Permission};

/// Someone to be told about a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub preferences: NotificationPreferences,
}

impl From<&Permission> for Recipient {
    fn from(p: &Permission) -> Self {
        Self {
            user_id: p.user_id.clone(),
            email: p.email.clone(),
            preferences: p.preferences,
        }
    }
}

impl Recipient {
    fn wants_push(&self) -> bool {
        self.preferences.push_notifications
    }

    fn wants_email(&self) -> bool {
        self.preferences.email_notifications && self.email.is_some()
    }
}

/// One alert for one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselAlert {
    pub vessel_id: String,
    pub vessel_name: String,
    pub title: String,
    pub body: String,
    pub recipients: Vec<Recipient>,
}

impl VesselAlert {
    /// Push and email counts this alert would produce if fully delivered.
    fn delivery_counts(&self) -> (u32, u32) {
        let push = self.recipients.iter().filter(|r| r.wants_push()).count();
        let email = self.recipients.iter().filter(|r| r.wants_email()).count();
        (
            u32::try_from(push).unwrap_or(u32::MAX),
            u32::try_from(email).unwrap_or(u32::MAX),
        )
    }
}

/// What a dispatcher reports back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub success: bool,
    pub notifications_sent: u32,
    pub emails_sent: u32,
}

impl DispatchOutcome {
    fn delivered(alert: &VesselAlert) -> Self {
        let (notifications_sent, emails_sent) = alert.delivery_counts();
        Self {
            success: true,
            notifications_sent,
            emails_sent,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Notification endpoint returned status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Delivers a vessel alert.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, alert: &VesselAlert) -> Result<DispatchOutcome, DispatchError>;

    /// Name for logging
    fn dispatcher_name(&self) -> &'static str;
}

// ============================================================================
// Log Dispatcher
// ============================================================================

/// Writes alerts to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, alert: &VesselAlert) -> Result<DispatchOutcome, DispatchError> {
        let outcome = DispatchOutcome::delivered(alert);
        info!(
            vessel = %alert.vessel_name,
            title = %alert.title,
            body = %alert.body,
            push = outcome.notifications_sent,
            email = outcome.emails_sent,
            "Vessel alert"
        );
        Ok(outcome)
    }

    fn dispatcher_name(&self) -> &'static str {
        "log"
    }
}

// ============================================================================
// Webhook Dispatcher
// ============================================================================

/// POSTs the alert as JSON to a fan-out service.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    http: reqwest::Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn dispatch(&self, alert: &VesselAlert) -> Result<DispatchOutcome, DispatchError> {
        let resp = self.http.post(&self.url).json(alert).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(vessel = %alert.vessel_name, status = %status, "Webhook rejected alert");
            return Err(DispatchError::Rejected(status));
        }
        Ok(DispatchOutcome::delivered(alert))
    }

    fn dispatcher_name(&self) -> &'static str {
        "webhook"
    }
}
