//! Vessel health status and its severity ordering

use serde::{Deserialize, Serialize};

/// Severity of a vessel or of a single issue.
///
/// Declaration order is the display ranking used for worst-first sorting:
/// `Nominal < Expired < Warning < Alarm`. Aggregation does not use `max`;
/// see [`VesselStatusType::escalate`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VesselStatusType {
    #[default]
    Nominal,
    /// Data is stale or missing, so the real state is unknown
    Expired,
    Warning,
    Alarm,
}

impl VesselStatusType {
    /// Fold one more issue severity into the running vessel status.
    ///
    /// `Alarm` always wins. While the vessel is still `Nominal` the next
    /// severity is adopted as-is. Once `Warning` or `Expired` is set it is
    /// kept until an `Alarm` arrives: an expired reading never replaces a
    /// warning, and a warning never replaces an expired status.
    #[must_use]
    pub fn escalate(self, next: VesselStatusType) -> VesselStatusType {
        match (self, next) {
            (_, VesselStatusType::Alarm) => VesselStatusType::Alarm,
            (VesselStatusType::Nominal, next) => next,
            (current, _) => current,
        }
    }
}

impl std::fmt::Display for VesselStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VesselStatusType::Nominal => write!(f, "NOMINAL"),
            VesselStatusType::Expired => write!(f, "EXPIRED"),
            VesselStatusType::Warning => write!(f, "WARNING"),
            VesselStatusType::Alarm => write!(f, "ALARM"),
        }
    }
}

/// Human-readable issue tagged with its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDescription {
    pub text: String,
    pub status: VesselStatusType,
}

impl StatusDescription {
    pub fn new(text: impl Into<String>, status: VesselStatusType) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }
}

/// Overall vessel status plus the issues that produced it.
///
/// `description` follows input reading order and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselHealthStatus {
    pub status: VesselStatusType,
    pub description: Vec<StatusDescription>,
}

impl VesselHealthStatus {
    /// Issue texts at exactly the given severity, in evaluation order.
    pub fn texts_with(&self, status: VesselStatusType) -> Vec<&str> {
        self.description
            .iter()
            .filter(|d| d.status == status)
            .map(|d| d.text.as_str())
            .collect()
    }

    /// Descriptions sorted worst first. Stable, so equal severities keep
    /// evaluation order.
    pub fn sorted_worst_first(&self) -> Vec<StatusDescription> {
        let mut sorted = self.description.clone();
        sorted.sort_by(|a, b| b.status.cmp(&a.status));
        sorted
    }
}
