//! Incident history for reports
//!
//! Unlike live evaluation, which reports the current state only, this scans
//! a historical window and lists each kind of incident at most once, using
//! the most recent reading that shows it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::status_engine::{assess, Breach, Direction};
use crate::types::VesselStatusType::{Alarm, Warning};
use crate::types::{SensorKind, SensorReading, StatusDescription, ThresholdTable, VesselStatusType};

/// Kinds are reported in this order.
const SUMMARY_ORDER: [SensorKind; 6] = [
    SensorKind::Battery,
    SensorKind::Bilge,
    SensorKind::Water,
    SensorKind::Fuel,
    SensorKind::Humidity,
    SensorKind::Temperature,
];

/// One reportable incident type for a kind.
struct IncidentRule {
    signature: &'static str,
    status: VesselStatusType,
    /// `None` matches either side of the band
    direction: Option<Direction>,
    label: &'static str,
    show_value: bool,
}

impl IncidentRule {
    const fn new(
        signature: &'static str,
        status: VesselStatusType,
        direction: Option<Direction>,
        label: &'static str,
    ) -> Self {
        Self { signature, status, direction, label, show_value: true }
    }

    fn matches(&self, breach: Option<Breach>) -> bool {
        breach.is_some_and(|b| {
            b.status == self.status && self.direction.map_or(true, |d| d == b.direction)
        })
    }

    fn describe(&self, reading: &SensorReading) -> StatusDescription {
        let at = format_report_time(reading.time);
        let text = if self.show_value {
            format!("{}: {} - at {at}", self.label, reading.display_value())
        } else {
            format!("{} - at {at}", self.label)
        };
        StatusDescription::new(text, self.status)
    }
}

const BATTERY_RULES: &[IncidentRule] = &[
    IncidentRule::new("battery-critical", Alarm, None, "Critical Battery Level"),
    IncidentRule::new("battery-low", Warning, None, "Low Battery Warning"),
];

const BILGE_RULES: &[IncidentRule] = &[IncidentRule {
    signature: "bilge-water",
    status: Alarm,
    direction: None,
    label: "Water detected in bilge",
    show_value: false,
}];

const WATER_RULES: &[IncidentRule] = &[
    IncidentRule::new("water-critical", Alarm, None, "Critical water level"),
    IncidentRule::new("water-elevated", Warning, None, "Elevated water level"),
];

const FUEL_RULES: &[IncidentRule] = &[
    IncidentRule::new("fuel-critical", Alarm, None, "Fuel critically low"),
    IncidentRule::new("fuel-low", Warning, None, "Fuel low"),
];

const HUMIDITY_RULES: &[IncidentRule] = &[
    IncidentRule::new("humidity-critical", Alarm, None, "Humidity critical"),
    IncidentRule::new("humidity-high", Warning, None, "High Humidity"),
];

const TEMPERATURE_RULES: &[IncidentRule] = &[
    IncidentRule::new("temperature-critical-high", Alarm, Some(Direction::High), "Temperature critically high"),
    IncidentRule::new("temperature-critical-low", Alarm, Some(Direction::Low), "Temperature critically low"),
    IncidentRule::new("temperature-warning-high", Warning, Some(Direction::High), "Temperature high"),
    IncidentRule::new("temperature-warning-low", Warning, Some(Direction::Low), "Temperature low"),
];

/// Rules tried in order for a kind; the first one that matches wins.
const fn rules_for(kind: SensorKind) -> &'static [IncidentRule] {
    match kind {
        SensorKind::Battery => BATTERY_RULES,
        SensorKind::Bilge => BILGE_RULES,
        SensorKind::Water => WATER_RULES,
        SensorKind::Fuel => FUEL_RULES,
        SensorKind::Humidity => HUMIDITY_RULES,
        SensorKind::Temperature => TEMPERATURE_RULES,
        SensorKind::Pressure | SensorKind::Wind => &[],
    }
}

/// Report timestamp, e.g. `1. 6. 2025. 10:00:00` (UTC).
pub fn format_report_time(t: DateTime<Utc>) -> String {
    t.format("%-d. %-m. %Y. %H:%M:%S").to_string()
}

/// Build a non-repeating incident list from historical readings.
///
/// Readings are grouped by kind and scanned most recent first. Each
/// signature (kind + severity tier, e.g. `battery-critical`) appears at
/// most once. Staleness does not apply to history.
pub fn summarize_incidents(readings: &[SensorReading], thresholds: &ThresholdTable) -> Vec<StatusDescription> {
    let mut by_kind: HashMap<SensorKind, Vec<&SensorReading>> = HashMap::new();
    for reading in readings {
        by_kind.entry(reading.kind).or_default().push(reading);
    }

    let mut registry: HashSet<&'static str> = HashSet::new();
    let mut incidents = Vec::new();

    for kind in SUMMARY_ORDER {
        let Some(group) = by_kind.get_mut(&kind) else {
            continue;
        };
        group.sort_by(|a, b| b.time.cmp(&a.time));

        let comparator = thresholds.comparator(kind);
        for rule in rules_for(kind) {
            if registry.contains(rule.signature) {
                continue;
            }
            let hit = group.iter().find(|r| rule.matches(assess(comparator, r.value)));
            if let Some(reading) = hit {
                incidents.push(rule.describe(reading));
                registry.insert(rule.signature);
                break;
            }
        }
    }

    incidents
}
