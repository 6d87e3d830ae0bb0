//! Per-reading classification against the threshold table

use chrono::{DateTime, Utc};

use super::staleness::StalenessPolicy;
use crate::types::{
    Comparator, HighIsBad, LowIsBad, Presence, RangeBand, SensorKind, SensorReading, StatusDescription,
    ThresholdTable, VesselStatusType,
};

/// Which side of the normal band a value left through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
}

/// A value outside its normal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breach {
    /// `Warning` or `Alarm`
    pub status: VesselStatusType,
    pub direction: Direction,
}

impl Breach {
    const fn alarm(direction: Direction) -> Self {
        Self { status: VesselStatusType::Alarm, direction }
    }

    const fn warning(direction: Direction) -> Self {
        Self { status: VesselStatusType::Warning, direction }
    }
}

/// Compare a raw value against a comparator. Boundaries are inclusive
/// except for presence signals, which must strictly exceed the threshold.
pub fn assess(comparator: Comparator, value: f64) -> Option<Breach> {
    match comparator {
        Comparator::LowIsBad(LowIsBad { warning, alarm }) => {
            if value <= alarm {
                Some(Breach::alarm(Direction::Low))
            } else if value <= warning {
                Some(Breach::warning(Direction::Low))
            } else {
                None
            }
        }
        Comparator::HighIsBad(HighIsBad { warning, alarm }) => {
            if value >= alarm {
                Some(Breach::alarm(Direction::High))
            } else if value >= warning {
                Some(Breach::warning(Direction::High))
            } else {
                None
            }
        }
        Comparator::Range(RangeBand { warning_low, warning_high, alarm_low, alarm_high }) => {
            if value <= alarm_low {
                Some(Breach::alarm(Direction::Low))
            } else if value >= alarm_high {
                Some(Breach::alarm(Direction::High))
            } else if value <= warning_low {
                Some(Breach::warning(Direction::Low))
            } else if value >= warning_high {
                Some(Breach::warning(Direction::High))
            } else {
                None
            }
        }
        Comparator::Presence(Presence { threshold }) => {
            (value > threshold).then_some(Breach::alarm(Direction::High))
        }
        Comparator::Informational => None,
    }
}

/// Issue text for a breached reading.
fn describe(reading: &SensorReading, breach: Breach) -> String {
    let v = reading.display_value();
    let alarm = breach.status == VesselStatusType::Alarm;
    match reading.kind {
        SensorKind::Battery if alarm => format!("Low Battery: {v}"),
        SensorKind::Battery => format!("Battery is low: {v}"),
        SensorKind::Temperature if alarm => format!("Temperature critical: {v}"),
        SensorKind::Temperature => format!("Temperature abnormal: {v}"),
        SensorKind::Water if alarm => format!("Water level critical: {v}"),
        SensorKind::Water => format!("Water level elevated: {v}"),
        SensorKind::Fuel if alarm => format!("Fuel critically low: {v}"),
        SensorKind::Fuel => format!("Fuel low: {v}"),
        SensorKind::Humidity if alarm => format!("Humidity critical: {v}"),
        SensorKind::Humidity => format!("High Humidity: {v}"),
        SensorKind::Bilge => "Water detected in bilge".to_string(),
        // Informational kinds never breach; keep the text generic if a
        // custom comparator is ever attached to them.
        SensorKind::Pressure | SensorKind::Wind => format!("{} out of range: {v}", reading.kind),
    }
}

/// Classify one reading. Returns `None` for readings inside their normal
/// band and for informational kinds.
///
/// A stale reading yields an expired description and its value is not
/// inspected.
pub fn classify_reading(
    reading: &SensorReading,
    thresholds: &ThresholdTable,
    staleness: &StalenessPolicy,
    now: DateTime<Utc>,
) -> Option<StatusDescription> {
    if staleness.is_stale(reading.time, now) {
        return Some(StatusDescription::new(
            format!("Expired {} data", reading.kind.slug()),
            VesselStatusType::Expired,
        ));
    }

    let breach = assess(thresholds.comparator(reading.kind), reading.value)?;
    Some(StatusDescription::new(describe(reading, breach), breach.status))
}
