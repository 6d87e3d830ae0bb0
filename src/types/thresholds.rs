//! Per-sensor warning/alarm boundaries
//!
//! Each struct implements `Default` with the factory values for a 12 V
//! leisure-boat installation. The table is loaded once from config and
//! passed by reference to everything that classifies readings.

use serde::{Deserialize, Serialize};

use super::SensorKind;

/// Falling value is bad (battery voltage, fuel remaining).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowIsBad {
    /// Warning when value <= this
    pub warning: f64,
    /// Alarm when value <= this
    pub alarm: f64,
}

/// Rising value is bad (humidity, water level).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighIsBad {
    /// Warning when value >= this
    pub warning: f64,
    /// Alarm when value >= this
    pub alarm: f64,
}

/// Value must stay inside a band (cabin/engine-room temperature).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBand {
    pub warning_low: f64,
    pub warning_high: f64,
    pub alarm_low: f64,
    pub alarm_high: f64,
}

/// Binary signal: anything above the threshold is an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub threshold: f64,
}

/// How readings of one kind are compared against their boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparator {
    LowIsBad(LowIsBad),
    HighIsBad(HighIsBad),
    Range(RangeBand),
    Presence(Presence),
    /// Recorded and charted, never classified
    Informational,
}

/// Threshold table covering every [`SensorKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(default = "default_battery")]
    pub battery: LowIsBad,

    #[serde(default = "default_temperature")]
    pub temperature: RangeBand,

    #[serde(default = "default_humidity")]
    pub humidity: HighIsBad,

    #[serde(default = "default_water")]
    pub water: HighIsBad,

    #[serde(default = "default_fuel")]
    pub fuel: LowIsBad,

    #[serde(default = "default_bilge")]
    pub bilge: Presence,
}

// 12 V system
fn default_battery() -> LowIsBad { LowIsBad { warning: 11.8, alarm: 11.2 } }
fn default_temperature() -> RangeBand {
    RangeBand { warning_low: 5.0, warning_high: 40.0, alarm_low: 0.0, alarm_high: 50.0 }
}
fn default_humidity() -> HighIsBad { HighIsBad { warning: 85.0, alarm: 95.0 } }
fn default_water() -> HighIsBad { HighIsBad { warning: 10.0, alarm: 30.0 } }
fn default_fuel() -> LowIsBad { LowIsBad { warning: 20.0, alarm: 10.0 } }
fn default_bilge() -> Presence { Presence { threshold: 0.5 } }

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            battery: default_battery(),
            temperature: default_temperature(),
            humidity: default_humidity(),
            water: default_water(),
            fuel: default_fuel(),
            bilge: default_bilge(),
        }
    }
}

impl ThresholdTable {
    /// Comparator for a kind. Exhaustive: a new kind does not compile
    /// until it is given an entry here.
    pub const fn comparator(&self, kind: SensorKind) -> Comparator {
        match kind {
            SensorKind::Battery => Comparator::LowIsBad(self.battery),
            SensorKind::Fuel => Comparator::LowIsBad(self.fuel),
            SensorKind::Humidity => Comparator::HighIsBad(self.humidity),
            SensorKind::Water => Comparator::HighIsBad(self.water),
            SensorKind::Temperature => Comparator::Range(self.temperature),
            SensorKind::Bilge => Comparator::Presence(self.bilge),
            SensorKind::Pressure | SensorKind::Wind => Comparator::Informational,
        }
    }
}
