//! Sensor kinds, units, and validated readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Sensor Kind
// ============================================================================

/// Category of an onboard sensor.
///
/// Closed set: adding a kind forces a unit, a threshold entry and a
/// classification branch through exhaustive matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Battery,
    Temperature,
    Humidity,
    Pressure,
    Water,
    Fuel,
    Bilge,
    Wind,
}

impl SensorKind {
    /// Every kind, in declaration order.
    pub const ALL: [SensorKind; 8] = [
        SensorKind::Battery,
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Pressure,
        SensorKind::Water,
        SensorKind::Fuel,
        SensorKind::Bilge,
        SensorKind::Wind,
    ];

    /// Measurement unit reported by this kind of sensor.
    pub const fn unit(self) -> Unit {
        match self {
            SensorKind::Battery => Unit::Volt,
            SensorKind::Temperature => Unit::Celsius,
            SensorKind::Humidity => Unit::Percent,
            SensorKind::Pressure => Unit::Hectopascal,
            SensorKind::Water | SensorKind::Fuel => Unit::Litre,
            SensorKind::Bilge => Unit::None,
            SensorKind::Wind => Unit::Knot,
        }
    }

    /// Lower-case name used in expired-data descriptions and logs.
    pub const fn slug(self) -> &'static str {
        match self {
            SensorKind::Battery => "battery",
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Pressure => "pressure",
            SensorKind::Water => "water",
            SensorKind::Fuel => "fuel",
            SensorKind::Bilge => "bilge",
            SensorKind::Wind => "wind",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::Battery => "Battery",
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::Pressure => "Pressure",
            SensorKind::Water => "Water",
            SensorKind::Fuel => "Fuel",
            SensorKind::Bilge => "Bilge",
            SensorKind::Wind => "Wind",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SensorKind {
    type Err = InvalidReadingError;

    /// Case-insensitive. `voltage` is accepted as an alias of `Battery`
    /// because the telemetry store files battery voltage under both names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "battery" | "voltage" => Ok(SensorKind::Battery),
            "temperature" => Ok(SensorKind::Temperature),
            "humidity" => Ok(SensorKind::Humidity),
            "pressure" => Ok(SensorKind::Pressure),
            "water" => Ok(SensorKind::Water),
            "fuel" => Ok(SensorKind::Fuel),
            "bilge" => Ok(SensorKind::Bilge),
            "wind" => Ok(SensorKind::Wind),
            _ => Err(InvalidReadingError::UnknownKind(s.to_string())),
        }
    }
}

// ============================================================================
// Unit
// ============================================================================

/// Measurement unit attached to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "V")]
    Volt,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "hPa")]
    Hectopascal,
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "kn")]
    Knot,
    /// Dimensionless signal (bilge float switch)
    #[serde(rename = "")]
    None,
}

impl Unit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Celsius => "°C",
            Unit::Percent => "%",
            Unit::Hectopascal => "hPa",
            Unit::Litre => "L",
            Unit::Knot => "kn",
            Unit::None => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A telemetry row that cannot be turned into a [`SensorReading`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReadingError {
    #[error("unknown sensor kind '{0}'")]
    UnknownKind(String),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("non-finite value {value} for {kind} sensor")]
    NonFiniteValue { kind: SensorKind, value: f64 },
}

// ============================================================================
// Readings
// ============================================================================

/// One timestamped sample from a vessel sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub kind: SensorKind,
    pub value: f64,
    pub time: DateTime<Utc>,
    pub vessel_id: String,
    pub unit: Unit,
    /// Physical sensor identifier, when the store provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
}

impl SensorReading {
    /// Build a reading with the unit implied by its kind.
    pub fn new(kind: SensorKind, value: f64, time: DateTime<Utc>, vessel_id: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            time,
            vessel_id: vessel_id.into(),
            unit: kind.unit(),
            sensor_id: None,
        }
    }

    /// Value followed directly by the unit symbol, e.g. `11.5V`, `45°C`.
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }

    /// Key identifying the physical sensor: the sensor id, or
    /// `<vessel>-<kind>` when the store did not record one.
    pub fn sensor_key(&self) -> String {
        match &self.sensor_id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.vessel_id, self.kind.slug()),
        }
    }
}

/// Reading as it arrives from the telemetry store, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub sensor_type: String,
    pub value: f64,
    pub time: String,
    pub vessel_id: String,
    #[serde(default)]
    pub sensor_id: Option<String>,
}

impl TryFrom<RawReading> for SensorReading {
    type Error = InvalidReadingError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        let kind: SensorKind = raw.sensor_type.parse()?;

        if !raw.value.is_finite() {
            return Err(InvalidReadingError::NonFiniteValue { kind, value: raw.value });
        }

        let time = DateTime::parse_from_rfc3339(&raw.time)
            .map_err(|_| InvalidReadingError::InvalidTimestamp(raw.time.clone()))?
            .with_timezone(&Utc);

        Ok(Self {
            kind,
            value: raw.value,
            time,
            vessel_id: raw.vessel_id,
            unit: kind.unit(),
            sensor_id: raw.sensor_id,
        })
    }
}

/// Validate a batch of raw rows.
///
/// Rows of unknown kind are dropped; any other invalid row fails the batch.
pub fn ingest_readings(raw: Vec<RawReading>) -> Result<Vec<SensorReading>, InvalidReadingError> {
    let mut readings = Vec::with_capacity(raw.len());
    for row in raw {
        match SensorReading::try_from(row) {
            Ok(reading) => readings.push(reading),
            Err(InvalidReadingError::UnknownKind(kind)) => {
                debug!(kind = %kind, "Dropping reading of unknown kind");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(readings)
}

/// Keep only the most recent reading per physical sensor.
///
/// Output is ordered most recent first; ties keep input order.
pub fn latest_per_sensor(readings: &[SensorReading]) -> Vec<SensorReading> {
    let mut sorted: Vec<&SensorReading> = readings.iter().collect();
    sorted.sort_by(|a, b| b.time.cmp(&a.time));

    let mut seen = std::collections::HashSet::new();
    sorted
        .into_iter()
        .filter(|r| seen.insert(r.sensor_key()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn raw(sensor_type: &str, value: f64, time: &str) -> RawReading {
        RawReading {
            sensor_type: sensor_type.to_string(),
            value,
            time: time.to_string(),
            vessel_id: "SEA-1".to_string(),
            sensor_id: None,
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("battery".parse::<SensorKind>(), Ok(SensorKind::Battery));
        assert_eq!("BILGE".parse::<SensorKind>(), Ok(SensorKind::Bilge));
        assert_eq!(" Temperature ".parse::<SensorKind>(), Ok(SensorKind::Temperature));
    }

    #[test]
    fn test_voltage_aliases_battery() {
        assert_eq!("Voltage".parse::<SensorKind>(), Ok(SensorKind::Battery));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "sonar".parse::<SensorKind>().unwrap_err();
        assert_eq!(err, InvalidReadingError::UnknownKind("sonar".to_string()));
    }

    #[test]
    fn test_every_kind_has_a_unit() {
        for kind in SensorKind::ALL {
            // Only bilge is dimensionless
            assert_eq!(kind.unit() == Unit::None, kind == SensorKind::Bilge, "{kind}");
        }
    }

    #[test]
    fn test_display_value_formatting() {
        let now = Utc::now();
        assert_eq!(SensorReading::new(SensorKind::Battery, 11.0, now, "v").display_value(), "11V");
        assert_eq!(SensorReading::new(SensorKind::Battery, 11.55, now, "v").display_value(), "11.55V");
        assert_eq!(SensorReading::new(SensorKind::Temperature, 45.0, now, "v").display_value(), "45°C");
    }

    #[test]
    fn test_raw_conversion() {
        let reading = SensorReading::try_from(raw("water", 12.5, "2025-06-01T10:00:00Z")).unwrap();
        assert_eq!(reading.kind, SensorKind::Water);
        assert_eq!(reading.unit, Unit::Litre);
        assert_eq!(reading.value, 12.5);
    }

    #[test]
    fn test_raw_conversion_rejects_nan() {
        let err = SensorReading::try_from(raw("fuel", f64::NAN, "2025-06-01T10:00:00Z")).unwrap_err();
        assert!(matches!(err, InvalidReadingError::NonFiniteValue { kind: SensorKind::Fuel, .. }));
    }

    #[test]
    fn test_raw_conversion_rejects_bad_timestamp() {
        let err = SensorReading::try_from(raw("fuel", 40.0, "yesterday")).unwrap_err();
        assert_eq!(err, InvalidReadingError::InvalidTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_ingest_drops_unknown_kinds_only() {
        let readings = ingest_readings(vec![
            raw("battery", 12.4, "2025-06-01T10:00:00Z"),
            raw("sonar", 3.0, "2025-06-01T10:00:00Z"),
        ])
        .unwrap();
        assert_eq!(readings.len(), 1);

        let err = ingest_readings(vec![raw("fuel", 40.0, "noon")]).unwrap_err();
        assert_eq!(err, InvalidReadingError::InvalidTimestamp("noon".to_string()));
    }

    #[test]
    fn test_unit_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Unit::Celsius).unwrap(), "\"°C\"");
        assert_eq!(serde_json::to_string(&Unit::None).unwrap(), "\"\"");
    }

    #[test]
    fn test_latest_per_sensor_keeps_newest() {
        let now = Utc::now();
        let old = SensorReading::new(SensorKind::Battery, 12.1, now - Duration::hours(2), "SEA-1");
        let new = SensorReading::new(SensorKind::Battery, 12.6, now, "SEA-1");
        let fuel = SensorReading::new(SensorKind::Fuel, 55.0, now - Duration::hours(1), "SEA-1");

        let latest = latest_per_sensor(&[old, fuel.clone(), new.clone()]);
        assert_eq!(latest, vec![new, fuel]);
    }

    #[test]
    fn test_latest_per_sensor_distinguishes_sensor_ids() {
        let now = Utc::now();
        let mut port = SensorReading::new(SensorKind::Fuel, 40.0, now, "SEA-1");
        port.sensor_id = Some("fuel-port".to_string());
        let mut starboard = SensorReading::new(SensorKind::Fuel, 42.0, now, "SEA-1");
        starboard.sensor_id = Some("fuel-stbd".to_string());

        assert_eq!(latest_per_sensor(&[port, starboard]).len(), 2);
    }
}
