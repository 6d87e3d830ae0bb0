//! Domain types shared by the status engine, sweeps and reports

mod sensor;
mod status;
mod thresholds;
mod vessel;

pub use sensor::{ingest_readings, latest_per_sensor, InvalidReadingError, RawReading, SensorKind, SensorReading, Unit};
pub use status::{StatusDescription, VesselHealthStatus, VesselStatusType};
pub use thresholds::{Comparator, HighIsBad, LowIsBad, Presence, RangeBand, ThresholdTable};
pub use vessel::{
    AccessLevel, NotificationPreferences, Permission, TimeRange, Vessel, VesselLocation, VesselRecord,
};
