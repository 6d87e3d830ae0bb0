//! Historical reporting: deduplicated incident lists and voyage summaries.

mod incidents;
mod voyage;

pub use incidents::{format_report_time, summarize_incidents};
pub use voyage::{build_vessel_report, consumption, distance_nm, haversine_km, ReportSettings, VesselReport};
