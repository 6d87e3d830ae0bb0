//! Monitor Configuration Module
//!
//! Thresholds, freshness budget and sweep/notification/server settings
//! loaded from TOML. Every field has a built-in default, so an empty or
//! missing file yields a working configuration.
//!
//! ## Loading Order
//!
//! 1. `SEAZR_CONFIG` environment variable (path to TOML file)
//! 2. `seazr.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`MonitorConfig`] is passed by value to whatever needs it;
//! there is no process-wide instance.

mod monitor_config;
pub mod defaults;
pub mod validation;

pub use monitor_config::*;
