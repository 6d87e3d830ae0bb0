//! Monitor Configuration - thresholds and operational settings as TOML values
//!
//! Each section implements `Default`, so a partial file only overrides what
//! it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::report::ReportSettings;
use crate::status_engine::StalenessPolicy;
use crate::types::{HighIsBad, LowIsBad, ThresholdTable};

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SEAZR_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "seazr.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a monitor deployment.
///
/// Load with `MonitorConfig::load()` which searches:
/// 1. `$SEAZR_CONFIG` env var
/// 2. `./seazr.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fleet identification
    #[serde(default)]
    pub fleet: FleetInfo,

    /// Per-kind warning/alarm boundaries
    #[serde(default)]
    pub thresholds: ThresholdTable,

    /// Reading freshness budget
    #[serde(default)]
    pub staleness: StalenessPolicy,

    /// Periodic alarm sweep
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Alert delivery
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Voyage report tuning
    #[serde(default)]
    pub report: ReportSettings,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl MonitorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SEAZR_CONFIG` environment variable
    /// 2. `./seazr.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// Environment overrides are applied on top of whichever source won.
    pub fn load() -> Self {
        let mut config = Self::load_file_or_default();
        config.apply_env_overrides();
        config
    }

    fn load_file_or_default() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fleet = %config.fleet.name, "Loaded config from SEAZR_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SEAZR_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SEAZR_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./seazr.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fleet = %config.fleet.name, "Loaded config from ./seazr.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./seazr.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No seazr.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Apply `SEAZR_SWEEP_INTERVAL_SECS`, `SEAZR_SERVER_ADDR` and `CRON_SECRET`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("SEAZR_SWEEP_INTERVAL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.sweep.interval_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid SEAZR_SWEEP_INTERVAL_SECS"),
            }
        }
        if let Some(addr) = lookup("SEAZR_SERVER_ADDR") {
            self.server.addr = addr;
        }
        if let Some(secret) = lookup("CRON_SECRET").filter(|s| !s.is_empty()) {
            self.server.cron_secret = Some(secret);
        }
    }

    /// Validate all sections for internal consistency.
    ///
    /// Rules:
    /// - Low-is-bad kinds: alarm <= warning
    /// - High-is-bad kinds: alarm >= warning
    /// - Temperature: alarm_low <= warning_low < warning_high <= alarm_high
    /// - All thresholds finite, intervals and timeouts positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let mut errors: Vec<String> = Vec::new();

        Self::check_falling(t.battery, "thresholds.battery", &mut errors);
        Self::check_falling(t.fuel, "thresholds.fuel", &mut errors);
        Self::check_rising(t.humidity, "thresholds.humidity", &mut errors);
        Self::check_rising(t.water, "thresholds.water", &mut errors);

        let temp = &t.temperature;
        let band = [temp.alarm_low, temp.warning_low, temp.warning_high, temp.alarm_high];
        if band.iter().any(|v| !v.is_finite()) {
            errors.push(format!("thresholds.temperature: values must be finite (got {band:?})"));
        } else if !(temp.alarm_low <= temp.warning_low
            && temp.warning_low < temp.warning_high
            && temp.warning_high <= temp.alarm_high)
        {
            errors.push(format!(
                "thresholds.temperature: expected alarm_low ({}) <= warning_low ({}) < warning_high ({}) <= alarm_high ({})",
                temp.alarm_low, temp.warning_low, temp.warning_high, temp.alarm_high
            ));
        }

        if !t.bilge.threshold.is_finite() {
            errors.push(format!("thresholds.bilge.threshold must be finite (got {})", t.bilge.threshold));
        }

        let max_age = self.staleness.max_age_hours;
        if !max_age.is_finite() || max_age <= 0.0 {
            errors.push(format!("staleness.max_age_hours must be > 0 (got {max_age})"));
        }

        if self.sweep.interval_secs == 0 {
            errors.push("sweep.interval_secs must be > 0".to_string());
        }
        if self.sweep.max_concurrent_vessels == 0 {
            errors.push("sweep.max_concurrent_vessels must be > 0".to_string());
        }
        if self.notifications.timeout_secs == 0 {
            errors.push("notifications.timeout_secs must be > 0".to_string());
        }

        let jitter = self.report.gps_jitter_km;
        if !jitter.is_finite() || jitter < 0.0 {
            errors.push(format!("report.gps_jitter_km must be >= 0 (got {jitter})"));
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_falling(t: LowIsBad, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so check explicitly
        if !t.warning.is_finite() || !t.alarm.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got warning={}, alarm={})",
                t.warning, t.alarm
            ));
            return;
        }
        if t.alarm > t.warning {
            errors.push(format!(
                "{name}: alarm ({:.3}) must be <= warning ({:.3})",
                t.alarm, t.warning
            ));
        }
    }

    fn check_rising(t: HighIsBad, name: &str, errors: &mut Vec<String>) {
        if !t.warning.is_finite() || !t.alarm.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got warning={}, alarm={})",
                t.warning, t.alarm
            ));
            return;
        }
        if t.alarm < t.warning {
            errors.push(format!(
                "{name}: alarm ({:.3}) must be >= warning ({:.3})",
                t.alarm, t.warning
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Fleet Info
// ============================================================================

/// Identification metadata; appears in logs only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetInfo {
    #[serde(default = "default_fleet_name")]
    pub name: String,
}

fn default_fleet_name() -> String {
    "DEFAULT".to_string()
}

impl Default for FleetInfo {
    fn default() -> Self {
        Self {
            name: default_fleet_name(),
        }
    }
}

// ============================================================================
// Sweep Config
// ============================================================================

/// Periodic alarm sweep settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds between sweeps.
    ///
    /// Can be overridden by `SEAZR_SWEEP_INTERVAL_SECS`.
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,

    /// Upper bound on vessels fetched and evaluated at once
    #[serde(default = "default_max_concurrent_vessels")]
    pub max_concurrent_vessels: usize,
}

fn default_sweep_interval_secs() -> u64 {
    defaults::SWEEP_INTERVAL_SECS
}
fn default_max_concurrent_vessels() -> usize {
    defaults::SWEEP_MAX_CONCURRENT_VESSELS
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval_secs(),
            max_concurrent_vessels: default_max_concurrent_vessels(),
        }
    }
}

// ============================================================================
// Notification Config
// ============================================================================

/// Alert delivery. Without a webhook URL alerts are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// Webhook request timeout (seconds)
    #[serde(default = "default_notification_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_notification_timeout_secs() -> u64 {
    defaults::NOTIFICATION_HTTP_TIMEOUT_SECS
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_notification_timeout_secs(),
        }
    }
}

// ============================================================================
// Server Config
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SEAZR_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Bearer token for the cron trigger. The endpoint is closed when unset.
    ///
    /// Usually supplied through `CRON_SECRET` rather than the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_secret: Option<String>,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cron_secret: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
