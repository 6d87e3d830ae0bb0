//! Config Validation Tests
//!
//! Typo detection, consistency rules and physical range checks for
//! `seazr.toml`, exercised independently from the rest of the crate.

use seazr::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use seazr::config::{ConfigError, MonitorConfig};
use seazr::types::ThresholdTable;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_fuel_threshold_warns_with_suggestion() {
    let toml_str = r#"
[thresholds.fuel]
warnign = 25.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "thresholds.fuel.warnign");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("thresholds.fuel.warning"));
    assert!(warnings[0].to_string().contains("did you mean 'thresholds.fuel.warning'?"));
}

#[test]
fn misspelled_section_is_flagged() {
    let toml_str = r#"
[staleness]
max_age_hours = 6.0

[stalenes]
max_age_hours = 6.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert!(fields.contains(&"stalenes"));
    assert!(fields.contains(&"stalenes.max_age_hours"));
    assert!(!fields.contains(&"staleness.max_age_hours"));
}

#[test]
fn unrelated_key_has_no_suggestion() {
    let warnings = validate_unknown_keys("completely_unrelated_setting = true\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn valid_config_has_no_unknown_keys() {
    let toml_str = MonitorConfig::default().to_toml().unwrap();
    assert!(validate_unknown_keys(&toml_str).is_empty());
}

#[test]
fn suggestion_requires_small_edit_distance() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("server.adr", &known).as_deref(), Some("server.addr"));
    assert_eq!(suggest_correction("notifications.webhook", &known), None);
}

#[test]
fn known_keys_cover_every_threshold() {
    let known = known_config_keys();
    for key in [
        "thresholds.battery.alarm",
        "thresholds.temperature.alarm_high",
        "thresholds.humidity.warning",
        "thresholds.water.alarm",
        "thresholds.fuel.warning",
        "thresholds.bilge.threshold",
    ] {
        assert!(known.contains(key), "missing {key}");
    }
}

// ============================================================================
// Consistency Rules
// ============================================================================

#[test]
fn partial_file_keeps_defaults_elsewhere() {
    let config = MonitorConfig::from_toml_str(
        r#"
[fleet]
name = "Adriatic Charter"

[thresholds.battery]
warning = 24.0
alarm = 23.0
"#,
    )
    .unwrap();

    assert_eq!(config.fleet.name, "Adriatic Charter");
    assert_eq!(config.thresholds.battery.warning, 24.0);
    assert_eq!(config.thresholds.fuel, ThresholdTable::default().fuel);
    assert_eq!(config.staleness.max_age_hours, 12.0);
}

#[test]
fn inverted_battery_thresholds_fail() {
    let err = MonitorConfig::from_toml_str(
        r#"
[thresholds.battery]
warning = 11.0
alarm = 11.5
"#,
    )
    .unwrap_err();
    let ConfigError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.iter().any(|e| e.starts_with("thresholds.battery")));
}

#[test]
fn inverted_temperature_band_fails() {
    let mut config = MonitorConfig::default();
    config.thresholds.temperature.warning_low = 45.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn zero_sweep_interval_fails() {
    let mut config = MonitorConfig::default();
    config.sweep.interval_secs = 0;
    let Err(ConfigError::Validation(errors)) = config.validate() else {
        panic!("expected validation error");
    };
    assert_eq!(errors, vec!["sweep.interval_secs must be > 0".to_string()]);
}

#[test]
fn nan_threshold_fails() {
    let mut config = MonitorConfig::default();
    config.thresholds.water.alarm = f64::NAN;
    assert!(config.validate().is_err());
}

// ============================================================================
// Physical Range Validation
// ============================================================================

#[test]
fn default_config_is_physically_plausible() {
    let (errors, warnings) = validate_physical_ranges(&MonitorConfig::default());
    assert!(errors.is_empty(), "{errors:?}");
    assert!(warnings.is_empty());
}

#[test]
fn humidity_above_hundred_percent_is_error() {
    let mut config = MonitorConfig::default();
    config.thresholds.humidity.alarm = 120.0;
    let (errors, _) = validate_physical_ranges(&config);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("humidity.alarm"));
}

#[test]
fn negative_tank_threshold_is_error() {
    let mut config = MonitorConfig::default();
    config.thresholds.fuel.alarm = -5.0;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("fuel.alarm")));
}

#[test]
fn unusual_battery_voltage_only_warns() {
    let mut config = MonitorConfig::default();
    config.thresholds.battery.warning = 3.8;
    config.thresholds.battery.alarm = 3.5;

    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 2);
    // Still loads
    assert!(config.validate().is_ok());
}

#[test]
fn week_long_freshness_budget_warns() {
    let mut config = MonitorConfig::default();
    config.staleness.max_age_hours = 200.0;
    let (_, warnings) = validate_physical_ranges(&config);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "staleness.max_age_hours");
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn overrides_apply_on_top_of_file() {
    let mut config = MonitorConfig::default();
    config.apply_overrides(|key| match key {
        "SEAZR_SWEEP_INTERVAL_SECS" => Some("600".to_string()),
        "CRON_SECRET" => Some("hunter2".to_string()),
        _ => None,
    });
    assert_eq!(config.sweep.interval_secs, 600);
    assert_eq!(config.server.cron_secret.as_deref(), Some("hunter2"));
    assert_eq!(config.server.addr, "0.0.0.0:8080");
}

#[test]
fn invalid_interval_override_is_ignored() {
    let mut config = MonitorConfig::default();
    config.apply_overrides(|key| (key == "SEAZR_SWEEP_INTERVAL_SECS").then(|| "soon".to_string()));
    assert_eq!(config.sweep.interval_secs, 3_600);
}
