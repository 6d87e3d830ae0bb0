//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse: the raw TOML is first read into `toml::Value` and its key
//! tree compared against the known field names, emitting "did you mean?"
//! warnings. Normal serde deserialization follows. Warnings never break a
//! config that would otherwise load.

use std::collections::HashSet;

use super::MonitorConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `MonitorConfig`.
///
/// Maintained by hand against the struct hierarchy in monitor_config.rs
/// and `types::thresholds`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [fleet]
        "fleet",
        "fleet.name",
        // [thresholds]
        "thresholds",
        "thresholds.battery",
        "thresholds.battery.warning",
        "thresholds.battery.alarm",
        "thresholds.temperature",
        "thresholds.temperature.warning_low",
        "thresholds.temperature.warning_high",
        "thresholds.temperature.alarm_low",
        "thresholds.temperature.alarm_high",
        "thresholds.humidity",
        "thresholds.humidity.warning",
        "thresholds.humidity.alarm",
        "thresholds.water",
        "thresholds.water.warning",
        "thresholds.water.alarm",
        "thresholds.fuel",
        "thresholds.fuel.warning",
        "thresholds.fuel.alarm",
        "thresholds.bilge",
        "thresholds.bilge.threshold",
        // [staleness]
        "staleness",
        "staleness.max_age_hours",
        // [sweep]
        "sweep",
        "sweep.interval_secs",
        "sweep.max_concurrent_vessels",
        // [notifications]
        "notifications",
        "notifications.webhook_url",
        "notifications.timeout_secs",
        // [report]
        "report",
        "report.gps_jitter_km",
        // [server]
        "server",
        "server.addr",
        "server.cron_secret",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };

    let mut keys = Vec::new();
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if v.is_table() {
            keys.push(path.clone());
            keys.extend(walk_toml_keys(v, &path));
        } else {
            keys.push(path);
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Edit distance between two strings, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Closest known key within edit distance 3, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for any unknown keys in raw TOML text.
///
/// Syntax errors yield no warnings here; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Physical plausibility of threshold values.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup, warnings are suspicious but allowed.
pub fn validate_physical_ranges(config: &MonitorConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let t = &config.thresholds;

    // Relative humidity is a percentage
    for (name, value) in [("warning", t.humidity.warning), ("alarm", t.humidity.alarm)] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!(
                "thresholds.humidity.{name} = {value:.1} is outside physical range (0-100 %)"
            ));
        }
    }

    // Tank levels cannot be negative
    for (name, value) in [
        ("water.warning", t.water.warning),
        ("water.alarm", t.water.alarm),
        ("fuel.warning", t.fuel.warning),
        ("fuel.alarm", t.fuel.alarm),
    ] {
        if value < 0.0 {
            errors.push(format!("thresholds.{name} = {value:.1} cannot be negative"));
        }
    }

    // 6-60 V covers 6 V dinghy packs up to 48 V house banks
    for (name, value) in [("warning", t.battery.warning), ("alarm", t.battery.alarm)] {
        if !(6.0..=60.0).contains(&value) {
            warnings.push(ValidationWarning {
                field: format!("thresholds.battery.{name}"),
                message: format!("battery.{name} = {value:.1} is outside typical range (6-60 V)"),
                suggestion: None,
            });
        }
    }

    // Freshness budget beyond a week hides dead sensors
    let max_age = config.staleness.max_age_hours;
    if max_age > 168.0 {
        warnings.push(ValidationWarning {
            field: "staleness.max_age_hours".to_string(),
            message: format!("staleness.max_age_hours = {max_age:.1} is longer than a week"),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
