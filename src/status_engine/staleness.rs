//! Data freshness budget

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::defaults::DATA_MAX_AGE_HOURS;

/// How old a reading may be before the vessel state counts as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StalenessPolicy {
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: f64,
}

fn default_max_age_hours() -> f64 {
    DATA_MAX_AGE_HOURS
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl StalenessPolicy {
    /// Maximum age as a duration, at millisecond resolution.
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_age(&self) -> Duration {
        Duration::milliseconds((self.max_age_hours * 3_600_000.0) as i64)
    }

    pub fn is_stale(&self, reading_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_stale(reading_time, now, self.max_age())
    }
}

/// True when the reading is strictly older than `max_age`.
///
/// Readings stamped in the future (clock skew on the logger) are fresh.
pub fn is_stale(reading_time: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now.signed_duration_since(reading_time) > max_age
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_twelve_hours() {
        assert_eq!(StalenessPolicy::default().max_age(), Duration::hours(12));
    }

    #[test]
    fn test_exactly_at_budget_is_fresh() {
        let now = Utc::now();
        assert!(!is_stale(now - Duration::hours(12), now, Duration::hours(12)));
    }

    #[test]
    fn test_just_over_budget_is_stale() {
        let now = Utc::now();
        let t = now - Duration::hours(12) - Duration::milliseconds(1);
        assert!(is_stale(t, now, Duration::hours(12)));
    }

    #[test]
    fn test_future_reading_is_fresh() {
        let now = Utc::now();
        assert!(!is_stale(now + Duration::minutes(5), now, Duration::hours(12)));
    }

    #[test]
    fn test_custom_policy() {
        let policy = StalenessPolicy { max_age_hours: 0.5 };
        let now = Utc::now();
        assert!(policy.is_stale(now - Duration::minutes(31), now));
        assert!(!policy.is_stale(now - Duration::minutes(29), now));
    }
}
