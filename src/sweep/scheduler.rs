//! Periodic alarm sweep driver

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::AlarmSweep;

/// Run sweeps every `interval` until `cancel` fires. The first sweep runs
/// immediately. Returns the number of sweeps started.
///
/// A sweep that overruns the interval delays the next one rather than
/// stacking up behind it.
pub async fn run_scheduler(sweep: Arc<AlarmSweep>, interval: Duration, cancel: CancellationToken) -> u64 {
    info!(interval_secs = interval.as_secs(), "Alarm sweep scheduler started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sweeps = 0u64;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(sweeps, "Alarm sweep scheduler stopped");
                break;
            }
            _ = ticker.tick() => {
                sweeps += 1;
                if let Err(e) = sweep.run_once().await {
                    error!(error = %e, "Alarm sweep failed to list vessels");
                }
            }
        }
    }

    sweeps
}
