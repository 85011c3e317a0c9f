//! Interval poller that forwards new outcomes to the engine's consumer

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::common::errors::{MonitorError, Result};
use crate::common::traits::OutcomeSource;
use crate::common::types::Outcome;

/// Poll `source` every `poll_interval` and send each new outcome
///
/// Recoverable errors are logged and polling goes on. Returns when the
/// source fails with a non-recoverable error, when the source is
/// exhausted, or when the receiving side is gone.
pub async fn run_poller<S: OutcomeSource>(
    mut source: S,
    outcomes: mpsc::Sender<Outcome>,
    startup_delay: Duration,
    poll_interval: Duration,
) -> Result<()> {
    debug!(delay_ms = startup_delay.as_millis() as u64, "Waiting before the first poll");
    tokio::time::sleep(startup_delay).await;

    let mut ticker = tokio::time::interval(poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match source.poll_for_new_outcome().await {
            Ok(Some(outcome)) => {
                if let Err(e) = outcomes.send(outcome).await {
                    error!(source = source.source_name(), "Outcome receiver dropped");
                    return Err(MonitorError::ChannelSend(e.to_string()));
                }
            }
            Ok(None) if source.is_exhausted() => {
                debug!(source = source.source_name(), "Source exhausted");
                return Ok(());
            }
            Ok(None) => debug!(source = source.source_name(), "No new outcome"),
            Err(e) if e.is_recoverable() => {
                warn!(source = source.source_name(), error = %e, "Feed poll failed");
            }
            Err(e) => {
                error!(source = source.source_name(), error = %e, "Feed poller stopping");
                return Err(e);
            }
        }
    }
}

/// Why a poller task ended, as an error for the run loop
pub fn poller_exit(joined: std::result::Result<Result<()>, JoinError>) -> MonitorError {
    match joined {
        Ok(Ok(())) => MonitorError::Internal("feed poller stopped".to_string()),
        Ok(Err(e)) => e,
        Err(e) if e.is_panic() => MonitorError::Internal(format!("feed poller panicked: {}", e)),
        Err(e) => MonitorError::Internal(format!("feed poller cancelled: {}", e)),
    }
}
