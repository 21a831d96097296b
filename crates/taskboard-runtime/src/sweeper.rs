//! Periodic offline sweep.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::config::MIN_INTERVAL;
use crate::queue::CommandSender;

/// Queues an offline sweep on every tick until shutdown.
pub struct OfflineSweeper {
    sender: CommandSender,
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl OfflineSweeper {
    /// Creates a new sweeper. Periods below [`MIN_INTERVAL`] are raised to it.
    pub fn new(sender: CommandSender, period: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            sender,
            period: period.max(MIN_INTERVAL),
            shutdown,
        }
    }

    /// Run the sweep loop until shutdown signal.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; nothing can be idle yet
        ticker.tick().await;

        debug!(
            sweep_interval_ms = self.period.as_millis(),
            "starting offline sweeper"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = sweep(&self.sender) => {}
                        _ = self.shutdown.wait_for(|stop| *stop) => {
                            debug!("sweep interrupted by shutdown");
                            break;
                        }
                    }
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("sweeper received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("offline sweeper stopped");
    }
}

async fn sweep(sender: &CommandSender) {
    match sender.sweep(Utc::now()).await {
        Ok(Some(applied)) => debug!(version = applied.version(), "owners marked offline"),
        Ok(None) => trace!("no idle owners"),
        Err(e) => warn!(error = %e, "offline sweep failed"),
    }
}
