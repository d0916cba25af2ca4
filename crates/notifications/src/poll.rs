//! Fixed-interval refresh of a panel

use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::panel::NotificationPanel;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Keeps a poll loop alive; dropping it stops the loop
///
/// Fetches already in flight are left to finish.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling now rather than when the handle goes out of scope
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Refresh `panel` now and then every `interval`
///
/// Each tick gets its own task, so a slow response does not hold back the
/// next tick and whichever response lands last is what the cache shows.
pub(crate) fn spawn(panel: NotificationPanel, interval: Duration) -> PollHandle {
    info!(
        "Polling {:?} notifications every {:?}",
        panel.kind(),
        interval
    );

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let panel = panel.clone();
            tokio::spawn(async move {
                if let Err(err) = panel.refresh().await {
                    debug!("Poll tick failed: {}", err);
                }
            });
        }
    });

    PollHandle { task }
}
