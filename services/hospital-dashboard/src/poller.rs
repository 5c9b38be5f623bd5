//! Polling: keep an active view's data fresh on a fixed schedule

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A view that can re-fetch its remote state
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Fetch and populate view state. Failures are recorded by the view and
    /// never stop the schedule.
    async fn refresh(&self);
}

/// Scheduled refresh of one view, cancelled on [`stop`](Self::stop) or drop
///
/// Ticks run on a fixed wall-clock period and each refresh runs as its own
/// task, so a refresh slower than the period overlaps the next one. Whichever
/// finishes last wins.
pub struct PollingTask {
    name: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    refreshes: watch::Receiver<u64>,
}

impl std::fmt::Debug for PollingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingTask")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

impl PollingTask {
    /// Refresh `view` now and then every `period`
    pub fn start(view: Arc<dyn Refresh>, period: Duration) -> Self {
        let name = view.name().to_string();
        let cancel = CancellationToken::new();
        let (refreshed, refreshes) = watch::channel(0u64);

        tracing::debug!("Starting polling for '{}' every {:?}", name, period);
        let handle = tokio::spawn(poll_loop(view, period, cancel.clone(), refreshed));

        Self {
            name,
            cancel,
            handle: Some(handle),
            refreshes,
        }
    }

    /// Receiver holding the number of completed refreshes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refreshes.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancel the schedule and wait until no refresh is running
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Polling task for '{}' ended abnormally: {}", self.name, e);
            }
        }
        tracing::debug!("Polling for '{}' stopped", self.name);
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    view: Arc<dyn Refresh>,
    period: Duration,
    cancel: CancellationToken,
    refreshed: watch::Sender<u64>,
) {
    let refreshed = Arc::new(refreshed);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Polling loop for '{}' cancelled", view.name());
                break;
            }
            _ = ticker.tick() => {
                if !in_flight.is_empty() {
                    tracing::debug!(
                        "Refresh of '{}' still running, next tick overlaps",
                        view.name()
                    );
                }
                let view = Arc::clone(&view);
                let refreshed = Arc::clone(&refreshed);
                in_flight.spawn(async move {
                    view.refresh().await;
                    refreshed.send_modify(|count| *count += 1);
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    tracing::warn!("Refresh of '{}' panicked: {}", view.name(), e);
                }
            }
        }
    }

    in_flight.abort_all();
    while in_flight.join_next().await.is_some() {}
}
