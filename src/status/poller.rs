//! Periodic status poller
//!
//! One background task owns the writer side of a watch channel. It
//! refreshes once immediately, then once per interval, until stopped.
//! Refreshes run one after another inside the task and each request is
//! bounded by a timeout, so results are applied in the order issued.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use super::http::StatusSource;
use super::{StatusError, StatusView};

/// Default polling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Default per-request timeout, kept below the polling cadence
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub request_timeout: Duration,
    pub fallback_version: String,
}

/// Handle to a running poller. Dropping it stops the task.
pub struct StatusPoller {
    task: Option<JoinHandle<()>>,
    rx: watch::Receiver<StatusView>,
}

impl StatusPoller {
    /// Start polling `source` in the background
    pub fn spawn<S>(source: S, settings: PollSettings) -> Self
    where
        S: StatusSource + 'static,
    {
        let (tx, rx) = watch::channel(StatusView::new(&settings.fallback_version));

        let task = tokio::spawn(async move {
            let mut ticker = interval(settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // First tick completes immediately
                ticker.tick().await;
                let outcome = fetch_with_timeout(&source, settings.request_timeout).await;
                apply_outcome(&tx, outcome, &settings.fallback_version);
            }
        });

        Self {
            task: Some(task),
            rx,
        }
    }

    /// New reader of the status view
    pub fn subscribe(&self) -> watch::Receiver<StatusView> {
        self.rx.clone()
    }

    /// Copy of the latest status view
    #[cfg(test)]
    pub fn current(&self) -> StatusView {
        self.rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Cancel the timer. Safe to call more than once; only the first call acts.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Status poller stopped");
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run one request against `source`, mapping an elapsed deadline to a timeout error
pub async fn fetch_with_timeout<S>(
    source: &S,
    limit: Duration,
) -> Result<super::StatusResponse, StatusError>
where
    S: StatusSource + ?Sized,
{
    match timeout(limit, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(StatusError::Timeout),
    }
}

/// One-shot refresh outside a poller, used by `--status`
pub async fn refresh_once<S>(source: &S, settings: &PollSettings) -> StatusView
where
    S: StatusSource + ?Sized,
{
    let mut view = StatusView::new(&settings.fallback_version);
    let outcome = fetch_with_timeout(source, settings.request_timeout).await;
    log_outcome(&outcome);
    view.apply(outcome, &settings.fallback_version);
    view
}

fn apply_outcome(
    tx: &watch::Sender<StatusView>,
    outcome: Result<super::StatusResponse, StatusError>,
    fallback_version: &str,
) {
    log_outcome(&outcome);
    tx.send_modify(|view| {
        let previous = view.state;
        view.apply(outcome, fallback_version);
        if view.state != previous {
            tracing::info!(
                "Server status changed: {} -> {}",
                previous.label(),
                view.state.label()
            );
        }
    });
}

fn log_outcome(outcome: &Result<super::StatusResponse, StatusError>) {
    match outcome {
        Ok(response) if response.reports_error() => {
            tracing::debug!("Aggregator reports server unreachable: {:?}", response.error);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Status refresh failed: {}", e),
    }
}
