// src/pipeline/poller.rs

//! Background refresh loop with an explicit start/stop lifecycle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::{ContentFetcher, FetchOutcome};

/// How long `stop` waits for an in-flight fetch before aborting it.
pub const STOP_GRACE: Duration = Duration::from_secs(5);

/// Something the poller can refresh.
#[async_trait]
pub trait Refresh: Send + Sync {
    async fn refresh(&self, silent: bool) -> FetchOutcome;
}

#[async_trait]
impl Refresh for ContentFetcher {
    async fn refresh(&self, silent: bool) -> FetchOutcome {
        self.fetch(silent).await
    }
}

/// Scheduled re-fetch of the content source.
///
/// The first tick fires immediately and is a visible (non-silent) load;
/// later ticks are silent refreshes. Each fetch is awaited before the next
/// tick is considered, so one poller never overlaps its own fetches.
pub struct Poller<R: Refresh + 'static> {
    target: Arc<R>,
    interval: Duration,
}

impl<R: Refresh + 'static> Poller<R> {
    pub fn new(target: Arc<R>, interval: Duration) -> Self {
        Self { target, interval }
    }

    /// Spawn the refresh loop on the current tokio runtime.
    pub fn start(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (outcome_tx, outcome_rx) = watch::channel(None);
        let Self { target, interval } = self;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut first = true;

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let outcome = target.refresh(!first).await;
                        first = false;
                        // Nobody listening is fine.
                        let _ = outcome_tx.send(Some(outcome));
                    }
                }
            }
            log::debug!("Poller stopped");
        });

        log::debug!("Poller started with {:?} interval", interval);
        PollerHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
            outcomes: outcome_rx,
        }
    }
}

/// Handle to a running poller. Dropping it stops the loop after any
/// in-flight fetch completes.
pub struct PollerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    outcomes: watch::Receiver<Option<FetchOutcome>>,
}

impl PollerHandle {
    /// Receiver of the latest fetch outcome.
    pub fn outcomes(&self) -> watch::Receiver<Option<FetchOutcome>> {
        self.outcomes.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for it to wind down.
    ///
    /// A fetch still running after [`STOP_GRACE`] is aborted.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        let Some(mut task) = self.task.take() else {
            return;
        };
        match tokio::time::timeout(STOP_GRACE, &mut task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Poller task ended abnormally: {}", e),
            Err(_) => {
                log::warn!("In-flight fetch did not finish within {:?}; aborting", STOP_GRACE);
                task.abort();
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}
