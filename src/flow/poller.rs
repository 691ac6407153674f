//! Sequenced dashboard polling
//!
//! The watch view re-fetches its list on a fixed interval. Two rules
//! keep a slow server from corrupting the view:
//! - a tick is skipped while a fetch is still outstanding, and
//! - a response is applied only when it belongs to the most recently
//!   issued fetch, so a late response can never overwrite fresher data.

use crate::api::{ApiError, CleaningApi, CleaningRequest, ListScope};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Monotonic fetch-sequencing gate.
///
/// `issue` stamps a fetch before it starts; `try_apply` admits a
/// response only when it is the latest issued and newer than the last
/// one applied.
#[derive(Debug, Default)]
pub struct SeqGate {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SeqGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the next outgoing fetch.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Admit `seq` if it is still the newest issued fetch and has not
    /// been applied yet.
    pub fn try_apply(&self, seq: u64) -> bool {
        if seq != self.issued.load(Ordering::SeqCst) {
            return false;
        }
        let last = self.applied.load(Ordering::SeqCst);
        if seq <= last {
            return false;
        }
        self.applied
            .compare_exchange(last, seq, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Recurring list fetcher for the watch dashboard.
pub struct Watcher {
    api: Arc<dyn CleaningApi>,
    scope: ListScope,
    interval: Duration,
}

impl Watcher {
    pub fn new(api: Arc<dyn CleaningApi>, scope: ListScope, interval: Duration) -> Self {
        Self {
            api,
            scope,
            interval,
        }
    }

    /// Poll until `shutdown` resolves, handing each admitted list to
    /// `on_update`. Fetch failures are logged and the loop keeps
    /// ticking; nothing is retried early.
    pub async fn run<F>(
        &self,
        mut on_update: F,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ApiError>
    where
        F: FnMut(Vec<CleaningRequest>),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let gate = Arc::new(SeqGate::new());
        let in_flight = Arc::new(AtomicBool::new(false));
        let (tx, mut rx) =
            mpsc::unbounded_channel::<(u64, Result<Vec<CleaningRequest>, ApiError>)>();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if in_flight.swap(true, Ordering::SeqCst) {
                        tracing::debug!("poll tick skipped, previous fetch still outstanding");
                        continue;
                    }
                    let seq = gate.issue();
                    let api = Arc::clone(&self.api);
                    let scope = self.scope.clone();
                    let tx = tx.clone();
                    let in_flight = Arc::clone(&in_flight);
                    tokio::spawn(async move {
                        let result = api.list(scope).await;
                        in_flight.store(false, Ordering::SeqCst);
                        let _ = tx.send((seq, result));
                    });
                }
                Some((seq, result)) = rx.recv() => {
                    match result {
                        Ok(requests) => {
                            if gate.try_apply(seq) {
                                on_update(requests);
                            } else {
                                tracing::debug!(seq, "discarded stale poll response");
                            }
                        }
                        Err(e) => {
                            tracing::error!("dashboard refresh failed: {}", e);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
