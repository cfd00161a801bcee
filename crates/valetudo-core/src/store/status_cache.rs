// ── Single-flight status cache ──
//
// Holds the last good status and the callers waiting on the fetch in
// flight. The cache itself never performs I/O: `begin_read` tells the
// controller what to do, `complete` hands back the waiters to release.
//
// Invariant: `waiters` is non-empty exactly while one fetch is in flight.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use super::RefreshPolicy;
use crate::error::CoreError;
use crate::model::Status;

pub(crate) type StatusResult = Result<Arc<Status>, CoreError>;
type Waiter = oneshot::Sender<StatusResult>;

/// Last good status and when it was fetched. Set together or not at all.
#[derive(Debug)]
struct CacheEntry {
    status: Arc<Status>,
    fetched_at: Instant,
}

/// What a read should do next.
pub(crate) enum ReadDecision {
    /// Fresh enough; no network access.
    Cached(Arc<Status>),
    /// A fetch is already running; wait for its result.
    Join(oneshot::Receiver<StatusResult>),
    /// The caller is the first waiter and must start the fetch.
    Fetch(oneshot::Receiver<StatusResult>),
}

#[derive(Debug, Default)]
pub struct StatusCache {
    entry: Option<CacheEntry>,
    waiters: Vec<Waiter>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully fetched status, regardless of age.
    pub fn current(&self) -> Option<Arc<Status>> {
        self.entry.as_ref().map(|e| Arc::clone(&e.status))
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    pub fn is_fetching(&self) -> bool {
        !self.waiters.is_empty()
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.len()
    }

    /// Decide how to serve a read at `now`.
    ///
    /// Joining an in-flight fetch wins over everything, including `forced`.
    pub(crate) fn begin_read(
        &mut self,
        forced: bool,
        now: Instant,
        policy: &RefreshPolicy,
    ) -> ReadDecision {
        if self.is_fetching() {
            let (tx, rx) = oneshot::channel();
            self.waiters.push(tx);
            debug!(
                waiters = self.waiters.len(),
                "status fetch in flight, queueing"
            );
            return ReadDecision::Join(rx);
        }

        if !forced {
            if let Some(entry) = &self.entry {
                let budget = policy.interval_for(Some(&entry.status));
                if now.saturating_duration_since(entry.fetched_at) < budget {
                    debug!("returning cached status");
                    return ReadDecision::Cached(Arc::clone(&entry.status));
                }
            }
        }

        debug!(forced, "starting status fetch");
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        ReadDecision::Fetch(rx)
    }

    /// Record the outcome of the in-flight fetch and drain the queue.
    ///
    /// A failure leaves the previous entry in place. The returned waiters
    /// are in enqueue order; the caller sends them the result after
    /// releasing its lock.
    pub(crate) fn complete(&mut self, result: &StatusResult, now: Instant) -> Vec<Waiter> {
        if let Ok(status) = result {
            self.entry = Some(CacheEntry {
                status: Arc::clone(status),
                fetched_at: now,
            });
        }
        std::mem::take(&mut self.waiters)
    }
}
