//! Fetch orchestrator: run every pending fetch concurrently and wait for all of them.
//!
//! One tokio task per fetch; the blocking transport call runs on the blocking
//! pool and holds its concurrency permit until it returns. A failed, panicked
//! or timed-out fetch is recorded against its own item and never cancels its
//! siblings.

mod report;

pub use report::{FetchEvent, FetchOutcome, FetchReport};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

use crate::config::XdmConfig;
use crate::plan::PendingFetch;
use crate::transport::{CancelFlag, FetchError, Transport};

/// Slack on top of the transport's own timeout before the orchestrator gives up on a fetch.
const TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// How fetches are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// At most this many fetches in flight; `None` starts all at once.
    pub max_concurrent: Option<usize>,
    /// Per-fetch limit, measured from when the fetch actually starts.
    pub timeout: Duration,
}

impl FetchOptions {
    pub fn from_config(cfg: &XdmConfig) -> Self {
        Self {
            max_concurrent: cfg.concurrency_limit(),
            timeout: cfg.transport().fetch_timeout() + TIMEOUT_GRACE,
        }
    }
}

/// Runs one fetch on the blocking pool. The timer starts once the worker is
/// actually running; on expiry the transfer is cancelled and awaited, so
/// nothing lands on disk after a `TimedOut` is reported.
async fn fetch_one(
    transport: Arc<dyn Transport>,
    fetch: &PendingFetch,
    timeout: Duration,
    permit: Option<OwnedSemaphorePermit>,
) -> Result<u64, FetchError> {
    let url = fetch.source_url.clone();
    let destination = fetch.destination_path.clone();
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let (started_tx, started_rx) = oneshot::channel::<()>();

    let mut work = tokio::task::spawn_blocking(move || {
        // Held until the transport returns, not just until the task gives up on it.
        let _permit = permit;
        let _ = started_tx.send(());
        transport.fetch(&url, &destination, &worker_cancel)
    });

    let _ = started_rx.await;
    match tokio::time::timeout(timeout, &mut work).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => Err(FetchError::Join(join.to_string())),
        Err(_) => {
            cancel.cancel();
            match work.await {
                // Finished just as the timer fired; the file is in place.
                Ok(Ok(bytes)) => Ok(bytes),
                Ok(Err(_)) | Err(_) => Err(FetchError::TimedOut(timeout)),
            }
        }
    }
}

fn log_outcome(outcome: &FetchOutcome) {
    match &outcome.result {
        Ok(bytes) => tracing::info!(
            url = %outcome.fetch.source_url,
            destination = %outcome.fetch.destination_path.display(),
            bytes = *bytes,
            "fetch succeeded"
        ),
        Err(e) => tracing::warn!(
            url = %outcome.fetch.source_url,
            destination = %outcome.fetch.destination_path.display(),
            "fetch failed: {}",
            e
        ),
    }
}

/// Runs all `pending` fetches and returns once every one has finished.
///
/// Each finished fetch is logged and, if `progress_tx` is `Some`, reported as
/// a [`FetchEvent`] in completion order.
pub async fn run_fetches(
    pending: Vec<PendingFetch>,
    transport: Arc<dyn Transport>,
    opts: FetchOptions,
    progress_tx: Option<mpsc::Sender<FetchEvent>>,
) -> FetchReport {
    let limiter = opts
        .max_concurrent
        .map(|n| Arc::new(Semaphore::new(n.max(1))));

    let mut slots: Vec<Option<PendingFetch>> = Vec::with_capacity(pending.len());
    let mut join_set = JoinSet::new();
    for (index, fetch) in pending.into_iter().enumerate() {
        let transport = Arc::clone(&transport);
        let limiter = limiter.clone();
        let timeout = opts.timeout;
        let task_fetch = fetch.clone();
        slots.push(Some(fetch));
        join_set.spawn(async move {
            let permit = match limiter {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            let result = fetch_one(transport, &task_fetch, timeout, permit).await;
            (index, result)
        });
    }
    tracing::debug!(
        "dispatched {} fetch(es), limit {:?}",
        slots.len(),
        opts.max_concurrent
    );

    let mut report = FetchReport::new(slots.len());
    while let Some(joined) = join_set.join_next().await {
        let (index, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::warn!("fetch task failed to join: {}", e);
                continue;
            }
        };
        let Some(fetch) = slots.get_mut(index).and_then(Option::take) else {
            continue;
        };
        record(&mut report, FetchOutcome { fetch, result }, progress_tx.as_ref()).await;
    }

    // Tasks that never reported back (join failure) still count against the run.
    for fetch in slots.into_iter().flatten() {
        let result = Err(FetchError::Join("task did not complete".to_string()));
        record(&mut report, FetchOutcome { fetch, result }, progress_tx.as_ref()).await;
    }

    tracing::info!(
        "fetches finished: {} succeeded, {} failed of {}",
        report.succeeded,
        report.failed(),
        report.attempted
    );
    report
}

async fn record(
    report: &mut FetchReport,
    outcome: FetchOutcome,
    progress_tx: Option<&mpsc::Sender<FetchEvent>>,
) {
    log_outcome(&outcome);
    if let Some(tx) = progress_tx {
        let _ = tx.send(FetchEvent::from(&outcome)).await;
    }
    report.push(outcome);
}
