//! Fixed-size pool of background workers persisting click events.
//!
//! # Design
//!
//! - `N` tasks share one [`ClickReceiver`]; each event is claimed by one worker
//! - A persistence failure is logged and the event discarded, never retried
//! - On cancellation each worker drains what is still queued, then exits
//! - [`ClickWorkerPool::shutdown`] bounds the whole drain by a grace period

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickReceiver;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;

/// Outcome of [`ClickWorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Workers that exited normally within the grace period.
    pub completed: usize,
    /// Workers that panicked before shutdown finished.
    pub failed: usize,
    /// Workers aborted when the grace period ran out.
    pub aborted: usize,
}

/// Handle over the running click workers.
pub struct ClickWorkerPool {
    workers: JoinSet<()>,
    receiver: ClickReceiver,
    cancel: CancellationToken,
    size: usize,
}

impl ClickWorkerPool {
    /// Starts exactly `worker_count` workers reading from `receiver`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        receiver: ClickReceiver,
        repository: Arc<dyn ClickRepository>,
        worker_count: usize,
        cancel: CancellationToken,
    ) -> Self {
        let mut workers = JoinSet::new();

        for worker_id in 0..worker_count {
            workers.spawn(run_click_worker(
                worker_id,
                receiver.clone(),
                Arc::clone(&repository),
                cancel.clone(),
            ));
        }

        tracing::info!(workers = worker_count, "Click workers started");

        Self {
            workers,
            receiver,
            cancel,
            size: worker_count,
        }
    }

    /// Number of workers the pool was started with.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Stops the workers.
    ///
    /// Workers finish their in-flight write, drain the queue and exit. Whatever
    /// is still running after `grace` is aborted and the remaining queued
    /// events are lost.
    pub async fn shutdown(mut self, grace: Duration) -> ShutdownReport {
        self.cancel.cancel();

        let mut completed = 0;
        let mut failed = 0;
        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = self.workers.join_next().await {
                match result {
                    Ok(()) => completed += 1,
                    Err(e) => {
                        tracing::error!(error = %e, "Click worker terminated abnormally");
                        failed += 1;
                    }
                }
            }
        })
        .await;

        let mut aborted = 0;
        if drained.is_err() {
            aborted = self.workers.len();
            self.workers.abort_all();
            while self.workers.join_next().await.is_some() {}

            tracing::warn!(
                aborted,
                pending = self.receiver.len().await,
                grace_ms = grace.as_millis() as u64,
                "Click workers did not finish within grace period; queued events abandoned"
            );
        }

        tracing::info!(completed, failed, aborted, "Click workers stopped");

        ShutdownReport {
            completed,
            failed,
            aborted,
        }
    }
}

/// Worker loop: wait for an event or cancellation, persist, repeat.
async fn run_click_worker(
    worker_id: usize,
    receiver: ClickReceiver,
    repository: Arc<dyn ClickRepository>,
    cancel: CancellationToken,
) {
    tracing::debug!(worker_id, "Click worker running");

    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = receiver.recv() => match event {
                Some(event) => event,
                None => {
                    tracing::debug!(worker_id, "Click queue closed");
                    return;
                }
            },
        };

        persist_click(worker_id, repository.as_ref(), event).await;
    }

    let mut flushed = 0usize;
    while let Some(event) = receiver.try_recv().await {
        persist_click(worker_id, repository.as_ref(), event).await;
        flushed += 1;
    }

    tracing::debug!(worker_id, flushed, "Click worker stopped");
}

/// Writes one event. Failures are absorbed: logged, counted, discarded.
async fn persist_click(worker_id: usize, repository: &dyn ClickRepository, event: ClickEvent) {
    let link_id = event.link_id;

    match repository.record_click(NewClick::from(event)).await {
        Ok(_) => {
            metrics::counter!("click_events_persisted_total").increment(1);
        }
        Err(e) => {
            metrics::counter!("click_events_failed_total").increment(1);
            tracing::error!(worker_id, link_id, error = %e, "Failed to record click");
        }
    }
}
