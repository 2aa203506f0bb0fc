//! Entry point of the click pipeline for the request path.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::{ClickSender, EnqueueOutcome, click_queue};
use crate::domain::click_worker::ClickWorkerPool;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;

/// Sizing of the asynchronous click pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub queue_capacity: usize,
    pub worker_count: usize,
    /// Time allowed for workers to flush on shutdown.
    pub shutdown_grace: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            worker_count: 5,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// What happened to a click handed to [`ClickIngestor::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Accepted by the queue; a worker will persist it.
    Queued,
    /// Discarded because the queue was full or closed.
    Dropped,
    /// Written inline (fallback mode).
    Persisted,
    /// Inline write failed; logged and discarded.
    Failed,
}

/// Current state of the pipeline, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Asynchronous {
        available: usize,
        capacity: usize,
        closed: bool,
    },
    Synchronous,
}

/// Routes click events from request handlers to persistence.
///
/// Built once at startup and shared through [`crate::state::AppState`]. With a
/// producer handle, events are enqueued without waiting. Without one, the click
/// is written inline. Both paths persist the same [`NewClick`], and neither ever
/// reports an error to the caller.
#[derive(Clone)]
pub struct ClickIngestor {
    sender: Option<ClickSender>,
    repository: Arc<dyn ClickRepository>,
}

impl ClickIngestor {
    /// Builds the bounded queue and starts `config.worker_count` workers on it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: IngestConfig,
        repository: Arc<dyn ClickRepository>,
        cancel: CancellationToken,
    ) -> (Self, ClickWorkerPool) {
        let (sender, receiver) = click_queue(config.queue_capacity);
        let pool = ClickWorkerPool::spawn(
            receiver,
            Arc::clone(&repository),
            config.worker_count,
            cancel,
        );

        tracing::info!(
            queue_capacity = config.queue_capacity,
            workers = config.worker_count,
            "Click ingestion started"
        );

        (
            Self {
                sender: Some(sender),
                repository,
            },
            pool,
        )
    }

    /// Builds an ingestor without a queue; every click is written inline.
    pub fn synchronous(repository: Arc<dyn ClickRepository>) -> Self {
        tracing::warn!("Click queue not configured, recording clicks synchronously");

        Self {
            sender: None,
            repository,
        }
    }

    /// Records a click on a best-effort basis.
    pub async fn record(&self, event: ClickEvent) -> ClickDisposition {
        match &self.sender {
            Some(sender) => match sender.try_enqueue(event) {
                EnqueueOutcome::Queued => ClickDisposition::Queued,
                EnqueueOutcome::Dropped | EnqueueOutcome::Closed => ClickDisposition::Dropped,
            },
            None => self.record_inline(event).await,
        }
    }

    async fn record_inline(&self, event: ClickEvent) -> ClickDisposition {
        let link_id = event.link_id;

        match self.repository.record_click(NewClick::from(event)).await {
            Ok(_) => {
                metrics::counter!("click_events_persisted_total").increment(1);
                ClickDisposition::Persisted
            }
            Err(e) => {
                metrics::counter!("click_events_failed_total").increment(1);
                tracing::error!(link_id, error = %e, "Failed to record click");
                ClickDisposition::Failed
            }
        }
    }

    pub fn status(&self) -> PipelineStatus {
        match &self.sender {
            Some(sender) => PipelineStatus::Asynchronous {
                available: sender.available(),
                capacity: sender.max_capacity(),
                closed: sender.is_closed(),
            },
            None => PipelineStatus::Synchronous,
        }
    }
}
