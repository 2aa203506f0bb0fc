//! Bounded click event queue between request handlers and click workers.
//!
//! Producers never wait: when the queue is full the event is dropped and the
//! drop is logged and counted. Consumers share a single receiver, so every
//! queued event is delivered to exactly one worker, in FIFO order.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::domain::click_event::ClickEvent;

/// Result of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// The queue was full; the event was discarded.
    Dropped,
    /// Every consumer is gone; the event was discarded.
    Closed,
}

/// Creates a click queue holding at most `capacity` pending events.
///
/// # Panics
///
/// Panics if `capacity` is zero. [`crate::config::Config::validate`] rejects
/// such values before the queue is built.
pub fn click_queue(capacity: usize) -> (ClickSender, ClickReceiver) {
    let (tx, rx) = mpsc::channel(capacity);

    (
        ClickSender { tx },
        ClickReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer handle handed to the request path.
#[derive(Debug, Clone)]
pub struct ClickSender {
    tx: mpsc::Sender<ClickEvent>,
}

impl ClickSender {
    /// Enqueues an event without waiting.
    pub fn try_enqueue(&self, event: ClickEvent) -> EnqueueOutcome {
        match self.tx.try_send(event) {
            Ok(()) => EnqueueOutcome::Queued,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(link_id = event.link_id, "Click queue full, dropping event");
                metrics::counter!("click_events_dropped_total", "reason" => "full").increment(1);
                EnqueueOutcome::Dropped
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(link_id = event.link_id, "Click queue closed, dropping event");
                metrics::counter!("click_events_dropped_total", "reason" => "closed").increment(1);
                EnqueueOutcome::Closed
            }
        }
    }

    /// Number of free slots right now.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Returns true once every consumer handle has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle shared by the click workers.
#[derive(Debug, Clone)]
pub struct ClickReceiver {
    rx: Arc<Mutex<mpsc::Receiver<ClickEvent>>>,
}

impl ClickReceiver {
    /// Waits for the next event.
    ///
    /// Returns `None` once all senders are dropped and the queue is empty.
    /// Cancel-safe: dropping the future never loses an event.
    pub async fn recv(&self) -> Option<ClickEvent> {
        self.rx.lock().await.recv().await
    }

    /// Takes the next event if one is queued, without waiting for new ones.
    pub async fn try_recv(&self) -> Option<ClickEvent> {
        match self.rx.lock().await.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of events currently waiting.
    pub async fn len(&self) -> usize {
        self.rx.lock().await.len()
    }
}
