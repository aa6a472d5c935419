//! # Per-supervisor event delivery to subscribers.
//!
//! A [`SubscriberSet`] owns one bounded queue and one worker task per [`Subscribe`]
//! implementation. [`SubscriberSet::listen`] drains a bus receiver into those queues:
//!
//! ```text
//! Bus ──► listen(rx, "root") ──(events of "root" only)──┬──► [queue A] ─► worker A ─► on_event
//!                                                       └──► [queue B] ─► worker B ─► on_event
//! ```
//!
//! Nested supervisors may share one bus; each set only forwards the events of the
//! supervisor it was built for, so nothing is delivered twice.
//!
//! Forwarding never waits on a subscriber. A full queue drops the event for that
//! subscriber alone, and a panicking subscriber only loses the event it panicked on.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, warn};

use crate::events::Event;

use super::Subscribe;

struct Queue {
    subscriber: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Fan-out of one supervisor's events to its subscribers.
pub(crate) struct SubscriberSet {
    queues: Vec<Queue>,
    workers: JoinSet<()>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must be called from within a tokio runtime.
    pub(crate) fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut queues = Vec::with_capacity(subs.len());
        let mut workers = JoinSet::new();

        for sub in subs {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            queues.push(Queue {
                subscriber: sub.name(),
                tx,
            });
            workers.spawn(deliver(sub, rx));
        }

        Self { queues, workers }
    }

    /// Queues `ev` for every subscriber without waiting.
    pub(crate) fn emit(&self, ev: Arc<Event>) {
        for queue in &self.queues {
            if let Err(e) = queue.tx.try_send(Arc::clone(&ev)) {
                let cause = match e {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "worker gone",
                };
                warn!(subscriber = queue.subscriber, kind = ev.kind.as_label(), cause, "event dropped");
            }
        }
    }

    /// Forwards the events published by `supervisor` until the bus closes, then lets
    /// every worker drain its queue.
    pub(crate) fn listen(self, mut rx: broadcast::Receiver<Event>, supervisor: Arc<str>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.supervisor.as_deref() == Some(&*supervisor) => self.emit(Arc::new(ev)),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(supervisor = %supervisor, skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!(supervisor = %supervisor, "bus closed, draining subscribers");
            self.close().await;
        })
    }

    /// Closes every queue and waits for the workers to finish what is queued.
    pub(crate) async fn close(mut self) {
        self.queues.clear();
        while self.workers.join_next().await.is_some() {}
    }
}

async fn deliver(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        if let Err(panic) = std::panic::AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await {
            error!(subscriber = sub.name(), kind = ev.kind.as_label(), panic = ?panic, "subscriber panicked");
        }
    }
}
