//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from supervisors.
//!
//! ## Architecture
//! ```text
//! Publishers:                        Subscribers:
//!   Supervisor (root)   ──┐
//!   Supervisor (nested) ──┼──► Bus ──┬──► SubscriberSet::listen (one per supervisor)
//!                         │          └──► any `Bus::subscribe()` receiver
//! ```
//!
//! Nested supervisors may share their parent's bus (see
//! [`SupervisorBuilder::with_bus`](crate::SupervisorBuilder::with_bus)).
//!
//! `publish` never waits and events sent while nobody listens are gone.
//! A receiver that falls more than `capacity` events behind sees `RecvError::Lagged(n)`.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to the broadcast channel all supervisor events go through.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Sends `ev` to every current receiver; a no-op when there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Opens a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
