//! # Runtime events emitted by supervisors.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Supervisor lifecycle**: started, shutdown requested, stopped, restart limit hit
//! - **Child lifecycle**: spawned, terminated, cancelled, retired
//!
//! The [`Event`] struct carries metadata such as the timestamp, the supervisor and
//! child names, and the child's generation.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! A single supervisor publishes its events in the order it performs the operations.
//!
//! ## Example
//! ```rust
//! use oversight::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ChildSpawned)
//!     .with_supervisor("root")
//!     .with_child("worker")
//!     .with_generation(2);
//!
//! assert_eq!(ev.kind, EventKind::ChildSpawned);
//! assert_eq!(ev.child.as_deref(), Some("worker"));
//! assert_eq!(ev.generation, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Supervisor events ===
    /// Supervisor entered its loop; all initial children are spawned.
    ///
    /// Sets:
    /// - `supervisor`: supervisor name
    SupervisorStarted,

    /// Shutdown requested (cancellation token or OS signal observed).
    ///
    /// Sets:
    /// - `supervisor`: supervisor name
    ShutdownRequested,

    /// Supervisor left its loop after a shutdown; running children were cancelled.
    ///
    /// Sets:
    /// - `supervisor`: supervisor name
    SupervisorStopped,

    /// A child terminated before the minimum restart interval elapsed.
    /// The supervisor dies; no further spawn or cancel is issued.
    ///
    /// Sets:
    /// - `supervisor`: supervisor name
    /// - `child`: child that tripped the limit
    /// - `reason`: error message
    RestartFrequencyExceeded,

    // === Child events ===
    /// A child process was spawned (initially or as a restart).
    ///
    /// Sets:
    /// - `supervisor`, `child`
    /// - `generation`: 1 for the initial spawn, +1 per respawn
    ChildSpawned,

    /// A child terminated on its own (any cause).
    ///
    /// Sets:
    /// - `supervisor`, `child`, `generation`
    ChildTerminated,

    /// A running child was cancelled by the supervisor.
    ///
    /// Sets:
    /// - `supervisor`, `child`, `generation`
    ChildCancelled,

    /// A temporary child was removed from supervision for good.
    ///
    /// Sets:
    /// - `supervisor`, `child`, `generation`
    ChildRetired,
}

impl EventKind {
    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::SupervisorStarted => "supervisor_started",
            EventKind::ShutdownRequested => "shutdown_requested",
            EventKind::SupervisorStopped => "supervisor_stopped",
            EventKind::RestartFrequencyExceeded => "restart_frequency_exceeded",
            EventKind::ChildSpawned => "child_spawned",
            EventKind::ChildTerminated => "child_terminated",
            EventKind::ChildCancelled => "child_cancelled",
            EventKind::ChildRetired => "child_retired",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the publishing supervisor.
    pub supervisor: Option<Arc<str>>,
    /// Id of the child, if applicable.
    pub child: Option<Arc<str>>,
    /// Child generation (1-based, per child).
    pub generation: Option<u32>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            supervisor: None,
            child: None,
            generation: None,
            reason: None,
        }
    }

    /// Attaches the supervisor name.
    #[inline]
    pub fn with_supervisor(mut self, name: impl Into<Arc<str>>) -> Self {
        self.supervisor = Some(name.into());
        self
    }

    /// Attaches a child id.
    #[inline]
    pub fn with_child(mut self, id: impl Into<Arc<str>>) -> Self {
        self.child = Some(id.into());
        self
    }

    /// Attaches a child generation.
    #[inline]
    pub fn with_generation(mut self, n: u32) -> Self {
        self.generation = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events about one child (spawned, terminated, cancelled, retired),
    /// as opposed to supervisor lifecycle events.
    #[inline]
    pub fn is_child_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ChildSpawned
                | EventKind::ChildTerminated
                | EventKind::ChildCancelled
                | EventKind::ChildRetired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::ChildSpawned);
        let b = Event::new(EventKind::ChildTerminated);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn child_events_are_classified() {
        assert!(Event::new(EventKind::ChildRetired).is_child_event());
        assert!(!Event::new(EventKind::SupervisorStarted).is_child_event());
    }
}
