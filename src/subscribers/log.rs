//! # LogWriter: event-to-tracing bridge
//!
//! A minimal subscriber that renders incoming [`Event`]s as `tracing` records.
//!
//! ## Example output (with a fmt subscriber installed)
//! ```text
//! INFO [spawned] supervisor="root" child="worker" generation=1
//! INFO [terminated] supervisor="root" child="worker" generation=1
//! WARN [retired] supervisor="root" child="probe" generation=1
//! ERROR [restart-frequency-exceeded] supervisor="root" child="worker" reason="..."
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let sup = e.supervisor.as_deref().unwrap_or("unknown");
        let child = e.child.as_deref().unwrap_or("");
        match e.kind {
            EventKind::SupervisorStarted => info!(supervisor = sup, "[started]"),
            EventKind::ShutdownRequested => info!(supervisor = sup, "[shutdown-requested]"),
            EventKind::SupervisorStopped => info!(supervisor = sup, "[stopped]"),
            EventKind::RestartFrequencyExceeded => error!(
                supervisor = sup,
                child,
                reason = e.reason.as_deref().unwrap_or(""),
                "[restart-frequency-exceeded]"
            ),
            EventKind::ChildSpawned => {
                info!(supervisor = sup, child, generation = ?e.generation, "[spawned]")
            }
            EventKind::ChildTerminated => {
                info!(supervisor = sup, child, generation = ?e.generation, "[terminated]")
            }
            EventKind::ChildCancelled => {
                info!(supervisor = sup, child, generation = ?e.generation, "[cancelled]")
            }
            EventKind::ChildRetired => {
                warn!(supervisor = sup, child, generation = ?e.generation, "[retired]")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
