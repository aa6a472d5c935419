//! # Supervisor runtime configuration.
//!
//! Provides [`SupervisorConfig`], the settings that are not part of the restart policy
//! ([`SupervisorFlags`](crate::SupervisorFlags)): naming, shutdown and event delivery.

use std::sync::Arc;
use std::time::Duration;

/// Runtime settings of a supervisor.
///
/// ## Field semantics
/// - `name`: label attached to every event and log record of this supervisor
/// - `grace`: how long a stopping supervisor waits for its cancelled children (`0s` = no wait)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Supervisor name, used in events and logs.
    pub name: Arc<str>,

    /// Maximum time to wait for children to exit after a shutdown request.
    ///
    /// Children still running afterwards are left to the runtime, which aborts
    /// them once their handles are dropped.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` messages observe `Lagged`
    /// and skip older items. Ignored when the bus is supplied by the caller.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `name = "supervisor"`
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            name: Arc::from("supervisor"),
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
