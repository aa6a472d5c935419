//! # Supervisor flags.
//!
//! [`SupervisorFlags`] bundles the restart strategy with the restart-frequency ceiling.
//!
//! The ceiling is enforced as a minimum spacing: a restart cycle may only begin after
//! `max_t / max_r` has elapsed since the previous one began. A termination observed
//! earlier than that is fatal for the supervisor.
//!
//! ```text
//! max_r = 1, max_t = 1000ms  →  interval = 1000ms
//! max_r = 4, max_t = 1000ms  →  interval =  250ms
//! ```

use std::time::Duration;

use crate::error::SupervisorError;
use crate::policies::RestartStrategy;

/// Strategy and restart-frequency ceiling of a supervisor.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use oversight::{RestartStrategy, SupervisorFlags};
///
/// let flags = SupervisorFlags::default()
///     .with_strategy(RestartStrategy::OneForMany)
///     .with_max_r(4)
///     .with_max_t(Duration::from_secs(1));
///
/// assert_eq!(flags.min_restart_interval(), Duration::from_millis(250));
/// assert!(flags.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupervisorFlags {
    /// Which children are affected by a termination.
    pub strategy: RestartStrategy,
    /// Restarts allowed per `max_t` window (`>= 1`).
    pub max_r: u32,
    /// Window the `max_r` restarts are spread over.
    pub max_t: Duration,
}

impl Default for SupervisorFlags {
    /// `OneForOne`, `max_r = 1`, `max_t = 1000ms`.
    fn default() -> Self {
        Self {
            strategy: RestartStrategy::default(),
            max_r: 1,
            max_t: Duration::from_millis(1000),
        }
    }
}

impl SupervisorFlags {
    /// Returns flags with the given strategy.
    pub fn with_strategy(mut self, strategy: RestartStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns flags with the given `max_r`.
    pub fn with_max_r(mut self, max_r: u32) -> Self {
        self.max_r = max_r;
        self
    }

    /// Returns flags with the given `max_t`.
    pub fn with_max_t(mut self, max_t: Duration) -> Self {
        self.max_t = max_t;
        self
    }

    /// Minimum spacing between two restart cycles: `max_t / max_r`.
    ///
    /// `max_r == 0` is treated as `1`; [`validate`](Self::validate) rejects it anyway.
    #[inline]
    pub fn min_restart_interval(&self) -> Duration {
        self.max_t / self.max_r.max(1)
    }

    /// Checks that the flags are usable.
    pub fn validate(&self) -> Result<(), SupervisorError> {
        if self.max_r == 0 {
            return Err(SupervisorError::InvalidFlags {
                reason: "max_r must be at least 1",
            });
        }
        Ok(())
    }
}
