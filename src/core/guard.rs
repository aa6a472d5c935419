//! # Restart-frequency guard.
//!
//! Every loop iteration races the live children against a fresh timer of
//! `max_t / max_r`:
//!
//! ```text
//! race { child joins..., timer(interval) }
//!   ├─ timer first  → Safe      (spacing respected, go wait for the next termination)
//!   └─ child first  → Tripped   (a child terminated too soon: the supervisor dies)
//! ```
//!
//! This enforces a minimum spacing between two restart cycles rather than counting
//! restarts in a sliding window.

use std::time::Duration;

use crate::core::race::{Wake, race};
use crate::core::registry::Registry;
use crate::policies::SupervisorFlags;
use crate::runtime::Runtime;

/// Outcome of one guard wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// The interval elapsed with no termination.
    Safe,
    /// The child at this registry index terminated before the interval elapsed.
    Tripped(usize),
}

/// Minimum-spacing timer, fresh per loop iteration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrequencyGuard {
    interval: Duration,
}

impl FrequencyGuard {
    pub(crate) fn new(flags: &SupervisorFlags) -> Self {
        Self {
            interval: flags.min_restart_interval(),
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Races the live children of `registry` against the interval timer.
    pub(crate) async fn wait<R: Runtime>(&self, rt: &R, registry: &mut Registry<R>) -> Verdict {
        let timer = rt.delay(self.interval);
        match race(registry.joins(rt), Some(timer)).await {
            Wake::Timer => Verdict::Safe,
            Wake::Child(index) => Verdict::Tripped(index),
        }
    }
}
