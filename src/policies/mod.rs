//! Restart policies.
//!
//! This module groups the knobs that control **which** children are restarted
//! and **how often** restarts may happen before the supervisor gives up.
//!
//! ## Contents
//! - [`RestartType`]     per child: permanent (always respawn) / temporary (retire)
//! - [`RestartStrategy`] per supervisor: one-for-one / one-for-many
//! - [`SupervisorFlags`] strategy + restart-frequency ceiling (`max_r` per `max_t`)
//!
//! ## Quick wiring
//! ```text
//! SupervisorFlags { strategy, max_r, max_t }
//!      └─► core::supervisor uses:
//!           - max_t / max_r as the guard interval of every loop iteration
//!           - strategy to plan cancel/respawn/retire actions
//! ChildSpec { id, start, restart: RestartType }
//!      └─► core::strategy decides respawn vs retire per child
//! ```

mod flags;
mod restart;
mod strategy;

pub use flags::SupervisorFlags;
pub use restart::RestartType;
pub use strategy::RestartStrategy;
