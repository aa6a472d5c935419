//! Runtime core: the supervision loop and what it is made of.
//!
//! The only public API from this module is [`Supervisor`] (with its builder and
//! configuration).
//!
//! Internal modules:
//! - [`supervisor`]: the state machine, graceful stop and `start_link`;
//! - [`registry`]: ordered child entries with handles, generations and tombstones;
//! - [`guard`]: the restart-frequency timer;
//! - [`race`]: first-to-finish over child joins and a timer;
//! - [`strategy`]: pure cancel/respawn/retire planning;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod guard;
mod race;
mod registry;
mod shutdown;
mod strategy;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::SupervisorConfig;
pub use supervisor::Supervisor;
