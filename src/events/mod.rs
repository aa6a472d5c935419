//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::supervisor` (loop transitions and registry changes).
//! - **Consumers**: the subscriber listener spawned by `SupervisorBuilder::build`
//!   (fans out to `SubscriberSet`), plus any receiver from `Bus::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
