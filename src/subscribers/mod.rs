//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the internal [`SubscriberSet`]
//! fan-out that delivers one supervisor's events to user code.
//!
//! ## Architecture
//! ```text
//! Supervisor ── publish(Event) ──► Bus ──► SubscriberSet::listen ──► SubscriberSet::emit
//!                                                                     │
//!                                                       ┌─────────────┼────────────┐
//!                                                       ▼             ▼            ▼
//!                                                   LogWriter      Metrics      Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::SubscriberSet;
pub use subscribe::Subscribe;
