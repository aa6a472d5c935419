//! # oversight
//!
//! **Oversight** is an OTP-style process supervisor for async Rust.
//!
//! A [`Supervisor`] starts an ordered set of children, restarts them when they
//! terminate according to a [`RestartStrategy`] and each child's [`RestartType`], and
//! gives up with [`SupervisorError::RestartFrequencyExceeded`] once children terminate
//! faster than its [`SupervisorFlags`] allow. Supervisors nest through
//! [`Supervisor::start_link`], so a failing subtree escalates to its parent.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  ChildSpec   │   │  ChildSpec   │   │  ChildSpec   │
//!     │ (PERMANENT)  │   │ (TEMPORARY)  │   │ (start_link) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor::init (one loop, owns its Registry)                   │
//! │  - FrequencyGuard (max_t / max_r spacing timer)                   │
//! │  - strategy::plan (ONE_FOR_ONE / ONE_FOR_MANY)                    │
//! │  - Runtime (spawn / join / cancel / delay)                        │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │ publish
//!     child task         child task       nested Supervisor    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                   SubscriberSet::listen (per supervisor) ──► Subscribe::on_event
//! ```
//!
//! ### Lifecycle
//! ```text
//! build() ──► init(ctx)
//!   SPAWNING          every child, input order
//!   loop {
//!     GUARD_WAIT        race(live children, timer(max_t / max_r))
//!       ├─ child first ─► Err(RestartFrequencyExceeded)
//!       └─ timer first
//!     TERMINATION_WAIT  race(live children)
//!     APPLYING          cancel / respawn / retire
//!   }
//!   ctx cancelled ─► cancel running children ─► Ok(())
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                        |
//! |-------------------|-----------------------------------------------------------------|-------------------------------------------|
//! | **Supervision**   | Restart loop, graceful stop, nesting.                           | [`Supervisor`], [`SupervisorBuilder`]     |
//! | **Policies**      | Restart strategy, restart types and frequency ceiling.          | [`SupervisorFlags`], [`RestartType`]      |
//! | **Children**      | Define children as functions or trait objects.                  | [`ChildSpec`], [`ChildFn`], [`Child`]     |
//! | **Runtime**       | Pluggable spawn/join/cancel/delay capability.                   | [`Runtime`], [`TokioRuntime`]             |
//! | **Subscriber API**| Hook into supervisor events (logging, metrics, custom).         | [`Subscribe`], [`Event`]                  |
//! | **Errors**        | Typed errors for supervisors and children.                      | [`SupervisorError`], [`ChildError`]       |
//! | **Configuration** | Naming and event delivery settings.                             | [`SupervisorConfig`]                      |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use oversight::{ChildError, ChildSpec, RestartType, Supervisor, SupervisorFlags};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn oversight::Subscribe>> = vec![Arc::new(oversight::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn oversight::Subscribe>> = Vec::new();
//!
//!     let inner = Supervisor::builder(SupervisorFlags::default())
//!         .with_name("inner")
//!         .with_child(ChildSpec::builder("probe").with_restart(RestartType::Temporary).build(
//!             |ctx: CancellationToken| async move {
//!                 ctx.cancelled().await;
//!                 Ok::<_, ChildError>(())
//!             },
//!         ))
//!         .build()?;
//!
//!     let root = Supervisor::builder(SupervisorFlags::default().with_max_r(3))
//!         .with_name("root")
//!         .with_subscribers(subs)
//!         .with_child(inner.start_link("inner"))
//!         .build()?;
//!
//!     let token = CancellationToken::new();
//!     let stop = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         stop.cancel();
//!     });
//!
//!     root.init(token).await?;
//!     Ok(())
//! }
//! ```
mod children;
mod core;
mod error;
mod events;
mod policies;
mod runtime;
mod subscribers;

// ---- Public re-exports ----

pub use children::{BoxChildFuture, Child, ChildFn, ChildRef, ChildSpec, ChildSpecBuilder};
pub use core::{Supervisor, SupervisorBuilder, SupervisorConfig};
pub use error::{ChildError, SupervisorError};
pub use events::{Bus, Event, EventKind};
pub use policies::{RestartStrategy, RestartType, SupervisorFlags};
pub use runtime::{Runtime, TokioHandle, TokioRuntime};
pub use subscribers::Subscribe;

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
