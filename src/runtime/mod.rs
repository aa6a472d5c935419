//! # Process runtime capability.
//!
//! The supervisor does not schedule processes itself; it is written against the
//! [`Runtime`] trait, which the embedding system supplies. [`TokioRuntime`] is the
//! default implementation.
//!
//! ## Contract
//! ```text
//! spawn(child)   → Handle        launch `child.start()` as one independent, cancellable, joinable process
//! join(&mut h)   → future<()>    resolves when the process behind `h` terminates (any cause)
//! cancel(&h)                     stop the process (fire-and-forget)
//! delay(d)       → future<()>    resolves after `d`
//! ```
//!
//! Racing is not part of the trait: the supervisor races the futures returned by
//! [`Runtime::join`] and [`Runtime::delay`] itself (see `core::race`).
//!
//! ## Rules
//! - `join` is only called on handles whose process has not been observed to terminate.
//! - `cancel` is never awaited; the supervisor respawns right after issuing it.
//! - Dropping a handle must not leave the process running unsupervised. The tokio
//!   runtime cancels it and aborts it after a grace period.

mod tokio_rt;

use std::time::Duration;

use futures::future::BoxFuture;

use crate::children::ChildSpec;

pub use tokio_rt::{TokioHandle, TokioRuntime};

/// Spawn/join/cancel/delay primitives the supervisor is written against.
pub trait Runtime: Send + Sync + 'static {
    /// Handle to one running process.
    type Handle: Send + 'static;

    /// Launches the start function of `child` as a new process.
    ///
    /// The whole spec is passed so implementations can label the process with its id.
    fn spawn(&self, child: &ChildSpec) -> Self::Handle;

    /// Returns a future that resolves when the process behind `handle` terminates.
    fn join<'a>(&'a self, handle: &'a mut Self::Handle) -> BoxFuture<'a, ()>;

    /// Stops the process behind `handle` without waiting for it.
    fn cancel(&self, handle: &Self::Handle);

    /// Returns a future that resolves after `period`.
    fn delay(&self, period: Duration) -> BoxFuture<'static, ()>;
}
