//! # Child abstraction.
//!
//! A [`Child`] is the `start` function of a child specification: every call to
//! [`Child::start`] produces a fresh future, which the process runtime runs as one
//! independently schedulable process. A respawn calls `start` again.
//!
//! The child receives a [`CancellationToken`]; it should watch it and exit promptly.
//! The default runtime aborts a cancelled child that is still running once its
//! grace period is over.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ChildError;

/// Boxed future returned by [`Child::start`].
pub type BoxChildFuture = Pin<Box<dyn Future<Output = Result<(), ChildError>> + Send + 'static>>;

/// Shared handle to a child body.
pub type ChildRef = Arc<dyn Child>;

/// # Body of a supervised process.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use oversight::{BoxChildFuture, Child};
///
/// struct Ticker;
///
/// impl Child for Ticker {
///     fn start(&self, ctx: CancellationToken) -> BoxChildFuture {
///         Box::pin(async move {
///             ctx.cancelled().await;
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Child: Send + Sync + 'static {
    /// Creates the future of one process lifetime.
    fn start(&self, ctx: CancellationToken) -> BoxChildFuture;
}
