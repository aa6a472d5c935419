//! # Closure-backed child (`ChildFn`)
//!
//! [`ChildFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per start. Nothing is shared between two lifetimes of the same child unless
//! the closure captures it explicitly (e.g. an `Arc<...>`).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use oversight::{ChildError, ChildFn, ChildRef};
//!
//! let worker: ChildRef = ChildFn::arc(|ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok::<_, ChildError>(())
//! });
//! # let _ = worker;
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::children::child::{BoxChildFuture, Child};
use crate::error::ChildError;

/// Closure-backed child implementation.
pub struct ChildFn<F> {
    f: F,
}

impl<F> ChildFn<F> {
    /// Creates a new closure-backed child.
    ///
    /// Prefer [`ChildFn::arc`] when you immediately need a [`ChildRef`](crate::ChildRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the child and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Child for ChildFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ChildError>> + Send + 'static,
{
    fn start(&self, ctx: CancellationToken) -> BoxChildFuture {
        Box::pin((self.f)(ctx))
    }
}

impl<F> std::fmt::Debug for ChildFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildFn").finish_non_exhaustive()
    }
}
