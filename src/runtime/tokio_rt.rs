//! # Tokio-backed process runtime.
//!
//! Every spawned child becomes a tokio task with its own [`CancellationToken`].
//!
//! ```text
//! spawn  → token = CancellationToken::new()
//!          task  = tokio::spawn(child.start(token))
//! join   → await task (output is logged, never inspected by the supervisor)
//! cancel → token.cancel()
//! drop   → token.cancel() + reaper: wait up to `grace`, then task.abort()
//! ```
//!
//! A cancelled child gets to observe its token and clean up. The supervisor never
//! waits for that: replacing or dropping a handle moves the old task to a detached
//! reaper, which aborts it if it is still running once the grace period is over.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::children::ChildSpec;
use crate::error::ChildError;
use crate::runtime::Runtime;

type ChildTask = JoinHandle<Result<(), ChildError>>;

/// Handle to a child running as a tokio task.
///
/// Dropping a handle whose task is still running cancels the child and reaps it in
/// the background.
pub struct TokioHandle {
    task: Option<ChildTask>,
    token: CancellationToken,
    grace: Duration,
}

impl TokioHandle {
    /// Returns the cancellation token handed to the child.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once the underlying task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TokioHandle {
    fn drop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if task.is_finished() {
            return;
        }
        self.token.cancel();
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(reap(task, self.grace));
            }
            Err(_) => task.abort(),
        }
    }
}

/// [`Runtime`] implementation on top of `tokio::spawn`.
///
/// Must be used from within a tokio runtime.
#[derive(Clone, Copy, Debug)]
pub struct TokioRuntime {
    grace: Duration,
}

impl TokioRuntime {
    /// Default time a dropped child gets to exit after its token fires.
    pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

    /// Creates a runtime with [`DEFAULT_GRACE`](Self::DEFAULT_GRACE).
    pub fn new() -> Self {
        Self::with_grace(Self::DEFAULT_GRACE)
    }

    /// Creates a runtime whose reaper aborts dropped children after `grace`.
    pub fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }
}

impl Default for TokioRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime for TokioRuntime {
    type Handle = TokioHandle;

    fn spawn(&self, child: &ChildSpec) -> TokioHandle {
        let token = CancellationToken::new();
        let fut = child.start().start(token.clone());
        TokioHandle {
            task: Some(tokio::spawn(fut)),
            token,
            grace: self.grace,
        }
    }

    fn join<'a>(&'a self, handle: &'a mut TokioHandle) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if let Some(task) = handle.task.as_mut() {
                log_exit(task.await);
            }
        })
    }

    fn cancel(&self, handle: &TokioHandle) {
        handle.token.cancel();
    }

    fn delay(&self, period: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(period))
    }
}

/// Gives a cancelled child `grace` to return, then aborts it.
async fn reap(mut task: ChildTask, grace: Duration) {
    match tokio::time::timeout(grace, &mut task).await {
        Ok(res) => log_exit(res),
        Err(_) => {
            debug!(grace = ?grace, "child ignored cancellation, aborting");
            task.abort();
        }
    }
}

fn log_exit(res: Result<Result<(), ChildError>, JoinError>) {
    match res {
        Ok(Ok(())) => debug!("child returned"),
        Ok(Err(e)) => debug!(error = %e, label = e.as_label(), "child returned an error"),
        Err(e) if e.is_panic() => debug!("child panicked"),
        Err(_) => debug!("child aborted"),
    }
}
