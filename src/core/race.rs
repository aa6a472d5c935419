//! # Typed race over child terminations and an optional timer.
//!
//! [`race`] resolves with the first of:
//! - the timer ([`Wake::Timer`]), or
//! - the join future of one child ([`Wake::Child`] with its registry index).
//!
//! [`next_termination`] is the same race without a timer.
//!
//! The timer is polled first, so a child terminating in the same poll as the timer
//! fires does not count as early. An empty child set never resolves on its own.

use futures::future::{self, BoxFuture};

/// Which racer finished first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    Timer,
    Child(usize),
}

/// Races child join futures (keyed by registry index) against an optional timer.
pub(crate) async fn race<'a>(
    joins: Vec<(usize, BoxFuture<'a, ()>)>,
    timer: Option<BoxFuture<'a, ()>>,
) -> Wake {
    let first_child = first_termination(joins);
    match timer {
        Some(timer) => tokio::select! {
            biased;
            () = timer => Wake::Timer,
            index = first_child => Wake::Child(index),
        },
        None => Wake::Child(first_child.await),
    }
}

/// Blocks until exactly one of `joins` resolves and returns its registry index.
pub(crate) async fn next_termination(joins: Vec<(usize, BoxFuture<'_, ()>)>) -> usize {
    first_termination(joins).await
}

async fn first_termination(joins: Vec<(usize, BoxFuture<'_, ()>)>) -> usize {
    if joins.is_empty() {
        return future::pending().await;
    }
    let (indices, futs): (Vec<usize>, Vec<_>) = joins.into_iter().unzip();
    let ((), position, _rest) = future::select_all(futs).await;
    indices[position]
}
