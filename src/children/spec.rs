//! # Child specification.
//!
//! [`ChildSpec`] is the immutable description a supervisor receives for each child:
//! a unique id, the `start` function, and the [`RestartType`].
//!
//! ## Rules
//! - Ids must be unique within one supervisor (checked when the supervisor is built).
//! - Specs are never modified after they are handed over.

use std::sync::Arc;

use crate::children::child::ChildRef;
use crate::policies::RestartType;

/// Specification of one supervised child.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use oversight::{ChildError, ChildFn, ChildSpec, RestartType};
///
/// let spec = ChildSpec::new(
///     "worker",
///     ChildFn::arc(|_ctx: CancellationToken| async { Ok::<_, ChildError>(()) }),
///     RestartType::Temporary,
/// );
/// assert_eq!(spec.id(), "worker");
/// assert_eq!(spec.restart(), RestartType::Temporary);
/// ```
#[derive(Clone)]
pub struct ChildSpec {
    id: Arc<str>,
    start: ChildRef,
    restart: RestartType,
}

impl ChildSpec {
    /// Creates a new child specification.
    pub fn new(id: impl Into<Arc<str>>, start: ChildRef, restart: RestartType) -> Self {
        Self {
            id: id.into(),
            start,
            restart,
        }
    }

    /// Creates a permanent child specification.
    pub fn permanent(id: impl Into<Arc<str>>, start: ChildRef) -> Self {
        Self::new(id, start, RestartType::Permanent)
    }

    /// Creates a temporary child specification.
    pub fn temporary(id: impl Into<Arc<str>>, start: ChildRef) -> Self {
        Self::new(id, start, RestartType::Temporary)
    }

    /// Returns the child id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the child id as a shared string.
    pub fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// Returns the start function.
    pub fn start(&self) -> &ChildRef {
        &self.start
    }

    /// Returns the restart type.
    pub fn restart(&self) -> RestartType {
        self.restart
    }

    /// Returns a new spec with updated restart type.
    pub fn with_restart(mut self, restart: RestartType) -> Self {
        self.restart = restart;
        self
    }
}

impl std::fmt::Debug for ChildSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildSpec")
            .field("id", &self.id)
            .field("restart", &self.restart)
            .finish_non_exhaustive()
    }
}
